// A* pathfinding over the board grid
//
// The grid is an arena of nodes indexed row-major by (x, y). A node's parent
// is an index into the same arena, so reconstructing a path is an index walk.
// `update_grid` rebuilds walkability from a board model and must be called
// for every turn; search fields are reset at the start of every `find_path`.

use log::debug;

use crate::board::BoardModel;
use crate::config::PathfindingConfig;
use crate::types::Coord;

/// A single cell of the search grid
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Coord,
    pub walkable: bool,
    pub g: u32,
    pub h: u32,
    pub f: u32,
    pub parent: Option<usize>,
}

impl Node {
    pub fn new(x: i32, y: i32) -> Self {
        Node {
            position: Coord::new(x, y),
            walkable: true,
            g: 0,
            h: 0,
            f: 0,
            parent: None,
        }
    }

    fn reset_search(&mut self) {
        self.g = 0;
        self.h = 0;
        self.f = 0;
        self.parent = None;
    }
}

/// What a target cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Food,
    PreySnake { length: usize },
}

/// A candidate goal for the pathfinder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub position: Coord,
    pub kind: TargetKind,
    /// Lower is more urgent
    pub priority: u8,
    /// Flood fill area at the target when it was built
    pub area: usize,
}

impl Target {
    pub fn food(position: Coord, priority: u8, area: usize) -> Self {
        Target {
            position,
            kind: TargetKind::Food,
            priority,
            area,
        }
    }

    pub fn prey(position: Coord, length: usize, priority: u8, area: usize) -> Self {
        Target {
            position,
            kind: TargetKind::PreySnake { length },
            priority,
            area,
        }
    }
}

pub struct AStar {
    width: i32,
    height: i32,
    grid: Vec<Node>,
}

impl AStar {
    /// Creates an all-walkable grid
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        AStar {
            width,
            height,
            grid: Self::initialize_grid(width, height),
        }
    }

    fn initialize_grid(width: i32, height: i32) -> Vec<Node> {
        let mut grid = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                grid.push(Node::new(x, y));
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn node(&self, pos: &Coord) -> Option<&Node> {
        self.index(pos).map(|idx| &self.grid[idx])
    }

    fn index(&self, pos: &Coord) -> Option<usize> {
        if pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Resizes to the board if needed, clears every node and marks all snake
    /// bodies unwalkable
    pub fn update_grid(&mut self, board: &BoardModel) {
        if self.width != board.width() || self.height != board.height() {
            self.width = board.width();
            self.height = board.height();
            self.grid = Self::initialize_grid(self.width, self.height);
        }

        for node in self.grid.iter_mut() {
            node.reset_search();
            node.walkable = !board.is_occupied(&node.position);
        }
    }

    fn walkable_neighbors(&self, idx: usize) -> Vec<usize> {
        self.grid[idx]
            .position
            .neighbors()
            .iter()
            .filter_map(|n| self.index(n))
            .filter(|&n| self.grid[n].walkable)
            .collect()
    }

    /// Shortest route from `start` to `goal`, excluding `start` and ending on
    /// `goal`. `Some(vec![])` when already at the goal, `None` when no route
    /// exists.
    pub fn find_path(&mut self, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
        let start_idx = self.index(&start)?;
        let goal_idx = self.index(&goal)?;

        for node in self.grid.iter_mut() {
            node.reset_search();
        }

        let mut open: Vec<usize> = vec![start_idx];
        let mut in_open = vec![false; self.grid.len()];
        let mut closed = vec![false; self.grid.len()];
        in_open[start_idx] = true;

        let h = start.manhattan(&goal) as u32;
        self.grid[start_idx].h = h;
        self.grid[start_idx].f = h;

        while !open.is_empty() {
            // lowest f, first found wins ties
            let mut best = 0;
            for i in 1..open.len() {
                if self.grid[open[i]].f < self.grid[open[best]].f {
                    best = i;
                }
            }
            let current = open.remove(best);
            in_open[current] = false;
            closed[current] = true;

            if current == goal_idx {
                return Some(self.reconstruct_path(current));
            }

            let tentative_g = self.grid[current].g + 1;
            for neighbor in self.walkable_neighbors(current) {
                if closed[neighbor] {
                    continue;
                }
                if !in_open[neighbor] {
                    open.push(neighbor);
                    in_open[neighbor] = true;
                } else if tentative_g >= self.grid[neighbor].g {
                    continue;
                }

                let node = &mut self.grid[neighbor];
                node.parent = Some(current);
                node.g = tentative_g;
                node.h = node.position.manhattan(&goal) as u32;
                node.f = node.g + node.h;
            }
        }

        None
    }

    fn reconstruct_path(&self, end: usize) -> Vec<Coord> {
        let mut path = Vec::new();
        let mut current = end;
        while let Some(parent) = self.grid[current].parent {
            path.push(self.grid[current].position);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Lower is better. Starts from path length; urgent food and much
    /// smaller prey are discounted.
    pub fn evaluate_path_score(
        path: &[Coord],
        target: &Target,
        board: &BoardModel,
        config: &PathfindingConfig,
    ) -> f64 {
        let mut score = path.len() as f64;
        let you = board.you();

        match target.kind {
            TargetKind::Food => {
                if you.health < config.low_health_threshold {
                    score *= config.low_health_food_multiplier;
                }
            }
            TargetKind::PreySnake { length } => {
                score *= length as f64 / you.length() as f64;
            }
        }

        score
    }

    /// Rebuilds the grid from `board`, then returns the lowest-scoring path
    /// among all reachable targets
    pub fn find_best_path_to_targets(
        &mut self,
        start: Coord,
        targets: &[Target],
        board: &BoardModel,
        config: &PathfindingConfig,
    ) -> Option<Vec<Coord>> {
        self.update_grid(board);

        let mut best: Option<(f64, Vec<Coord>)> = None;
        for target in targets {
            let path = match self.find_path(start, target.position) {
                Some(path) => path,
                None => continue,
            };
            let score = Self::evaluate_path_score(&path, target, board, config);
            debug!(
                "Target ({}, {}) {:?}: path length {}, score {:.2}",
                target.position.x,
                target.position.y,
                target.kind,
                path.len(),
                score
            );
            if best.as_ref().map_or(true, |(best_score, _)| score < *best_score) {
                best = Some((score, path));
            }
        }

        best.map(|(_, path)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::test_support::board;
    use crate::config::Config;

    fn pathfinding_config() -> PathfindingConfig {
        Config::default_hardcoded().pathfinding
    }

    fn assert_contiguous(start: Coord, path: &[Coord]) {
        let mut prev = start;
        for step in path {
            assert_eq!(prev.manhattan(step), 1, "{:?} -> {:?} is not a single step", prev, step);
            prev = *step;
        }
    }

    #[test]
    fn test_node_defaults() {
        let node = Node::new(5, 5);
        assert_eq!(node.position, Coord::new(5, 5));
        assert!(node.walkable);
        assert_eq!((node.g, node.h, node.f), (0, 0, 0));
        assert!(node.parent.is_none());
    }

    #[test]
    fn test_grid_matches_board_dimensions() {
        let mut astar = AStar::new(3, 3);
        let model = board(11, 7, &[], &[("me", &[(0, 0)], 100)]);
        astar.update_grid(&model);
        assert_eq!((astar.width(), astar.height()), (11, 7));
        assert!(astar.node(&Coord::new(10, 6)).is_some());
        assert!(astar.node(&Coord::new(11, 6)).is_none());
        assert!(!astar.node(&Coord::new(0, 0)).unwrap().walkable);
    }

    #[test]
    fn test_path_to_self_is_empty() {
        let mut astar = AStar::new(11, 11);
        assert_eq!(astar.find_path(Coord::new(4, 4), Coord::new(4, 4)), Some(vec![]));
    }

    #[test]
    fn test_direct_path_has_manhattan_length() {
        let mut astar = AStar::new(11, 11);
        let path = astar.find_path(Coord::new(0, 0), Coord::new(5, 5)).unwrap();
        assert_eq!(path.len(), 10);
        assert_eq!(path.last(), Some(&Coord::new(5, 5)));
        assert!(!path.contains(&Coord::new(0, 0)));
        assert_contiguous(Coord::new(0, 0), &path);
    }

    #[test]
    fn test_full_wall_blocks_path() {
        let wall: Vec<(i32, i32)> = (0..11).map(|y| (5, y)).collect();
        let model = board(11, 11, &[], &[("wall", &wall, 100)]);
        let mut astar = AStar::new(11, 11);
        astar.update_grid(&model);
        assert_eq!(astar.find_path(Coord::new(0, 0), Coord::new(10, 10)), None);
    }

    #[test]
    fn test_path_avoids_bodies() {
        let body = [(5, 0), (5, 1), (5, 2), (5, 3), (5, 4), (6, 4), (7, 4), (8, 4)];
        let model = board(11, 11, &[], &[("l", &body, 100)]);
        let mut astar = AStar::new(11, 11);
        astar.update_grid(&model);

        let path = astar.find_path(Coord::new(0, 0), Coord::new(10, 0)).unwrap();
        assert_contiguous(Coord::new(0, 0), &path);
        for step in &path {
            assert!(!model.is_occupied(step), "path crosses body at {:?}", step);
        }
        assert_eq!(path.last(), Some(&Coord::new(10, 0)));
    }

    #[test]
    fn test_occupied_goal_is_unreachable() {
        let model = board(7, 7, &[], &[("me", &[(0, 0)], 100), ("o", &[(4, 4), (4, 5)], 100)]);
        let mut astar = AStar::new(7, 7);
        astar.update_grid(&model);
        assert_eq!(astar.find_path(Coord::new(0, 0), Coord::new(4, 4)), None);
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let mut astar = AStar::new(5, 5);
        assert_eq!(astar.find_path(Coord::new(-1, 0), Coord::new(2, 2)), None);
        assert_eq!(astar.find_path(Coord::new(0, 0), Coord::new(5, 2)), None);
    }

    #[test]
    fn test_repeated_searches_do_not_leak_state() {
        let mut astar = AStar::new(7, 7);
        let first = astar.find_path(Coord::new(0, 0), Coord::new(6, 6)).unwrap();
        let second = astar.find_path(Coord::new(6, 6), Coord::new(0, 0)).unwrap();
        assert_eq!(first.len(), 12);
        assert_eq!(second.len(), 12);
        assert_eq!(second.last(), Some(&Coord::new(0, 0)));
    }

    #[test]
    fn test_food_score_halved_at_low_health() {
        let model = board(11, 11, &[(5, 5)], &[("me", &[(0, 0)], 30)]);
        let path: Vec<Coord> = (1..=6).map(|i| Coord::new(i, 0)).collect();
        let target = Target::food(Coord::new(5, 5), 1, 0);
        let score = AStar::evaluate_path_score(&path, &target, &model, &pathfinding_config());
        assert_eq!(score, 3.0);
    }

    #[test]
    fn test_food_score_unchanged_at_high_health() {
        let model = board(11, 11, &[(5, 5)], &[("me", &[(0, 0)], 80)]);
        let path: Vec<Coord> = (1..=6).map(|i| Coord::new(i, 0)).collect();
        let target = Target::food(Coord::new(5, 5), 2, 0);
        let score = AStar::evaluate_path_score(&path, &target, &model, &pathfinding_config());
        assert_eq!(score, 6.0);
    }

    #[test]
    fn test_prey_score_scaled_by_length_ratio() {
        let model = board(
            11,
            11,
            &[],
            &[("me", &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)], 100)],
        );
        let path: Vec<Coord> = (1..=6).map(|i| Coord::new(i, 0)).collect();
        let target = Target::prey(Coord::new(6, 0), 3, 1, 0);
        let score = AStar::evaluate_path_score(&path, &target, &model, &pathfinding_config());
        assert!((score - 6.0 * 3.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_target_is_closest_food_when_healthy() {
        let model = board(11, 11, &[(5, 5), (8, 8), (2, 2)], &[("me", &[(0, 0)], 100)]);
        let targets: Vec<Target> = model
            .food()
            .iter()
            .map(|f| Target::food(*f, 2, 0))
            .collect();
        let mut astar = AStar::new(11, 11);
        let path = astar
            .find_best_path_to_targets(Coord::new(0, 0), &targets, &model, &pathfinding_config())
            .unwrap();
        assert_eq!(path.last(), Some(&Coord::new(2, 2)));
    }

    #[test]
    fn test_best_target_none_when_all_unreachable() {
        let wall: Vec<(i32, i32)> = (0..11).map(|y| (5, y)).collect();
        let model = board(11, 11, &[(8, 8), (9, 1)], &[("wall", &wall, 100)]);
        let targets: Vec<Target> = model
            .food()
            .iter()
            .map(|f| Target::food(*f, 2, 0))
            .collect();
        let mut astar = AStar::new(11, 11);
        assert!(astar
            .find_best_path_to_targets(Coord::new(0, 0), &targets, &model, &pathfinding_config())
            .is_none());
    }
}
