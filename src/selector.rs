// Move selector
//
// Orchestrates the engine for one turn. Strategies are tried in order and
// the first one that yields a safe move wins; every failure mode degrades to
// the configured fallback direction instead of an error.

use log::{debug, info, warn};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::board::{BoardModel, Snake};
use crate::config::Config;
use crate::flood_fill::flood_fill;
use crate::lookahead::look_ahead;
use crate::pathfinding::{AStar, Target};
use crate::safety::{evaluate_candidates, get_safe_moves, MoveCandidates};
use crate::types::{Coord, Direction, GameState};

/// Which stage produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Lookahead,
    Hunt,
    PathToTarget,
    LargestArea,
    TowardFood,
    Random,
    NoSafeMove,
    InvalidSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDecision {
    pub direction: Direction,
    pub strategy: Strategy,
}

impl MoveDecision {
    fn new(direction: Direction, strategy: Strategy) -> Self {
        MoveDecision { direction, strategy }
    }
}

/// An opponent shorter than us within the detection radius
#[derive(Debug, Clone)]
pub struct Prey<'a> {
    pub snake: &'a Snake,
    pub head: Coord,
    pub distance: i32,
}

/// Picks this turn's move. `rng` only breaks ties among fallback moves.
pub fn decide_move<R: Rng + ?Sized>(state: &GameState, config: &Config, rng: &mut R) -> MoveDecision {
    let board = match BoardModel::from_game_state(state) {
        Ok(board) => board,
        Err(e) => {
            warn!("Turn {}: invalid snapshot ({}), moving {}", state.turn, e, config.engine.fallback_direction);
            return MoveDecision::new(config.engine.fallback_direction, Strategy::InvalidSnapshot);
        }
    };
    decide_on_board(&board, config, rng)
}

/// Same as `decide_move` for an already-built board model
pub fn decide_on_board<R: Rng + ?Sized>(board: &BoardModel, config: &Config, rng: &mut R) -> MoveDecision {
    let turn = board.turn();
    let candidates = evaluate_candidates(board);
    let safe = get_safe_moves(&candidates);

    if safe.is_empty() {
        warn!("Turn {}: no safe moves detected, moving {}", turn, config.engine.fallback_direction);
        return MoveDecision::new(config.engine.fallback_direction, Strategy::NoSafeMove);
    }
    debug!("Turn {}: safe moves {:?}", turn, safe);

    if config.lookahead.enabled {
        if let Some(direction) = look_ahead(board, config.lookahead.depth, config) {
            info!("Turn {}: lookahead chose {}", turn, direction);
            return MoveDecision::new(direction, Strategy::Lookahead);
        }
    }

    if let Some(direction) = hunting_move(board, &candidates, config) {
        info!("Turn {}: hunting smaller snake, moving {}", turn, direction);
        return MoveDecision::new(direction, Strategy::Hunt);
    }

    if let Some(direction) = path_move(board, &safe, config) {
        info!("Turn {}: following A* path, moving {}", turn, direction);
        return MoveDecision::new(direction, Strategy::PathToTarget);
    }

    if let Some(direction) = largest_area_move(board, &candidates) {
        info!("Turn {}: no good path, taking the roomiest move {}", turn, direction);
        return MoveDecision::new(direction, Strategy::LargestArea);
    }

    let head = board.you().head();
    if let Some(direction) = choose_move_toward_food(head, board.food(), &safe) {
        info!("Turn {}: heading toward food, moving {}", turn, direction);
        return MoveDecision::new(direction, Strategy::TowardFood);
    }

    let direction = random_move(&safe, rng).unwrap_or(config.engine.fallback_direction);
    info!("Turn {}: moving randomly {}", turn, direction);
    MoveDecision::new(direction, Strategy::Random)
}

/// Shorter opponents whose head is within `detection_radius`, closest first
pub fn find_nearby_smaller_snakes<'a>(board: &'a BoardModel, detection_radius: i32) -> Vec<Prey<'a>> {
    let you = board.you();
    let my_head = you.head();

    let mut prey: Vec<Prey<'a>> = board
        .opponents()
        .filter(|s| s.length() < you.length())
        .map(|snake| Prey {
            snake,
            head: snake.head(),
            distance: snake.head().manhattan(&my_head),
        })
        .filter(|p| p.distance <= detection_radius)
        .collect();

    prey.sort_by_key(|p| p.distance);
    prey
}

/// First safe move that closes in on the closest smaller snake
pub fn hunting_move(board: &BoardModel, candidates: &MoveCandidates, config: &Config) -> Option<Direction> {
    let prey = find_nearby_smaller_snakes(board, config.hunting.detection_radius);
    let target = prey.first()?;
    let current = board.you().head().manhattan(&target.head);

    candidates
        .iter()
        .filter(|c| c.safe)
        .find(|c| c.destination.manhattan(&target.head) < current)
        .map(|c| c.direction)
}

/// Food and, when healthy enough, smaller snakes' heads as A* goals
pub fn build_targets(board: &BoardModel, config: &Config) -> Vec<Target> {
    let you = board.you();
    let pf = &config.pathfinding;
    let food_priority = if you.health < pf.low_health_threshold {
        pf.urgent_food_priority
    } else {
        pf.normal_food_priority
    };

    let mut targets: Vec<Target> = board
        .food()
        .iter()
        .map(|food| Target::food(*food, food_priority, flood_fill(board, *food)))
        .collect();

    if you.health >= config.hunting.min_health_for_prey_targets {
        targets.extend(
            board
                .opponents()
                .filter(|s| s.length() < you.length())
                .map(|s| Target::prey(s.head(), s.length(), pf.prey_priority, flood_fill(board, s.head()))),
        );
    }

    targets
}

/// First step of the best A* path, if it is safe and leads somewhere roomy
pub fn path_move(board: &BoardModel, safe: &[Direction], config: &Config) -> Option<Direction> {
    let targets = build_targets(board, config);
    if targets.is_empty() {
        return None;
    }

    let head = board.you().head();
    let mut pathfinder = AStar::new(board.width(), board.height());
    let path = pathfinder.find_best_path_to_targets(head, &targets, board, &config.pathfinding)?;
    let next = *path.first()?;
    let direction = Direction::between(&head, &next)?;

    if !safe.contains(&direction) {
        return None;
    }
    let area = flood_fill(board, next);
    let required = config.engine.min_safe_area(board.area());
    if area < required {
        debug!("A* step {} leads to {} cells, need {}", direction, area, required);
        return None;
    }
    Some(direction)
}

/// Safe move with the largest reachable area, first on ties
pub fn largest_area_move(board: &BoardModel, candidates: &MoveCandidates) -> Option<Direction> {
    let mut best: Option<(Direction, usize)> = None;
    for candidate in candidates.iter().filter(|c| c.safe) {
        let area = flood_fill(board, candidate.destination);
        if area > best.map_or(0, |(_, a)| a) {
            best = Some((candidate.direction, area));
        }
    }
    best.map(|(dir, _)| dir)
}

/// Nearest food with a safe primary or secondary direction decides.
///
/// The primary direction runs along the axis with the smaller non-zero gap,
/// the secondary along the other one. Food in line has no secondary.
pub fn choose_move_toward_food(head: Coord, food: &[Coord], safe: &[Direction]) -> Option<Direction> {
    let mut foods: Vec<&Coord> = food.iter().collect();
    foods.sort_by_key(|f| f.manhattan(&head));

    for f in foods {
        let dx = (f.x - head.x).abs();
        let dy = (f.y - head.y).abs();
        let x_dir = if f.x > head.x { Direction::Right } else { Direction::Left };
        let y_dir = if f.y > head.y { Direction::Up } else { Direction::Down };

        let (primary, secondary) = if dx < dy {
            if dx == 0 {
                (y_dir, None)
            } else {
                (x_dir, Some(y_dir))
            }
        } else if dy == 0 {
            (x_dir, None)
        } else {
            (y_dir, Some(x_dir))
        };

        if safe.contains(&primary) {
            return Some(primary);
        }
        if let Some(secondary) = secondary.filter(|d| safe.contains(d)) {
            return Some(secondary);
        }
    }

    None
}

/// Uniform choice among `safe`
pub fn random_move<R: Rng + ?Sized>(safe: &[Direction], rng: &mut R) -> Option<Direction> {
    safe.choose(rng).copied()
}
