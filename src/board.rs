// Board model: one turn's snapshot normalized into a queryable obstacle map
//
// A BoardModel is built fresh for every decision and never mutated. The
// lookahead simulator derives new models through `advance` instead.

use crate::config::GameRulesConfig;
use crate::error::SnapshotError;
use crate::types::{Coord, Direction, GameState};

/// Largest board accepted, in cells. Official boards top out at 25x25.
pub const MAX_BOARD_CELLS: usize = 10_000;

/// A snake as seen by the engine. `body[0]` is the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub id: String,
    pub body: Vec<Coord>,
    pub health: i32,
}

impl Snake {
    pub fn head(&self) -> Coord {
        self.body[0]
    }

    /// Second segment, if it is distinct from the head
    pub fn neck(&self) -> Option<Coord> {
        self.body.get(1).copied().filter(|neck| *neck != self.head())
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    pub fn length(&self) -> usize {
        self.body.len()
    }
}

#[derive(Debug, Clone)]
pub struct BoardModel {
    turn: i32,
    width: i32,
    height: i32,
    food: Vec<Coord>,
    snakes: Vec<Snake>,
    you: usize,
    occupied: Vec<bool>,
}

impl BoardModel {
    /// Normalizes a wire snapshot.
    ///
    /// The acting snake's entry in the board's snake list is replaced by
    /// `state.you`, which the server treats as authoritative. Opponents with
    /// an empty body are dropped since they occupy nothing.
    pub fn from_game_state(state: &GameState) -> Result<Self, SnapshotError> {
        let board = &state.board;
        let you = &state.you;

        if !board.snakes.iter().any(|s| s.id == you.id) {
            return Err(SnapshotError::MissingSnake(you.id.clone()));
        }
        if you.body.is_empty() {
            return Err(SnapshotError::EmptyBody(you.id.clone()));
        }

        let snakes = board
            .snakes
            .iter()
            .filter_map(|s| {
                if s.id == you.id {
                    Some(Snake {
                        id: you.id.clone(),
                        body: you.body.clone(),
                        health: you.health,
                    })
                } else if s.body.is_empty() {
                    None
                } else {
                    Some(Snake {
                        id: s.id.clone(),
                        body: s.body.clone(),
                        health: s.health,
                    })
                }
            })
            .collect();

        Self::new(
            state.turn,
            board.width,
            board.height,
            board.food.clone(),
            snakes,
            &you.id,
        )
    }

    /// Builds a model from already-normalized parts
    pub fn new(
        turn: i32,
        width: i32,
        height: i32,
        food: Vec<Coord>,
        snakes: Vec<Snake>,
        you_id: &str,
    ) -> Result<Self, SnapshotError> {
        if width <= 0 || height <= 0 {
            return Err(SnapshotError::InvalidDimensions { width, height });
        }
        let cells = match width.checked_mul(height) {
            Some(cells) if cells as usize <= MAX_BOARD_CELLS => cells as usize,
            _ => return Err(SnapshotError::BoardTooLarge { width, height }),
        };
        let you = snakes
            .iter()
            .position(|s| s.id == you_id)
            .ok_or_else(|| SnapshotError::MissingSnake(you_id.to_string()))?;
        if let Some(empty) = snakes.iter().find(|s| s.body.is_empty()) {
            return Err(SnapshotError::EmptyBody(empty.id.clone()));
        }

        let on_board = |c: &Coord| c.x >= 0 && c.x < width && c.y >= 0 && c.y < height;
        let mut occupied = vec![false; cells];
        for snake in &snakes {
            for segment in &snake.body {
                if !on_board(segment) {
                    return Err(SnapshotError::OutOfBounds {
                        id: snake.id.clone(),
                        x: segment.x,
                        y: segment.y,
                    });
                }
                occupied[(segment.y * width + segment.x) as usize] = true;
            }
        }
        // food off the board can never be eaten
        let food = food.into_iter().filter(|f| on_board(f)).collect();

        Ok(BoardModel {
            turn,
            width,
            height,
            food,
            snakes,
            you,
            occupied,
        })
    }

    pub fn turn(&self) -> i32 {
        self.turn
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Number of cells no snake occupies
    pub fn free_cells(&self) -> usize {
        self.occupied.iter().filter(|cell| !**cell).count()
    }

    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    /// The acting snake
    pub fn you(&self) -> &Snake {
        &self.snakes[self.you]
    }

    /// Every snake other than the acting one
    pub fn opponents(&self) -> impl Iterator<Item = &Snake> {
        let you = self.you;
        self.snakes
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != you)
            .map(|(_, snake)| snake)
    }

    pub fn in_bounds(&self, pos: &Coord) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Row-major cell index, or None outside the board
    pub fn index(&self, pos: &Coord) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// True if any snake's body covers `pos`
    pub fn is_occupied(&self, pos: &Coord) -> bool {
        self.index(pos).map_or(false, |idx| self.occupied[idx])
    }

    /// The first snake whose body covers `pos`
    pub fn snake_at(&self, pos: &Coord) -> Option<&Snake> {
        if !self.is_occupied(pos) {
            return None;
        }
        self.snakes.iter().find(|s| s.body.contains(pos))
    }

    pub fn food_at(&self, pos: &Coord) -> bool {
        self.food.contains(pos)
    }

    /// In-bounds, unoccupied neighbours of `pos`
    pub fn escape_routes(&self, pos: &Coord) -> usize {
        pos.neighbors()
            .iter()
            .filter(|n| self.in_bounds(n) && !self.is_occupied(n))
            .count()
    }

    /// Moves the acting snake one step; opponents stay where they are.
    ///
    /// Landing on food consumes it, restores health and keeps the tail
    /// (the snake grows). Otherwise the tail retracts and health decays.
    pub fn advance(&self, direction: Direction, rules: &GameRulesConfig) -> BoardModel {
        let mut food = self.food.clone();
        let mut snakes = self.snakes.clone();
        let you = &mut snakes[self.you];

        let new_head = direction.apply(&you.head());
        you.body.insert(0, new_head);

        if let Some(eaten) = food.iter().position(|f| *f == new_head) {
            food.remove(eaten);
            you.health = rules.health_on_food;
        } else {
            you.body.pop();
            you.health = you.health.saturating_sub(rules.health_loss_per_turn);
        }

        let you_id = you.id.clone();
        // Only a move off the board fails here, and safe moves never leave it
        Self::new(self.turn.saturating_add(1), self.width, self.height, food, snakes, &you_id)
            .unwrap_or_else(|_| self.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a board where the first snake in `snakes` is the acting one
    pub fn board(width: i32, height: i32, food: &[(i32, i32)], snakes: &[(&str, &[(i32, i32)], i32)]) -> BoardModel {
        let snakes: Vec<Snake> = snakes
            .iter()
            .map(|(id, body, health)| Snake {
                id: id.to_string(),
                body: body.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
                health: *health,
            })
            .collect();
        let you_id = snakes[0].id.clone();
        BoardModel::new(
            0,
            width,
            height,
            food.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
            snakes,
            &you_id,
        )
        .expect("test board should be valid")
    }
}
