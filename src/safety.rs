// Safety filter pipeline
//
// Each filter may only clear a candidate's `safe` flag, never set it, so the
// order below only matters for reading the logs.

use crate::board::BoardModel;
use crate::types::{Coord, Direction};

/// One of the four moves together with where it lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCandidate {
    pub direction: Direction,
    pub destination: Coord,
    pub safe: bool,
}

/// The four candidates in up/down/left/right order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCandidates {
    candidates: [MoveCandidate; 4],
}

impl MoveCandidates {
    /// All four moves from `head`, initially safe
    pub fn from_head(head: Coord) -> Self {
        MoveCandidates {
            candidates: Direction::all().map(|direction| MoveCandidate {
                direction,
                destination: direction.apply(&head),
                safe: true,
            }),
        }
    }

    pub fn get(&self, direction: Direction) -> &MoveCandidate {
        &self.candidates[Self::slot(direction)]
    }

    pub fn is_safe(&self, direction: Direction) -> bool {
        self.get(direction).safe
    }

    pub fn mark_unsafe(&mut self, direction: Direction) {
        self.candidates[Self::slot(direction)].safe = false;
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveCandidate> {
        self.candidates.iter()
    }

    fn mark_where<F>(&mut self, mut unsafe_if: F)
    where
        F: FnMut(&Coord) -> bool,
    {
        for candidate in self.candidates.iter_mut() {
            if unsafe_if(&candidate.destination) {
                candidate.safe = false;
            }
        }
    }

    fn slot(direction: Direction) -> usize {
        match direction {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Disables the move that would re-enter the neck
pub fn filter_backwards(candidates: &mut MoveCandidates, head: Coord, neck: Option<Coord>) {
    let neck = match neck {
        Some(neck) => neck,
        None => return,
    };
    if let Some(direction) = Direction::between(&head, &neck) {
        candidates.mark_unsafe(direction);
    }
}

/// Disables moves that leave the board
pub fn filter_bounds(candidates: &mut MoveCandidates, board: &BoardModel) {
    candidates.mark_where(|dest| !board.in_bounds(dest));
}

/// Disables moves onto any body segment of any snake.
///
/// Each snake's last segment is left to `filter_tail_collision`. A tail
/// stacked on the segment before it (the snake just ate) is still caught
/// here through that earlier segment.
pub fn filter_collisions(candidates: &mut MoveCandidates, board: &BoardModel) {
    for snake in board.snakes() {
        let fixed = &snake.body[..snake.body.len() - 1];
        candidates.mark_where(|dest| fixed.contains(dest));
    }
}

/// Disables moves onto an opponent's tail when that opponent is next to food:
/// it is expected to eat, so the tail stays put this turn.
/// The acting snake's own tail always vacates.
pub fn filter_tail_collision(candidates: &mut MoveCandidates, board: &BoardModel) {
    for snake in board.opponents() {
        let head = snake.head();
        let will_eat = board.food().iter().any(|food| food.manhattan(&head) == 1);
        if !will_eat {
            continue;
        }
        let tail = snake.tail();
        candidates.mark_where(|dest| *dest == tail);
    }
}

/// Disables moves next to the head of an opponent at least as long as us
pub fn filter_head_to_head(candidates: &mut MoveCandidates, board: &BoardModel) {
    let my_length = board.you().length();
    for snake in board.opponents() {
        if my_length > snake.length() {
            continue;
        }
        let contested = snake.head().neighbors();
        candidates.mark_where(|dest| contested.contains(dest));
    }
}

/// Runs every filter for the acting snake
pub fn evaluate_candidates(board: &BoardModel) -> MoveCandidates {
    let you = board.you();
    let mut candidates = MoveCandidates::from_head(you.head());

    filter_backwards(&mut candidates, you.head(), you.neck());
    filter_bounds(&mut candidates, board);
    filter_collisions(&mut candidates, board);
    filter_tail_collision(&mut candidates, board);
    filter_head_to_head(&mut candidates, board);

    candidates
}

/// Directions still flagged safe, in up/down/left/right order
pub fn get_safe_moves(candidates: &MoveCandidates) -> Vec<Direction> {
    candidates
        .iter()
        .filter(|c| c.safe)
        .map(|c| c.direction)
        .collect()
}

/// Shorthand for `get_safe_moves(&evaluate_candidates(board))`
pub fn safe_moves(board: &BoardModel) -> Vec<Direction> {
    get_safe_moves(&evaluate_candidates(board))
}
