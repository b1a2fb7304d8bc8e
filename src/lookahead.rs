// Bounded lookahead
//
// Greedy one-ply choice informed by a short rollout: each safe first move is
// simulated, the best continuation from there is found recursively, applied,
// and the resulting state's score is credited to the first move. Opponents
// do not move in the simulation.

use log::debug;

use crate::board::BoardModel;
use crate::config::Config;
use crate::evaluator::GameStateEvaluator;
use crate::safety::safe_moves;
use crate::types::Direction;

/// Hard ceiling on simulated plies, whatever the caller asks for
pub const MAX_LOOKAHEAD_DEPTH: u8 = 3;

/// Best first move by simulated future score, or None when no move is safe
pub fn look_ahead(board: &BoardModel, depth: u8, config: &Config) -> Option<Direction> {
    best_move(board, depth.clamp(1, MAX_LOOKAHEAD_DEPTH), config).map(|(dir, _)| dir)
}

/// Best first move together with the score credited to it
pub fn best_move(board: &BoardModel, depth: u8, config: &Config) -> Option<(Direction, f64)> {
    let depth = depth.min(MAX_LOOKAHEAD_DEPTH);
    let mut best: Option<(Direction, f64)> = None;

    for direction in safe_moves(board) {
        let simulated = board.advance(direction, &config.game_rules);

        let score = if depth <= 1 {
            score_state(&simulated, config)
        } else {
            match best_move(&simulated, depth - 1, config) {
                Some((next, _)) => {
                    score_state(&simulated.advance(next, &config.game_rules), config)
                }
                // no safe continuation
                None => 0.0,
            }
        };

        debug!("Lookahead depth {}: {} scores {:.4}", depth, direction, score);

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((direction, score));
        }
    }

    best
}

fn score_state(board: &BoardModel, config: &Config) -> f64 {
    GameStateEvaluator::new(board, config)
        .evaluate_game_state()
        .overall_score
}
