// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The Bot binds the move engine to the Battlesnake API lifecycle.
// For more info see docs.battlesnake.com

use log::{info, warn};
use rand::Rng;
use serde_json::{json, Value};
use std::time::Instant;

use crate::config::Config;
use crate::selector::{decide_move, MoveDecision, Strategy};
use crate::types::{Direction, GameState, MoveResponse};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot { config }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, state: &GameState) {
        info!(
            "GAME START {} ({}x{}, {} snakes)",
            state.game.id,
            state.board.width,
            state.board.height,
            state.board.snakes.len()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, state: &GameState) {
        let survived = state.board.snakes.iter().any(|s| s.id == state.you.id);
        info!(
            "GAME OVER {} at turn {} ({})",
            state.game.id,
            state.turn,
            if survived { "survived" } else { "eliminated" }
        );
    }

    /// Synchronous decision for an already parsed snapshot
    pub fn choose_move<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> MoveDecision {
        decide_move(state, &self.config, rng)
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The request is taken as raw JSON so that a body which does not describe
    /// a game state still gets an answer. The search itself runs on tokio's
    /// blocking pool.
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(&self, request: Value) -> Value {
        let start_time = Instant::now();

        let state: GameState = match serde_json::from_value(request) {
            Ok(state) => state,
            Err(e) => {
                let fallback = self.config.engine.fallback_direction;
                warn!("Unreadable move request ({}), moving {}", e, fallback);
                return Self::response(fallback);
            }
        };

        let turn = state.turn;
        info!("Turn {}: Computing move", turn);

        let config = self.config.clone();
        let decision = tokio::task::spawn_blocking(move || {
            decide_move(&state, &config, &mut rand::rng())
        })
        .await
        .unwrap_or_else(|e| {
            warn!("Turn {}: move computation failed ({})", turn, e);
            MoveDecision {
                direction: self.config.engine.fallback_direction,
                strategy: Strategy::NoSafeMove,
            }
        });

        info!(
            "Turn {}: MOVE {} via {:?} in {}ms",
            turn,
            decision.direction,
            decision.strategy,
            start_time.elapsed().as_millis()
        );

        Self::response(decision.direction)
    }

    fn response(direction: Direction) -> Value {
        json!(MoveResponse { direction })
    }
}
