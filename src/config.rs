// Configuration module for reading Snake.toml
// Every tunable of the move decision engine lives here so the engine itself
// carries no magic numbers.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Direction;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub engine: EngineConfig,
    pub hunting: HuntingConfig,
    pub pathfinding: PathfindingConfig,
    pub lookahead: LookaheadConfig,
    pub evaluator: EvaluatorConfig,
    pub game_rules: GameRulesConfig,
}

/// Metadata returned from GET /
#[derive(Debug, Deserialize, Clone)]
pub struct AppearanceConfig {
    pub author: String,
    pub color: String,
    pub head: String,
    pub tail: String,
}

/// Move selector fallbacks and space thresholds
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub fallback_direction: Direction,
    pub min_area_floor: usize,
    pub min_area_fraction: f64,
}

impl EngineConfig {
    /// Smallest reachable area considered adequate on a board of `board_area` cells:
    /// `max(floor, floor(fraction * area))`
    pub fn min_safe_area(&self, board_area: usize) -> usize {
        let scaled = (board_area as f64 * self.min_area_fraction).floor() as usize;
        self.min_area_floor.max(scaled)
    }
}

/// Hunting of smaller snakes
#[derive(Debug, Deserialize, Clone)]
pub struct HuntingConfig {
    pub detection_radius: i32,
    pub min_health_for_prey_targets: i32,
}

/// A* target construction and path scoring
#[derive(Debug, Deserialize, Clone)]
pub struct PathfindingConfig {
    pub low_health_threshold: i32,
    pub low_health_food_multiplier: f64,
    pub urgent_food_priority: u8,
    pub normal_food_priority: u8,
    pub prey_priority: u8,
}

/// Bounded forward simulation
#[derive(Debug, Deserialize, Clone)]
pub struct LookaheadConfig {
    pub enabled: bool,
    pub depth: u8,
}

/// Factor weights and thresholds for the state evaluator
#[derive(Debug, Deserialize, Clone)]
pub struct EvaluatorConfig {
    // Factor weights, summing to 1
    pub weight_health: f64,
    pub weight_food_access: f64,
    pub weight_space_control: f64,
    pub weight_threat_level: f64,
    pub weight_position: f64,
    pub weight_path_safety: f64,

    // Health
    pub health_max: f64,
    pub length_reference: f64,
    pub health_share: f64,
    pub well_fed_threshold: i32,
    pub well_fed_bonus: f64,
    pub critical_health_threshold: i32,
    pub critical_health_multiplier: f64,
    pub low_health_threshold: i32,
    pub hunt_health_threshold: i32,

    // Food access
    pub food_distance_share: f64,
    pub critical_food_urgency: f64,

    // Space control
    pub space_area_share: f64,
    pub space_territory_share: f64,
    pub space_escape_share: f64,

    // Threats
    pub immediate_threat_distance: i32,
    pub potential_threat_distance: i32,
    pub immediate_threat_penalty: f64,
    pub potential_threat_penalty: f64,

    // Position
    pub position_wall_share: f64,
    pub position_center_share: f64,
    pub position_escape_share: f64,
    pub cornered_max_escape_routes: usize,
    pub center_distance_threshold: f64,

    // Path safety
    pub path_threat_radius: i32,
    pub path_threat_exposure_per_snake: f64,
}

/// Game rules constants used by the simulator
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            appearance: AppearanceConfig {
                author: "pathfinder".to_string(),
                color: "#3E338F".to_string(),
                head: "smile".to_string(),
                tail: "default".to_string(),
            },
            engine: EngineConfig {
                fallback_direction: Direction::Down,
                min_area_floor: 3,
                min_area_fraction: 0.1,
            },
            hunting: HuntingConfig {
                detection_radius: 5,
                min_health_for_prey_targets: 50,
            },
            pathfinding: PathfindingConfig {
                low_health_threshold: 50,
                low_health_food_multiplier: 0.5,
                urgent_food_priority: 1,
                normal_food_priority: 2,
                prey_priority: 1,
            },
            lookahead: LookaheadConfig {
                enabled: true,
                depth: 2,
            },
            evaluator: EvaluatorConfig {
                weight_health: 0.25,
                weight_food_access: 0.20,
                weight_space_control: 0.20,
                weight_threat_level: 0.15,
                weight_position: 0.10,
                weight_path_safety: 0.10,
                health_max: 100.0,
                length_reference: 20.0,
                health_share: 0.7,
                well_fed_threshold: 80,
                well_fed_bonus: 0.1,
                critical_health_threshold: 30,
                critical_health_multiplier: 0.8,
                low_health_threshold: 60,
                hunt_health_threshold: 70,
                food_distance_share: 0.6,
                critical_food_urgency: 1.2,
                space_area_share: 0.5,
                space_territory_share: 0.3,
                space_escape_share: 0.2,
                immediate_threat_distance: 2,
                potential_threat_distance: 4,
                immediate_threat_penalty: 0.3,
                potential_threat_penalty: 0.1,
                position_wall_share: 0.4,
                position_center_share: 0.3,
                position_escape_share: 0.3,
                cornered_max_escape_routes: 1,
                center_distance_threshold: 0.2,
                path_threat_radius: 2,
                path_threat_exposure_per_snake: 0.5,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
