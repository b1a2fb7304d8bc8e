// State evaluator
//
// Scores a whole snapshot from the acting snake's point of view. Six factors
// are each scaled into [0, 1] and blended with the weights from
// `EvaluatorConfig`. The evaluator only borrows the board, so every call
// sees exactly one snapshot.

use std::fmt;

use crate::board::BoardModel;
use crate::config::Config;
use crate::flood_fill::{flood_fill, reachable_from_neighbors};
use crate::types::{Coord, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Low,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthEvaluation {
    pub score: f64,
    pub status: HealthStatus,
    pub is_critical: bool,
    pub can_hunt: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodOption {
    pub position: Coord,
    pub distance: i32,
    pub area: usize,
    pub safety: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodAccessEvaluation {
    pub score: f64,
    pub best_target: Option<FoodOption>,
    pub options: Vec<FoodOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpaceEvaluation {
    pub score: f64,
    pub reachable_area: usize,
    pub area_ratio: f64,
    pub territory: f64,
    pub escape_routes: usize,
    pub is_trapped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Threat {
    pub snake_id: String,
    pub distance: i32,
    pub length: usize,
    pub dangerous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreatEvaluation {
    pub score: f64,
    pub immediate_threats: Vec<Threat>,
    pub potential_threats: Vec<Threat>,
}

impl ThreatEvaluation {
    pub fn dangerous_immediate(&self) -> usize {
        self.immediate_threats.iter().filter(|t| t.dangerous).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionEvaluation {
    pub score: f64,
    pub wall_distance: i32,
    /// Manhattan distance to the centre, scaled so that a corner is 1
    pub center_distance: f64,
    pub escape_routes: usize,
    pub is_cornered: bool,
    pub is_center: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSafety {
    pub direction: Direction,
    pub area: usize,
    pub exposure: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSafetyEvaluation {
    pub score: f64,
    pub safest_direction: Option<Direction>,
    pub directions: Vec<DirectionSafety>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorScores {
    pub health: f64,
    pub food_access: f64,
    pub space_control: f64,
    pub threat_level: f64,
    pub position: f64,
    pub path_safety: f64,
}

/// Advisory hints derived from factor flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    SeekFoodImmediately,
    LookForFood,
    FindEscapeRoute,
    AvoidLargerSnakes,
    ConsiderHunting,
    MoveAwayFromWalls,
    HoldTheCenter,
    Prefer(Direction),
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::SeekFoodImmediately => f.write_str("seek food immediately"),
            Recommendation::LookForFood => f.write_str("look for food"),
            Recommendation::FindEscapeRoute => f.write_str("find escape route"),
            Recommendation::AvoidLargerSnakes => f.write_str("avoid larger snakes"),
            Recommendation::ConsiderHunting => f.write_str("consider hunting smaller snakes"),
            Recommendation::MoveAwayFromWalls => f.write_str("move away from walls"),
            Recommendation::HoldTheCenter => f.write_str("hold the center"),
            Recommendation::Prefer(dir) => write!(f, "prefer {}", dir),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub overall_score: f64,
    pub factors: FactorScores,
    pub recommendations: Vec<Recommendation>,
}

pub struct GameStateEvaluator<'a> {
    board: &'a BoardModel,
    config: &'a Config,
}

impl<'a> GameStateEvaluator<'a> {
    pub fn new(board: &'a BoardModel, config: &'a Config) -> Self {
        GameStateEvaluator { board, config }
    }

    pub fn evaluate_game_state(&self) -> Evaluation {
        let weights = &self.config.evaluator;

        let health = self.evaluate_health();
        let food = self.evaluate_food_access();
        let space = self.evaluate_space_control();
        let threats = self.evaluate_threats();
        let position = self.evaluate_position();
        let path_safety = self.evaluate_path_safety();

        let factors = FactorScores {
            health: health.score,
            food_access: food.score,
            space_control: space.score,
            threat_level: threats.score,
            position: position.score,
            path_safety: path_safety.score,
        };

        let overall_score = if self.board.you().health <= 0 {
            0.0
        } else {
            (weights.weight_health * factors.health
                + weights.weight_food_access * factors.food_access
                + weights.weight_space_control * factors.space_control
                + weights.weight_threat_level * factors.threat_level
                + weights.weight_position * factors.position
                + weights.weight_path_safety * factors.path_safety)
                .clamp(0.0, 1.0)
        };

        let recommendations =
            self.recommendations(&health, &space, &threats, &position, &path_safety);

        Evaluation {
            overall_score,
            factors,
            recommendations,
        }
    }

    pub fn evaluate_health(&self) -> HealthEvaluation {
        let cfg = &self.config.evaluator;
        let you = self.board.you();

        let health_norm = (you.health as f64 / cfg.health_max).clamp(0.0, 1.0);
        let length_norm = (you.length() as f64 / cfg.length_reference).clamp(0.0, 1.0);

        let mut score = cfg.health_share * health_norm + (1.0 - cfg.health_share) * length_norm;
        if you.health > cfg.well_fed_threshold {
            score += cfg.well_fed_bonus;
        }
        let is_critical = you.health <= cfg.critical_health_threshold;
        if is_critical {
            score *= cfg.critical_health_multiplier;
        }
        if you.health <= 0 {
            score = 0.0;
        }

        let status = if is_critical {
            HealthStatus::Critical
        } else if you.health <= cfg.low_health_threshold {
            HealthStatus::Low
        } else {
            HealthStatus::Healthy
        };

        HealthEvaluation {
            score: score.clamp(0.0, 1.0),
            status,
            is_critical,
            can_hunt: you.health >= cfg.hunt_health_threshold,
        }
    }

    pub fn evaluate_food_access(&self) -> FoodAccessEvaluation {
        let cfg = &self.config.evaluator;
        let head = self.board.you().head();
        let max_distance = (self.board.width() + self.board.height()) as f64;
        let board_area = self.board.area() as f64;

        let options: Vec<FoodOption> = self
            .board
            .food()
            .iter()
            .map(|food| {
                let distance = head.manhattan(food);
                let area = flood_fill(self.board, *food);
                let inverse_distance = (1.0 - distance as f64 / max_distance).clamp(0.0, 1.0);
                let area_norm = area as f64 / board_area;
                FoodOption {
                    position: *food,
                    distance,
                    area,
                    safety: cfg.food_distance_share * inverse_distance
                        + (1.0 - cfg.food_distance_share) * area_norm,
                }
            })
            .collect();

        let mut best_target: Option<FoodOption> = None;
        for option in &options {
            if best_target.as_ref().map_or(true, |b| option.safety > b.safety) {
                best_target = Some(option.clone());
            }
        }

        let mut score = best_target.as_ref().map_or(0.0, |b| b.safety);
        if self.board.you().health <= cfg.critical_health_threshold {
            score *= cfg.critical_food_urgency;
        }

        FoodAccessEvaluation {
            score: score.clamp(0.0, 1.0),
            best_target,
            options,
        }
    }

    pub fn evaluate_space_control(&self) -> SpaceEvaluation {
        let cfg = &self.config.evaluator;
        let head = self.board.you().head();

        let reachable_area = reachable_from_neighbors(self.board, head);
        let free = self.board.free_cells();
        let area_ratio = if free > 0 {
            (reachable_area as f64 / free as f64).min(1.0)
        } else {
            0.0
        };
        let territory = 1.0 - self.normalized_center_distance(&head);
        let escape_routes = self.board.escape_routes(&head);

        let score = cfg.space_area_share * area_ratio
            + cfg.space_territory_share * territory
            + cfg.space_escape_share * escape_routes as f64 / 4.0;

        SpaceEvaluation {
            score: score.clamp(0.0, 1.0),
            reachable_area,
            area_ratio,
            territory,
            escape_routes,
            is_trapped: reachable_area < self.config.engine.min_safe_area(self.board.area()),
        }
    }

    pub fn evaluate_threats(&self) -> ThreatEvaluation {
        let cfg = &self.config.evaluator;
        let you = self.board.you();
        let head = you.head();

        let mut immediate_threats = Vec::new();
        let mut potential_threats = Vec::new();

        for snake in self.board.opponents() {
            let distance = head.manhattan(&snake.head());
            let threat = Threat {
                snake_id: snake.id.clone(),
                distance,
                length: snake.length(),
                dangerous: snake.length() >= you.length(),
            };
            if distance <= cfg.immediate_threat_distance {
                immediate_threats.push(threat);
            } else if distance <= cfg.potential_threat_distance {
                potential_threats.push(threat);
            }
        }

        let dangerous_potential = potential_threats.iter().filter(|t| t.dangerous).count();
        let mut evaluation = ThreatEvaluation {
            score: 1.0,
            immediate_threats,
            potential_threats,
        };
        evaluation.score = (1.0
            - cfg.immediate_threat_penalty * evaluation.dangerous_immediate() as f64
            - cfg.potential_threat_penalty * dangerous_potential as f64)
            .max(0.0);
        evaluation
    }

    pub fn evaluate_position(&self) -> PositionEvaluation {
        let cfg = &self.config.evaluator;
        let head = self.board.you().head();
        let (w, h) = (self.board.width(), self.board.height());

        let wall_distance = head.x.min(head.y).min(w - 1 - head.x).min(h - 1 - head.y).max(0);
        let max_wall_distance = (w.min(h) - 1) / 2;
        let wall_norm = if max_wall_distance > 0 {
            (wall_distance as f64 / max_wall_distance as f64).min(1.0)
        } else {
            0.0
        };

        let center_distance = self.normalized_center_distance(&head);
        let escape_routes = self.board.escape_routes(&head);

        let score = cfg.position_wall_share * wall_norm
            + cfg.position_center_share * (1.0 - center_distance)
            + cfg.position_escape_share * escape_routes as f64 / 4.0;

        PositionEvaluation {
            score: score.clamp(0.0, 1.0),
            wall_distance,
            center_distance,
            escape_routes,
            is_cornered: escape_routes <= cfg.cornered_max_escape_routes,
            is_center: center_distance < cfg.center_distance_threshold,
        }
    }

    pub fn evaluate_path_safety(&self) -> PathSafetyEvaluation {
        let cfg = &self.config.evaluator;
        let you = self.board.you();
        let head = you.head();
        let free = self.board.free_cells().max(1) as f64;

        let mut directions = Vec::new();
        for direction in Direction::all() {
            let dest = direction.apply(&head);
            if !self.board.in_bounds(&dest) || self.board.is_occupied(&dest) {
                continue;
            }
            let area = flood_fill(self.board, dest);
            let nearby_dangerous = self
                .board
                .opponents()
                .filter(|s| s.length() >= you.length())
                .filter(|s| s.head().manhattan(&dest) <= cfg.path_threat_radius)
                .count();
            let exposure = (nearby_dangerous as f64 * cfg.path_threat_exposure_per_snake).min(1.0);
            directions.push(DirectionSafety {
                direction,
                area,
                exposure,
                score: (area as f64 / free).min(1.0) * (1.0 - exposure),
            });
        }

        let mut best: Option<&DirectionSafety> = None;
        for entry in &directions {
            if best.map_or(true, |b| entry.score > b.score) {
                best = Some(entry);
            }
        }
        let (score, safest_direction) = best.map_or((0.0, None), |b| (b.score, Some(b.direction)));

        PathSafetyEvaluation {
            score,
            safest_direction,
            directions,
        }
    }

    /// Manhattan distance from the board centre, 0 at the centre and 1 in a corner
    fn normalized_center_distance(&self, pos: &Coord) -> f64 {
        let cx = (self.board.width() - 1) as f64 / 2.0;
        let cy = (self.board.height() - 1) as f64 / 2.0;
        let max = cx + cy;
        if max <= 0.0 {
            return 0.0;
        }
        (((pos.x as f64 - cx).abs() + (pos.y as f64 - cy).abs()) / max).min(1.0)
    }

    fn recommendations(
        &self,
        health: &HealthEvaluation,
        space: &SpaceEvaluation,
        threats: &ThreatEvaluation,
        position: &PositionEvaluation,
        path_safety: &PathSafetyEvaluation,
    ) -> Vec<Recommendation> {
        let mut out = Vec::new();

        match health.status {
            HealthStatus::Critical => out.push(Recommendation::SeekFoodImmediately),
            HealthStatus::Low => out.push(Recommendation::LookForFood),
            HealthStatus::Healthy => {}
        }
        if space.is_trapped {
            out.push(Recommendation::FindEscapeRoute);
        }
        if threats.dangerous_immediate() > 0 {
            out.push(Recommendation::AvoidLargerSnakes);
        }
        let prey_nearby = threats
            .immediate_threats
            .iter()
            .chain(threats.potential_threats.iter())
            .any(|t| !t.dangerous);
        if health.can_hunt && prey_nearby {
            out.push(Recommendation::ConsiderHunting);
        }
        if position.is_cornered {
            out.push(Recommendation::MoveAwayFromWalls);
        } else if position.is_center {
            out.push(Recommendation::HoldTheCenter);
        }
        if let Some(dir) = path_safety.safest_direction {
            out.push(Recommendation::Prefer(dir));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::test_support::board;

    fn config() -> Config {
        Config::default_hardcoded()
    }

    fn simple_board(health: i32) -> BoardModel {
        board(
            11,
            11,
            &[(3, 3)],
            &[
                ("me", &[(5, 5), (5, 4), (5, 3)], health),
                ("enemy", &[(7, 7), (7, 6)], 90),
            ],
        )
    }

    #[test]
    fn test_evaluation_has_all_factors_in_range() {
        let config = config();
        let model = simple_board(90);
        let eval = GameStateEvaluator::new(&model, &config).evaluate_game_state();

        assert!(eval.overall_score > 0.0 && eval.overall_score <= 1.0);
        for factor in [
            eval.factors.health,
            eval.factors.food_access,
            eval.factors.space_control,
            eval.factors.threat_level,
            eval.factors.position,
            eval.factors.path_safety,
        ] {
            assert!((0.0..=1.0).contains(&factor), "factor {} out of range", factor);
        }
        assert!(eval.recommendations.contains(&Recommendation::HoldTheCenter));
    }

    #[test]
    fn test_low_health_is_critical() {
        let config = config();
        let model = board(11, 11, &[(3, 3)], &[("me", &[(5, 5), (5, 4)], 10)]);
        let evaluator = GameStateEvaluator::new(&model, &config);
        let health = evaluator.evaluate_health();

        assert_eq!(health.status, HealthStatus::Critical);
        assert!(health.is_critical);
        assert!(!health.can_hunt);
        assert!(evaluator
            .evaluate_game_state()
            .recommendations
            .contains(&Recommendation::SeekFoodImmediately));
    }

    #[test]
    fn test_health_status_bands() {
        let config = config();
        let low = simple_board(45);
        let healthy = simple_board(95);

        let low_eval = GameStateEvaluator::new(&low, &config).evaluate_health();
        let healthy_eval = GameStateEvaluator::new(&healthy, &config).evaluate_health();

        assert_eq!(low_eval.status, HealthStatus::Low);
        assert_eq!(healthy_eval.status, HealthStatus::Healthy);
        assert!(healthy_eval.can_hunt);
        assert!(healthy_eval.score > low_eval.score);
    }

    #[test]
    fn test_critical_health_inflates_food_urgency() {
        let config = config();
        let fed = simple_board(60);
        let starving = simple_board(20);

        let fed_food = GameStateEvaluator::new(&fed, &config).evaluate_food_access();
        let starving_food = GameStateEvaluator::new(&starving, &config).evaluate_food_access();

        assert_eq!(fed_food.best_target.as_ref().map(|f| f.position), Some(Coord::new(3, 3)));
        assert!(starving_food.score > fed_food.score);
    }

    #[test]
    fn test_no_food_scores_zero() {
        let config = config();
        let model = board(11, 11, &[], &[("me", &[(5, 5), (5, 4)], 90)]);
        let food = GameStateEvaluator::new(&model, &config).evaluate_food_access();
        assert_eq!(food.score, 0.0);
        assert!(food.best_target.is_none());
    }

    #[test]
    fn test_closer_food_is_best_target() {
        let config = config();
        let model = board(11, 11, &[(9, 9), (5, 7)], &[("me", &[(5, 5), (5, 4)], 90)]);
        let food = GameStateEvaluator::new(&model, &config).evaluate_food_access();
        assert_eq!(food.options.len(), 2);
        assert_eq!(food.best_target.unwrap().position, Coord::new(5, 7));
    }

    #[test]
    fn test_immediate_threat_detected() {
        let config = config();
        let model = board(
            11,
            11,
            &[(3, 3)],
            &[
                ("me", &[(5, 5), (5, 4), (5, 3)], 90),
                ("enemy", &[(7, 7), (7, 6)], 90),
                ("dangerous", &[(6, 5), (6, 4), (6, 3), (6, 2)], 90),
            ],
        );
        let threats = GameStateEvaluator::new(&model, &config).evaluate_threats();

        assert_eq!(threats.immediate_threats.len(), 1);
        assert!(threats.immediate_threats[0].dangerous);
        assert_eq!(threats.dangerous_immediate(), 1);
        // enemy at distance 4 is shorter, so it does not cost anything
        assert_eq!(threats.potential_threats.len(), 1);
        assert!(!threats.potential_threats[0].dangerous);
        assert!((threats.score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_threat_score_floors_at_zero() {
        let config = config();
        let model = board(
            11,
            11,
            &[],
            &[
                ("me", &[(5, 5), (5, 4)], 90),
                ("a", &[(6, 5), (7, 5)], 90),
                ("b", &[(4, 5), (3, 5)], 90),
                ("c", &[(5, 6), (5, 7)], 90),
                ("d", &[(6, 6), (7, 6)], 90),
            ],
        );
        let threats = GameStateEvaluator::new(&model, &config).evaluate_threats();
        assert_eq!(threats.dangerous_immediate(), 4);
        assert_eq!(threats.score, 0.0);
    }

    #[test]
    fn test_trapped_snake_flagged() {
        let config = config();
        // head boxed into the bottom-left corner by its own body
        let model = board(
            11,
            11,
            &[],
            &[("me", &[(0, 0), (1, 0), (1, 1), (0, 1)], 90)],
        );
        let evaluator = GameStateEvaluator::new(&model, &config);
        let space = evaluator.evaluate_space_control();
        assert_eq!(space.reachable_area, 0);
        assert!(space.is_trapped);
        assert_eq!(space.escape_routes, 0);
        assert!(evaluator
            .evaluate_game_state()
            .recommendations
            .contains(&Recommendation::FindEscapeRoute));
    }

    #[test]
    fn test_position_corner_vs_center() {
        let config = config();
        let corner = board(11, 11, &[], &[("me", &[(0, 0), (1, 0)], 90)]);
        let center = board(11, 11, &[], &[("me", &[(5, 5), (5, 4)], 90)]);

        let corner_pos = GameStateEvaluator::new(&corner, &config).evaluate_position();
        let center_pos = GameStateEvaluator::new(&center, &config).evaluate_position();

        assert!(corner_pos.is_cornered);
        assert_eq!(corner_pos.wall_distance, 0);
        assert!(!corner_pos.is_center);
        assert!(center_pos.is_center);
        assert_eq!(center_pos.wall_distance, 5);
        assert!(center_pos.score > corner_pos.score);
    }

    #[test]
    fn test_path_safety_prefers_open_side() {
        let config = config();
        // wall at x = 3 leaves 3 columns on the left and 7 on the right
        let wall: Vec<(i32, i32)> = (0..11).map(|y| (3, y)).collect();
        let model = board(
            11,
            11,
            &[],
            &[("me", &[(5, 5), (5, 4)], 90), ("wall", &wall, 90)],
        );
        let safety = GameStateEvaluator::new(&model, &config).evaluate_path_safety();
        assert_eq!(safety.directions.len(), 3);
        assert_eq!(safety.safest_direction, Some(Direction::Up));
        assert!(safety.score > 0.0);
    }

    #[test]
    fn test_dead_snake_scores_zero() {
        let config = config();
        let model = simple_board(0);
        let eval = GameStateEvaluator::new(&model, &config).evaluate_game_state();
        assert_eq!(eval.overall_score, 0.0);
        assert_eq!(eval.factors.health, 0.0);
    }

    #[test]
    fn test_recommendation_text() {
        assert_eq!(
            Recommendation::SeekFoodImmediately.to_string(),
            "seek food immediately"
        );
        assert_eq!(Recommendation::Prefer(Direction::Left).to_string(), "prefer left");
    }
}
