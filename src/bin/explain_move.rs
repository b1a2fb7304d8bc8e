use pathfinder_snake::board::BoardModel;
use pathfinder_snake::config::Config;
use pathfinder_snake::evaluator::GameStateEvaluator;
use pathfinder_snake::flood_fill::flood_fill;
use pathfinder_snake::safety::evaluate_candidates;
use pathfinder_snake::selector::decide_move;
use pathfinder_snake::types::GameState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::fs;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <move_request.json> [seed]", args[0]);
        std::process::exit(1);
    }

    let file_path = &args[1];
    let seed: u64 = args
        .get(2)
        .map(|s| s.parse().expect("Seed must be a valid integer"))
        .unwrap_or(0);

    let config = Config::load_or_default();
    let contents = fs::read_to_string(file_path).expect("Failed to read file");
    let state: GameState = serde_json::from_str(&contents).expect("Failed to parse game state");

    let board = match BoardModel::from_game_state(&state) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Snapshot rejected: {}", e);
            println!("Move: {} (fallback)", config.engine.fallback_direction);
            std::process::exit(1);
        }
    };

    let you = board.you();
    let head = you.head();

    println!("═══════════════════════════════════════════════════════════");
    println!("Move Explanation for Turn {}", board.turn());
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Snake State:");
    println!("  Head: ({}, {})", head.x, head.y);
    println!("  Health: {}", you.health);
    println!("  Length: {}", you.length());
    println!("  Board: {}x{}, {} food, {} opponents", board.width(), board.height(), board.food().len(), board.opponents().count());
    println!();

    println!("Candidate Moves:");
    for candidate in evaluate_candidates(&board).iter() {
        let dest = candidate.destination;
        if candidate.safe {
            println!(
                "  {:5} -> ({}, {})  SAFE   area {}",
                candidate.direction,
                dest.x,
                dest.y,
                flood_fill(&board, dest)
            );
        } else {
            println!("  {:5} -> ({}, {})  UNSAFE", candidate.direction, dest.x, dest.y);
        }
    }
    println!();

    let evaluation = GameStateEvaluator::new(&board, &config).evaluate_game_state();
    let factors = &evaluation.factors;
    println!("Evaluation: {:.4}", evaluation.overall_score);
    println!("  health        {:.4}", factors.health);
    println!("  food access   {:.4}", factors.food_access);
    println!("  space control {:.4}", factors.space_control);
    println!("  threat level  {:.4}", factors.threat_level);
    println!("  position      {:.4}", factors.position);
    println!("  path safety   {:.4}", factors.path_safety);
    if !evaluation.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &evaluation.recommendations {
            println!("  - {}", recommendation);
        }
    }
    println!();

    let decision = decide_move(&state, &config, &mut StdRng::seed_from_u64(seed));
    println!("Move: {} (via {:?})", decision.direction, decision.strategy);
}
