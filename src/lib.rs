// Library exports for the Battlesnake bot
// The server binary and the diagnostics tool share the engine through here

pub mod board;
pub mod bot;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod flood_fill;
pub mod handler;
pub mod lookahead;
pub mod pathfinding;
pub mod safety;
pub mod selector;
pub mod types;
