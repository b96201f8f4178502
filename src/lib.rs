// Library exports for the virus-war decision engine
// The selfplay arena and integration tests build on these modules

pub mod board;
pub mod bot;
pub mod config;
pub mod decision_log;
pub mod heuristic;
pub mod mcts;
pub mod state;
pub mod strategy;
pub mod types;

pub use board::Board;
pub use state::{Player, TurnState};
