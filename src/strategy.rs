// Strategy dispatch
//
// The engine ships a closed set of move-selection strategies; callers pick
// one through configuration. New strategies are added as new variants here,
// not through open-ended dynamic dispatch.

use crate::config::{Config, StrategyKind};
use crate::heuristic::HeuristicStrategy;
use crate::mcts::MctsStrategy;
use crate::state::TurnState;
use crate::types::{Move, Position};

/// The available move-selection strategies
pub enum Strategy {
    Heuristic(HeuristicStrategy),
    Mcts(MctsStrategy),
}

impl Strategy {
    /// Builds the strategy named by the configuration
    pub fn from_config(config: &Config) -> Self {
        match config.strategy_kind() {
            StrategyKind::Mcts => {
                Strategy::Mcts(MctsStrategy::new(&config.search, config.weights.clone()))
            }
            StrategyKind::Heuristic => {
                Strategy::Heuristic(HeuristicStrategy::new(config.weights.clone()))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Heuristic(_) => "heuristic",
            Strategy::Mcts(_) => "mcts",
        }
    }

    /// Decides up to `count` cell actions for the acting player
    pub fn decide_moves(&self, state: &TurnState, count: usize) -> Vec<Move> {
        match self {
            Strategy::Heuristic(s) => s.decide_moves(state, count),
            Strategy::Mcts(s) => s.decide_moves(state, count),
        }
    }

    /// Decides where to spend the one-time pair of permanent blocks
    pub fn decide_blocks(&self, state: &TurnState) -> Vec<Position> {
        match self {
            Strategy::Heuristic(s) => s.decide_blocks(state),
            Strategy::Mcts(s) => s.decide_blocks(state),
        }
    }
}
