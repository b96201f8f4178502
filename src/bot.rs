// Engine facade
//
// Owns the configuration, the selected strategy and the decision log, and
// exposes the two decision entry points the orchestration loop calls once
// per turn. The snapshot handed in is treated as read-only; every
// exploratory mutation happens on clones inside the strategies.

use log::info;
use std::time::Instant;

use crate::config::Config;
use crate::decision_log::DecisionLogger;
use crate::state::TurnState;
use crate::strategy::Strategy;
use crate::types::{Move, Position};

/// Decision engine for one bot-controlled player
pub struct Bot {
    strategy: Strategy,
    logger: DecisionLogger,
}

impl Bot {
    /// Creates a bot from static configuration; the configuration does not
    /// change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let strategy = Strategy::from_config(&config);
        let logger = DecisionLogger::new(
            config.decision_log.enabled,
            &config.decision_log.file_path,
        );
        info!("Using strategy: {}", strategy.name());

        Bot { strategy, logger }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Decides up to `count` cell actions for the current turn.
    /// An empty result means skip or end the turn: not our turn, unknown
    /// acting player, or no legal move available.
    pub fn decide_moves(&self, state: &TurnState, count: usize) -> Vec<Move> {
        let start = Instant::now();
        let moves = self.strategy.decide_moves(state, count);

        info!(
            "Player {}: chose {} of {} actions in {}ms",
            state.acting_player,
            moves.len(),
            count,
            start.elapsed().as_millis()
        );
        self.logger.log_moves(state, &moves);

        moves
    }

    /// Decides where to spend the one-time pair of permanent blocks.
    /// Empty when the allowance is spent or fewer than two cells qualify.
    pub fn decide_blocks(&self, state: &TurnState) -> Vec<Position> {
        let blocks = self.strategy.decide_blocks(state);

        info!(
            "Player {}: placing {} permanent blocks",
            state.acting_player,
            blocks.len()
        );
        self.logger.log_blocks(state, &blocks);

        blocks
    }
}
