// Decision logging to a JSONL file
//
// One line per decision: the acting player, the chosen actions, and the
// board snapshot they were chosen on. Write failures are logged and
// swallowed; the engine never fails because its log did.

use log::error;
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::state::TurnState;
use crate::types::{Move, Position};
use crate::Board;

#[derive(Debug, Serialize)]
struct DecisionEntry<'a> {
    player: u8,
    moves: &'a [Move],
    blocks: &'a [Position],
    board: &'a Board,
    timestamp: String,
}

/// Mutex-guarded JSONL decision log
pub struct DecisionLogger {
    file: Mutex<Option<File>>,
}

impl DecisionLogger {
    /// Opens (truncating) the log file when enabled; falls back to a
    /// disabled logger if the file cannot be created
    pub fn new(enabled: bool, file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_path)
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", file_path);
                DecisionLogger {
                    file: Mutex::new(Some(file)),
                }
            }
            Err(e) => {
                error!("Failed to create decision log file '{}': {}", file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a no-op logger
    pub fn disabled() -> Self {
        DecisionLogger {
            file: Mutex::new(None),
        }
    }

    /// Records one move decision
    pub fn log_moves(&self, state: &TurnState, moves: &[Move]) {
        self.write_entry(state, moves, &[]);
    }

    /// Records one block-placement decision
    pub fn log_blocks(&self, state: &TurnState, blocks: &[Position]) {
        self.write_entry(state, &[], blocks);
    }

    fn write_entry(&self, state: &TurnState, moves: &[Move], blocks: &[Position]) {
        let mut guard = self.file.lock();
        let file = match guard.as_mut() {
            Some(f) => f,
            None => return,
        };

        let entry = DecisionEntry {
            player: state.acting_player,
            moves,
            blocks,
            board: &state.board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match serde_json::to_string(&entry) {
            Ok(line) => {
                if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
                    error!("Failed to write decision log entry: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize decision log entry: {}", e);
            }
        }
    }
}
