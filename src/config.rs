// Configuration module for reading Virus.toml
//
// All tunable engine parameters live here: strategy selection, the six
// heuristic factor weights, and the simulation search budget. The engine
// never reads ambient/global state; a Config is built once and handed to
// the strategy constructors.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub weights: Weights,
    pub search: SearchConfig,
    pub decision_log: DecisionLogConfig,
}

/// Strategy selection and turn shape
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// "heuristic" or "mcts"
    pub strategy: String,
}

/// The six heuristic factor weights
///
/// Each factor's raw contribution is multiplied by its weight, so zeroing a
/// weight removes exactly that factor from the additive score.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Weights {
    pub territory: f64,
    pub strategic: f64,
    pub threat: f64,
    pub connectivity: f64,
    pub expansion: f64,
    pub defensive: f64,
}

/// Simulation search budget and shape
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Iteration cap shared across the whole turn's decision
    pub iterations: usize,
    /// Wall-clock budget shared across the whole turn's decision
    pub time_budget_ms: u64,
    /// UCT exploration constant
    pub exploration_constant: f64,
    /// Rollouts stop after this many applied moves
    pub max_rollout_depth: usize,
    /// Rollout worker threads; 0 uses every thread in the pool
    pub threads: usize,
}

/// Decision log (JSONL) settings
#[derive(Debug, Deserialize, Clone)]
pub struct DecisionLogConfig {
    pub enabled: bool,
    pub file_path: String,
}

/// Typed view of the configured strategy name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Heuristic,
    Mcts,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Virus.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Virus.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Virus.toml
    pub fn default_hardcoded() -> Self {
        Config {
            engine: EngineConfig {
                strategy: "mcts".to_string(),
            },
            weights: Weights {
                territory: 1.0,
                strategic: 0.5,
                threat: 1.5,
                connectivity: 0.3,
                expansion: 0.4,
                defensive: 0.2,
            },
            search: SearchConfig {
                iterations: 1000,
                time_budget_ms: 1000,
                exploration_constant: 1.41,
                max_rollout_depth: 50,
                threads: 0,
            },
            decision_log: DecisionLogConfig {
                enabled: false,
                file_path: "virusbot_decisions.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Virus.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        match self.engine.strategy.as_str() {
            "mcts" | "MCTS" => StrategyKind::Mcts,
            _ => StrategyKind::Heuristic,
        }
    }
}
