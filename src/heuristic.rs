// Deterministic multi-factor move evaluator
//
// Scores every legal move as an additive sum of six weighted factors and
// picks a diverse top-K (avoid draining every selected move from one origin
// cell). Also owns permanent-block placement scoring, which the simulation
// search delegates to as well.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::config::Weights;
use crate::state::TurnState;
use crate::types::{Move, MoveKind, Position};

// Raw factor contributions, multiplied by the configured weights
const TERRITORY_GAIN: f64 = 10.0;
const CORNER_BONUS: f64 = 8.0;
const EDGE_BONUS: f64 = 5.0;
const THREAT_REMOVAL: f64 = 15.0;
const CONNECTIVITY_REPAIR: f64 = 3.0;
const EXPANSION_PER_NEIGHBOR: f64 = 4.0;
const DEFENSIVE_VALUE: f64 = 2.0;

// Block-placement scoring
const BLOCK_PATH_BONUS: f64 = 20.0;
const BLOCK_CHOKEPOINT_BONUS: f64 = 15.0;
const BLOCK_CORNER_BONUS: f64 = 10.0;
const BLOCK_PER_EMPTY_NEIGHBOR: f64 = 3.0;
const BLOCK_OWN_BASE_PENALTY: f64 = 10.0;

/// Multi-factor heuristic strategy
pub struct HeuristicStrategy {
    weights: Weights,
}

impl HeuristicStrategy {
    pub fn new(weights: Weights) -> Self {
        HeuristicStrategy { weights }
    }

    /// Selects up to `count` moves for the acting player, best first.
    /// Returns an empty list when it is not the acting player's turn, the
    /// player is unknown, or no legal move exists.
    pub fn decide_moves(&self, state: &TurnState, count: usize) -> Vec<Move> {
        if !state.is_my_turn() || count == 0 {
            return Vec::new();
        }
        let player = match state.acting() {
            Some(p) => p,
            None => return Vec::new(),
        };
        let player_id = player.id;

        let legal = state.board.legal_moves(player_id);
        if legal.len() <= count {
            return legal;
        }

        let mask = state.board.reachability(player_id);
        let mut scored: Vec<(Move, f64)> = legal
            .into_iter()
            .map(|mv| {
                let score = self.score_move_with_mask(state, &mv, player_id, &mask);
                (mv, score)
            })
            .collect();

        // Stable sort keeps enumeration order on ties for determinism
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        select_diverse(scored, count)
    }

    /// Scores a single move; the total is strictly additive per factor
    pub fn score_move(&self, state: &TurnState, mv: &Move, player_id: u8) -> f64 {
        let mask = state.board.reachability(player_id);
        self.score_move_with_mask(state, mv, player_id, &mask)
    }

    fn score_move_with_mask(
        &self,
        state: &TurnState,
        mv: &Move,
        player_id: u8,
        reachable: &[bool],
    ) -> f64 {
        let board = &state.board;
        let mut score = 0.0;

        // 1. Territory gain: every captured cell is worth the same base value
        score += TERRITORY_GAIN * self.weights.territory;

        // 2. Strategic position: corners strictly dominate edges
        if board.is_corner(mv.target) {
            score += CORNER_BONUS * self.weights.strategic;
        } else if board.is_edge(mv.target) {
            score += EDGE_BONUS * self.weights.strategic;
        }

        // 3. Threat removal: attacks only
        if mv.kind == MoveKind::Attack {
            score += THREAT_REMOVAL * self.weights.threat;
        }

        // 4. Connectivity repair: the target would newly connect territory
        if self.improves_connectivity(state, mv.target, reachable) {
            score += CONNECTIVITY_REPAIR * self.weights.connectivity;
        }

        // 5. Expansion potential: open frontier around the target
        let empty_neighbors = board.empty_neighbors(mv.target).len();
        score += empty_neighbors as f64 * EXPANSION_PER_NEIGHBOR * self.weights.expansion;

        // 6. Defensive value: guarding our base or contesting an opponent's
        if self.has_defensive_value(state, mv.target, player_id) {
            score += DEFENSIVE_VALUE * self.weights.defensive;
        }

        score
    }

    fn improves_connectivity(&self, state: &TurnState, target: Position, reachable: &[bool]) -> bool {
        let board = &state.board;
        let idx = |p: Position| (p.row as usize) * board.size() + p.col as usize;

        if board.is_valid(target) && reachable[idx(target)] {
            return false;
        }
        board
            .neighbors(target)
            .into_iter()
            .any(|n| reachable[idx(n)])
    }

    fn has_defensive_value(&self, state: &TurnState, target: Position, player_id: u8) -> bool {
        let board = &state.board;

        if let Some(player) = state.player(player_id) {
            if board.is_adjacent(target, player.base) {
                return true;
            }
        }

        // Contesting a choke point: next to a cell that borders an
        // opponent's base
        state.opponents_of(player_id).iter().any(|opp| {
            board
                .neighbors(target)
                .into_iter()
                .any(|n| board.is_adjacent(n, opp.base))
        })
    }

    /// Picks the two cells to spend the one-time permanent blocks on.
    /// Returns an empty list when the allowance is already spent or fewer
    /// than two eligible cells exist.
    pub fn decide_blocks(&self, state: &TurnState) -> Vec<Position> {
        let player = match state.acting() {
            Some(p) => p,
            None => return Vec::new(),
        };
        if player.used_blocks {
            return Vec::new();
        }

        let eligible = state.board.legal_block_positions(player.id);
        if eligible.len() < 2 {
            return Vec::new();
        }

        let mut scored: Vec<(Position, f64)> = eligible
            .into_iter()
            .map(|pos| (pos, self.score_block(state, pos, player.id)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        scored.into_iter().take(2).map(|(pos, _)| pos).collect()
    }

    /// Scores a candidate cell for permanent-block placement
    pub fn score_block(&self, state: &TurnState, pos: Position, player_id: u8) -> f64 {
        let board = &state.board;
        let mut score = 0.0;

        // Blocking an opponent's expansion ring around their base
        for opp in state.opponents_of(player_id) {
            if board.is_adjacent(pos, opp.base) {
                score += BLOCK_PATH_BONUS;
            }
        }

        // Chokepoint proxy: flanked by the board boundary
        let edge_neighbors = board
            .neighbors(pos)
            .into_iter()
            .filter(|&n| board.is_edge(n))
            .count();
        if edge_neighbors >= 2 {
            score += BLOCK_CHOKEPOINT_BONUS;
        }

        if board.is_corner(pos) {
            score += BLOCK_CORNER_BONUS;
        }

        // Expansion denial
        score += board.empty_neighbors(pos).len() as f64 * BLOCK_PER_EMPTY_NEIGHBOR;

        // Never wall in our own base
        if let Some(player) = state.player(player_id) {
            if board.is_adjacent(pos, player.base) {
                score -= BLOCK_OWN_BASE_PENALTY;
            }
        }

        score
    }
}

/// Selects up to `count` moves from a score-sorted list, skipping a
/// candidate whose origin is already represented until enough distinct
/// origins are in the answer
fn select_diverse(scored: Vec<(Move, f64)>, count: usize) -> Vec<Move> {
    let mut selected = Vec::with_capacity(count);
    let mut origins: HashSet<Position> = HashSet::new();

    for (mv, _) in scored {
        if selected.len() >= count {
            break;
        }
        if !origins.contains(&mv.origin) || origins.len() >= count.saturating_sub(1) {
            origins.insert(mv.origin);
            selected.push(mv);
        }
    }

    selected
}
