//! Heuristic Scoring Tests
//!
//! End-to-end checks of the additive move evaluator and the block placement
//! scorer: each weighted factor contributes independently, and zeroing a
//! weight removes exactly that factor's raw value from the total.

use virusbot::config::{Config, Weights};
use virusbot::heuristic::HeuristicStrategy;
use virusbot::state::{Player, TurnState};
use virusbot::types::{CellState, Move, Position};
use virusbot::Board;

fn uniform_weights() -> Weights {
    Weights {
        territory: 1.0,
        strategic: 1.0,
        threat: 1.0,
        connectivity: 1.0,
        expansion: 1.0,
        defensive: 1.0,
    }
}

fn only(set: impl Fn(&mut Weights)) -> Weights {
    let mut w = Weights {
        territory: 0.0,
        strategic: 0.0,
        threat: 0.0,
        connectivity: 0.0,
        expansion: 0.0,
        defensive: 0.0,
    };
    set(&mut w);
    w
}

/// 7x7 board. Player 1 holds a diagonal chain from its base at (0,0) out to
/// (3,3); player 2 holds only its base at (6,6).
fn chain_state() -> TurnState {
    let mut board = Board::new(7);
    board.set_base(1, Position::new(0, 0));
    board.set_base(2, Position::new(6, 6));
    for i in 0..4 {
        board.set(Position::new(i, i), CellState::owned(1));
    }
    board.set(Position::new(6, 6), CellState::owned(2));

    TurnState::new(
        board,
        vec![
            Player::new(1, "us", Position::new(0, 0)),
            Player::new(2, "them", Position::new(6, 6)),
        ],
        1,
        1,
    )
}

// Growing to (4,4) from (3,3) in chain_state, factor by factor:
//   territory      10         (every capture)
//   strategic       0         (interior cell)
//   threat          0         (grow, not attack)
//   connectivity    3         (target is off-mask, next to connected cells)
//   expansion      28         (7 empty neighbors x 4)
//   defensive       2         ((5,5) neighbors the opponent base)
#[test]
fn test_grow_score_sums_all_factors() {
    let state = chain_state();
    let mv = Move::grow(Position::new(4, 4), Position::new(3, 3));

    let full = HeuristicStrategy::new(uniform_weights()).score_move(&state, &mv, 1);
    assert_eq!(full, 43.0);
}

#[test]
fn test_zeroing_a_weight_removes_exactly_that_factor() {
    let state = chain_state();
    let mv = Move::grow(Position::new(4, 4), Position::new(3, 3));
    let full = HeuristicStrategy::new(uniform_weights()).score_move(&state, &mv, 1);

    let cases: Vec<(fn(&mut Weights), f64)> = vec![
        (|w| w.territory = 0.0, 10.0),
        (|w| w.connectivity = 0.0, 3.0),
        (|w| w.expansion = 0.0, 28.0),
        (|w| w.defensive = 0.0, 2.0),
    ];
    for (zero, raw) in cases {
        let mut w = uniform_weights();
        zero(&mut w);
        let partial = HeuristicStrategy::new(w).score_move(&state, &mv, 1);
        assert_eq!(full - partial, raw);
    }
}

#[test]
fn test_attack_earns_the_threat_removal_factor() {
    let mut state = chain_state();
    // An opponent cell where the grow target used to be
    state.board.set(Position::new(4, 4), CellState::owned(2));
    let attack = Move::attack(Position::new(4, 4), Position::new(3, 3));

    let strategy = HeuristicStrategy::new(only(|w| w.threat = 1.0));
    assert_eq!(strategy.score_move(&state, &attack, 1), 15.0);
}

#[test]
fn test_corner_outranks_edge_under_strategic_weight() {
    let mut board = Board::new(7);
    board.set_base(1, Position::new(1, 1));
    board.set(Position::new(1, 1), CellState::owned(1));
    let state = TurnState::new(
        board,
        vec![Player::new(1, "us", Position::new(1, 1))],
        1,
        1,
    );

    let strategy = HeuristicStrategy::new(only(|w| w.strategic = 1.0));
    let origin = Position::new(1, 1);
    let corner = strategy.score_move(&state, &Move::grow(Position::new(0, 0), origin), 1);
    let edge = strategy.score_move(&state, &Move::grow(Position::new(0, 1), origin), 1);

    assert_eq!(corner, 8.0);
    assert_eq!(edge, 5.0);
    assert!(corner > edge);
}

/// 9x9 board for block scoring. Player 1 owns its base (4,4), the cell next
/// to it (4,5), and an outpost (1,1) hugging the opponent base at (0,0).
fn block_state() -> TurnState {
    let mut board = Board::new(9);
    board.set_base(1, Position::new(4, 4));
    board.set_base(2, Position::new(0, 0));
    board.set(Position::new(4, 4), CellState::owned(1));
    board.set(Position::new(4, 5), CellState::owned(1));
    board.set(Position::new(1, 1), CellState::owned(1));
    board.set(Position::new(0, 0), CellState::owned(2));

    TurnState::new(
        board,
        vec![
            Player::new(1, "us", Position::new(4, 4)),
            Player::new(2, "them", Position::new(0, 0)),
        ],
        1,
        1,
    )
}

#[test]
fn test_block_scores_favor_opponent_ring_over_own_base_ring() {
    let state = block_state();
    let strategy = HeuristicStrategy::new(uniform_weights());

    // (1,1): +20 opponent ring, +15 chokepoint (5 edge neighbors),
    // +21 expansion denial (7 empty neighbors)
    assert_eq!(strategy.score_block(&state, Position::new(1, 1), 1), 56.0);
    // (4,4): +21 expansion denial only
    assert_eq!(strategy.score_block(&state, Position::new(4, 4), 1), 21.0);
    // (4,5): +21 expansion denial, -10 for ringing our own base
    assert_eq!(strategy.score_block(&state, Position::new(4, 5), 1), 11.0);
}

#[test]
fn test_decide_blocks_picks_the_top_two_cells() {
    let state = block_state();
    let strategy = HeuristicStrategy::new(uniform_weights());

    let blocks = strategy.decide_blocks(&state);
    assert_eq!(blocks, vec![Position::new(1, 1), Position::new(4, 4)]);
}

#[test]
fn test_decide_blocks_respects_spent_allowance() {
    let mut state = block_state();
    state.players[0].used_blocks = true;

    let strategy = HeuristicStrategy::new(uniform_weights());
    assert!(strategy.decide_blocks(&state).is_empty());
}

#[test]
fn test_decide_blocks_needs_two_eligible_cells() {
    let mut state = block_state();
    state.board.set(Position::new(4, 5), virusbot::types::EMPTY_CELL);
    state.board.set(Position::new(1, 1), virusbot::types::EMPTY_CELL);

    let strategy = HeuristicStrategy::new(uniform_weights());
    assert!(strategy.decide_blocks(&state).is_empty());
}

#[test]
fn test_default_weights_match_the_shipped_profile() {
    let weights = Config::default_hardcoded().weights;
    assert_eq!(weights.territory, 1.0);
    assert_eq!(weights.threat, 1.5);
    assert_eq!(weights.defensive, 0.2);
}
