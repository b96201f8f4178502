//! Walled-In Player Tests
//!
//! A player whose territory is completely surrounded by unattackable cells
//! has no legal move. Every strategy must return an empty move list for that
//! player instead of an illegal or panicking fallback.

use virusbot::config::Config;
use virusbot::heuristic::HeuristicStrategy;
use virusbot::mcts::MctsStrategy;
use virusbot::state::{Player, TurnState};
use virusbot::types::{CellFlag, CellState, Owner, Position};
use virusbot::Board;

/// 5x5 board, player 1 owns only the center cell, player 2 owns a fortified
/// ring around it. Fortified cells cannot be attacked, so player 1 is sealed.
fn walled_in_state() -> TurnState {
    let mut board = Board::new(5);
    board.set_base(1, Position::new(2, 2));
    board.set_base(2, Position::new(0, 0));
    board.set(Position::new(2, 2), CellState::owned(1));
    board.set(Position::new(0, 0), CellState::owned(2));

    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            board.set(
                Position::new(2 + dr, 2 + dc),
                CellState {
                    owner: Owner::Player(2),
                    flag: CellFlag::Fortified,
                },
            );
        }
    }

    TurnState::new(
        board,
        vec![
            Player::new(1, "sealed", Position::new(2, 2)),
            Player::new(2, "wall", Position::new(0, 0)),
        ],
        1,
        1,
    )
}

#[test]
fn test_walled_in_player_has_no_legal_moves() {
    let state = walled_in_state();
    assert!(
        state.board.legal_moves(1).is_empty(),
        "Sealed player should have no legal moves"
    );
}

#[test]
fn test_heuristic_returns_empty_for_walled_in_player() {
    let state = walled_in_state();
    let strategy = HeuristicStrategy::new(Config::default_hardcoded().weights);

    let moves = strategy.decide_moves(&state, 3);
    assert!(moves.is_empty(), "Heuristic must not invent moves for a sealed player");
}

#[test]
fn test_mcts_returns_empty_for_walled_in_player() {
    let state = walled_in_state();
    let config = Config::default_hardcoded();
    let strategy = MctsStrategy::with_seed(&config.search, config.weights, 7);

    let moves = strategy.decide_moves(&state, 3);
    assert!(moves.is_empty(), "Search must not invent moves for a sealed player");
}

#[test]
fn test_fortified_ring_survives_on_the_wire() {
    let state = walled_in_state();
    let cell = state.board.get(Position::new(1, 1));
    assert_eq!(CellState::from_code(cell.code()), cell);
    assert!(!cell.can_be_attacked());
}
