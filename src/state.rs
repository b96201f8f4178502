// Turn state: board plus per-player bookkeeping
//
// A TurnState is built fresh from each authoritative server snapshot, cloned
// for every hypothetical continuation the strategies explore, and dropped
// when the decision returns. Nothing here mutates caller-owned state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Move, Position};
use crate::Board;

/// Actions a player may take before the turn rotates
pub const MOVES_PER_TURN: u8 = 3;

/// A participant in the game
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Player {
    pub id: u8,
    pub name: String,
    pub base: Position,
    pub alive: bool,
    pub used_blocks: bool,
    /// True once the player has held at least one cell. A player with zero
    /// cells is dead only after placing; before that they are still waiting
    /// for their opening placement.
    #[serde(default)]
    pub has_placed: bool,
}

impl Player {
    pub fn new(id: u8, name: impl Into<String>, base: Position) -> Self {
        Player {
            id,
            name: name.into(),
            base,
            alive: true,
            used_blocks: false,
            has_placed: false,
        }
    }
}

/// Complete decision-time snapshot: board, roster, whose turn it is, and
/// which player this engine acts for
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TurnState {
    pub board: Board,
    pub players: Vec<Player>,
    pub current_player: u8,
    pub acting_player: u8,
    /// Actions remaining in the current player's turn. The turn rotates to
    /// the next alive player once this reaches zero, which keeps the search
    /// tree's consecutive plies aligned with the game's multi-action turns.
    pub moves_left: u8,
}

impl TurnState {
    pub fn new(board: Board, players: Vec<Player>, current_player: u8, acting_player: u8) -> Self {
        let mut state = TurnState {
            board,
            players,
            current_player,
            acting_player,
            moves_left: MOVES_PER_TURN,
        };
        state.refresh_alive();
        state
    }

    /// Builds a state from a wire-encoded cell grid plus the roster, deriving
    /// the base map from each player's base position
    pub fn from_codes(
        codes: &[Vec<u8>],
        players: Vec<Player>,
        current_player: u8,
        acting_player: u8,
    ) -> Self {
        let mut bases = HashMap::new();
        for p in &players {
            bases.insert(p.id, p.base);
        }
        TurnState::new(
            Board::from_codes(codes, bases),
            players,
            current_player,
            acting_player,
        )
    }

    pub fn player(&self, player_id: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// The bot-controlled player's record, if present in the roster
    pub fn acting(&self) -> Option<&Player> {
        self.player(self.acting_player)
    }

    pub fn is_my_turn(&self) -> bool {
        self.current_player == self.acting_player
    }

    pub fn alive_players(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.alive).collect()
    }

    pub fn opponents_of(&self, player_id: u8) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.id != player_id && p.alive)
            .collect()
    }

    /// True once at most one player is left alive
    pub fn is_terminal(&self) -> bool {
        self.alive_players().len() <= 1
    }

    /// Applies a move for the current player and returns the successor
    /// state. The attacked cell (if any) changes owner on the board, alive
    /// flags are re-derived from cell counts, and the turn rotates once the
    /// current player's action allowance is spent.
    pub fn apply(&self, mv: &Move) -> TurnState {
        let mut next = self.clone();
        let mover = next.current_player;

        next.board = next.board.apply(mv, mover);
        // A capture may have eliminated the previous owner
        next.refresh_alive();

        if next.moves_left > 1 {
            next.moves_left -= 1;
        } else {
            next.advance_player();
        }

        next
    }

    /// Places up to two permanent neutral blocks on the acting player's own
    /// cells, irrevocably spends the one-time allowance, and consumes the
    /// whole turn.
    pub fn apply_blocks(&self, positions: &[Position]) -> TurnState {
        let mut next = self.clone();

        for &pos in positions.iter().take(2) {
            next.board.place_block(pos);
        }
        let acting = next.acting_player;
        if let Some(p) = next.players.iter_mut().find(|p| p.id == acting) {
            p.used_blocks = true;
        }

        next.refresh_alive();
        next.advance_player();
        next
    }

    /// Re-derives alive flags from the board. A player dies exactly when
    /// their owned-cell count reaches zero after having placed; a player
    /// who has not placed yet owns no cells but is still in the game.
    pub fn refresh_alive(&mut self) {
        for p in self.players.iter_mut() {
            if self.board.count_cells(p.id) > 0 {
                p.has_placed = true;
                p.alive = true;
            } else if p.has_placed {
                p.alive = false;
            }
        }
    }

    /// Rotates to the next alive player in roster order and resets the
    /// action allowance. A current player missing from the alive set hands
    /// the turn to the first alive player.
    pub fn advance_player(&mut self) {
        let alive: Vec<u8> = self.players.iter().filter(|p| p.alive).map(|p| p.id).collect();
        if alive.is_empty() {
            return;
        }

        let next = match alive.iter().position(|&id| id == self.current_player) {
            Some(i) => alive[(i + 1) % alive.len()],
            None => alive[0],
        };
        self.current_player = next;
        self.moves_left = MOVES_PER_TURN;
    }
}
