// Core value types for the virus-war board model
//
// Cells use the packed owner + flag encoding: the wire byte carries the
// player id in the low 4 bits (0 = empty, 1-4 = players, 5 = neutral) and
// the flag in bits 4-5 (normal, base, fortified, killed).

use serde::{Deserialize, Serialize};

/// Maximum number of players the cell encoding supports
pub const MAX_PLAYERS: u8 = 4;

/// Wire code of a neutral cell (no flag bits set)
pub const NEUTRAL_CODE: u8 = 5;

const PLAYER_MASK: u8 = 0x0F;
const FLAG_MASK: u8 = 0x30;

/// A (row, column) cell coordinate
///
/// Positions are plain integers so callers can form out-of-bounds values;
/// board queries answer those with the empty/false default instead of
/// signaling an error.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }
}

/// Who holds a cell
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Owner {
    /// Unclaimed cell
    Empty,
    /// Held by player 1-4
    Player(u8),
    /// Permanently inert blocking cell
    Neutral,
}

/// Per-cell status flag
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum CellFlag {
    Normal,
    /// The owner's original anchor cell
    Base,
    /// Permanently unattackable captured cell
    Fortified,
    /// Removed from play
    Killed,
}

/// Packed cell state: owner plus flag
///
/// Invariant: an empty cell always carries the `Normal` flag. Only `Normal`
/// opponent cells can be the target of an attack.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct CellState {
    pub owner: Owner,
    pub flag: CellFlag,
}

pub const EMPTY_CELL: CellState = CellState {
    owner: Owner::Empty,
    flag: CellFlag::Normal,
};

pub const NEUTRAL_CELL: CellState = CellState {
    owner: Owner::Neutral,
    flag: CellFlag::Killed,
};

impl CellState {
    /// Decodes a wire byte (low 4 bits id, bits 4-5 flag)
    pub fn from_code(code: u8) -> Self {
        let id = code & PLAYER_MASK;
        let flag = match code & FLAG_MASK {
            0x10 => CellFlag::Base,
            0x20 => CellFlag::Fortified,
            0x30 => CellFlag::Killed,
            _ => CellFlag::Normal,
        };

        match id {
            0 => EMPTY_CELL,
            id if id >= 1 && id <= MAX_PLAYERS => CellState {
                owner: Owner::Player(id),
                flag,
            },
            _ => NEUTRAL_CELL,
        }
    }

    /// Encodes back to the wire byte
    pub fn code(&self) -> u8 {
        let id = match self.owner {
            Owner::Empty => 0,
            Owner::Player(id) => id,
            Owner::Neutral => NEUTRAL_CODE,
        };
        let flag = match self.flag {
            CellFlag::Normal => 0x00,
            CellFlag::Base => 0x10,
            CellFlag::Fortified => 0x20,
            CellFlag::Killed => 0x30,
        };
        id | flag
    }

    /// Creates a normal cell owned by the given player
    pub fn owned(player_id: u8) -> Self {
        CellState {
            owner: Owner::Player(player_id),
            flag: CellFlag::Normal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owner == Owner::Empty
    }

    pub fn is_neutral(&self) -> bool {
        self.owner == Owner::Neutral
    }

    /// The player id holding this cell, if any
    pub fn player(&self) -> Option<u8> {
        match self.owner {
            Owner::Player(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_owned_by(&self, player_id: u8) -> bool {
        self.player() == Some(player_id)
    }

    /// Only normal cells can be attacked; base, fortified and killed/neutral
    /// cells never are
    pub fn can_be_attacked(&self) -> bool {
        self.player().is_some() && self.flag == CellFlag::Normal
    }
}

/// Grow claims an empty cell, Attack captures an opponent's attackable cell
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MoveKind {
    Grow,
    Attack,
}

/// A single cell action: the target plus the owned origin it expands from
///
/// On a first placement (the player owns no cells yet) the origin is the
/// target itself.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Move {
    pub target: Position,
    pub kind: MoveKind,
    pub origin: Position,
}

impl Move {
    pub fn grow(target: Position, origin: Position) -> Self {
        Move {
            target,
            kind: MoveKind::Grow,
            origin,
        }
    }

    pub fn attack(target: Position, origin: Position) -> Self {
        Move {
            target,
            kind: MoveKind::Attack,
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        let fortified = CellState {
            owner: Owner::Player(2),
            flag: CellFlag::Fortified,
        };
        assert_eq!(fortified.code(), 0x22);
        assert_eq!(CellState::from_code(0x22), fortified);

        assert_eq!(CellState::from_code(0), EMPTY_CELL);
        assert_eq!(CellState::from_code(NEUTRAL_CODE | 0x30), NEUTRAL_CELL);
    }

    #[test]
    fn test_base_cells_are_not_attackable() {
        let base = CellState {
            owner: Owner::Player(1),
            flag: CellFlag::Base,
        };
        assert!(!base.can_be_attacked());
        assert!(CellState::owned(1).can_be_attacked());
        assert!(!EMPTY_CELL.can_be_attacked());
        assert!(!NEUTRAL_CELL.can_be_attacked());
    }
}
