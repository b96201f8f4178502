// Board and connectivity model
//
// The board is a dense N x N grid of packed cells plus a player-id -> base
// position map. Expansion legality is non-local: a cell is a legal origin
// only if it is reachable from the player's base through that player's own
// cells. Reachability is recomputed per query with a BFS over a flat
// row-major visited mask.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::VecDeque;

use crate::types::{CellState, Move, Position, EMPTY_CELL, NEUTRAL_CELL};

/// The single fixed adjacency relation: 8-directional (orthogonal plus
/// diagonal). Every adjacency check in the engine goes through this table.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Game board: size, dense row-major cell grid, and base positions
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Board {
    size: usize,
    cells: Vec<CellState>,
    bases: HashMap<u8, Position>,
}

impl Board {
    /// Creates an empty board of the given size
    pub fn new(size: usize) -> Self {
        Board {
            size,
            cells: vec![EMPTY_CELL; size * size],
            bases: HashMap::new(),
        }
    }

    /// Builds a board from a wire-encoded cell grid and base positions
    pub fn from_codes(codes: &[Vec<u8>], bases: HashMap<u8, Position>) -> Self {
        let size = codes.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in codes {
            for col in 0..size {
                cells.push(CellState::from_code(row.get(col).copied().unwrap_or(0)));
            }
        }

        Board { size, cells, bases }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn set_base(&mut self, player_id: u8, pos: Position) {
        self.bases.insert(player_id, pos);
    }

    pub fn base(&self, player_id: u8) -> Option<Position> {
        self.bases.get(&player_id).copied()
    }

    pub fn is_valid(&self, pos: Position) -> bool {
        pos.row >= 0 && (pos.row as usize) < self.size && pos.col >= 0 && (pos.col as usize) < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid(pos) {
            Some(pos.row as usize * self.size + pos.col as usize)
        } else {
            None
        }
    }

    /// Cell at `pos`; out-of-bounds positions read as empty
    pub fn get(&self, pos: Position) -> CellState {
        match self.index(pos) {
            Some(i) => self.cells[i],
            None => EMPTY_CELL,
        }
    }

    /// Writes a cell; out-of-bounds positions are ignored
    pub fn set(&mut self, pos: Position, cell: CellState) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    pub fn is_neutral(&self, pos: Position) -> bool {
        self.get(pos).is_neutral()
    }

    pub fn is_owned_by(&self, pos: Position, player_id: u8) -> bool {
        self.get(pos).is_owned_by(player_id)
    }

    /// True if the cell belongs to an opponent of `player_id` and can be
    /// attacked (normal flag only)
    pub fn is_attackable_by(&self, pos: Position, player_id: u8) -> bool {
        let cell = self.get(pos);
        match cell.player() {
            Some(id) => id != player_id && cell.can_be_attacked(),
            None => false,
        }
    }

    /// In-bounds neighbors of `pos` under the fixed adjacency relation
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut result = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
        for &(dr, dc) in NEIGHBOR_OFFSETS.iter() {
            let n = Position::new(pos.row + dr, pos.col + dc);
            if self.is_valid(n) {
                result.push(n);
            }
        }
        result
    }

    pub fn is_adjacent(&self, a: Position, b: Position) -> bool {
        let dr = (a.row - b.row).abs();
        let dc = (a.col - b.col).abs();
        dr <= 1 && dc <= 1 && (dr != 0 || dc != 0)
    }

    pub fn empty_neighbors(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos)
            .into_iter()
            .filter(|&n| self.is_empty(n))
            .collect()
    }

    /// Flat row-major mask of cells reachable from the player's base through
    /// the player's own cells. If the base has been captured, the search
    /// starts from the first remaining owned cell instead; the territory is
    /// treated as connected-in-itself after base loss.
    pub fn reachability(&self, player_id: u8) -> Vec<bool> {
        let mut visited = vec![false; self.size * self.size];

        let start = match self.bases.get(&player_id) {
            Some(&base) if self.is_owned_by(base, player_id) => Some(base),
            _ => self.player_cells(player_id).into_iter().next(),
        };
        let start = match start {
            Some(s) => s,
            None => return visited,
        };

        let start_idx = match self.index(start) {
            Some(i) => i,
            None => return visited,
        };

        let mut queue = VecDeque::new();
        visited[start_idx] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for n in self.neighbors(current) {
                if let Some(i) = self.index(n) {
                    if !visited[i] && self.is_owned_by(n, player_id) {
                        visited[i] = true;
                        queue.push_back(n);
                    }
                }
            }
        }

        visited
    }

    /// True iff `pos` is owned by the player and connected to their base
    pub fn is_legal_origin(&self, player_id: u8, pos: Position) -> bool {
        match self.index(pos) {
            Some(i) => self.is_owned_by(pos, player_id) && self.reachability(player_id)[i],
            None => false,
        }
    }

    /// All cells connected to the player's base, in row-major order
    pub fn reachable_cells(&self, player_id: u8) -> Vec<Position> {
        let mask = self.reachability(player_id);
        self.positions()
            .filter(|&p| mask[self.index(p).unwrap()])
            .collect()
    }

    /// Enumerates every legal move for the player: a Grow into each empty
    /// neighbor and an Attack into each attackable opponent neighbor of each
    /// legal origin. No duplicate (target, kind) pairs are returned.
    ///
    /// Special case: a player with zero cells (pre-placement) may grow into
    /// any empty cell, with the target doubling as its own origin.
    pub fn legal_moves(&self, player_id: u8) -> Vec<Move> {
        if self.count_cells(player_id) == 0 {
            return self
                .positions()
                .filter(|&p| self.is_empty(p))
                .map(|p| Move::grow(p, p))
                .collect();
        }

        let mask = self.reachability(player_id);
        let mut seen_grow = vec![false; self.size * self.size];
        let mut seen_attack = vec![false; self.size * self.size];
        let mut moves = Vec::new();

        for origin in self.positions() {
            if !mask[self.index(origin).unwrap()] {
                continue;
            }
            for n in self.neighbors(origin) {
                let i = self.index(n).unwrap();
                if self.is_empty(n) && !seen_grow[i] {
                    seen_grow[i] = true;
                    moves.push(Move::grow(n, origin));
                } else if self.is_attackable_by(n, player_id) && !seen_attack[i] {
                    seen_attack[i] = true;
                    moves.push(Move::attack(n, origin));
                }
            }
        }

        moves
    }

    /// Applies a move for the player, returning a new board; the receiver is
    /// never mutated. The target becomes the player's normal cell.
    pub fn apply(&self, mv: &Move, player_id: u8) -> Board {
        let mut next = self.clone();
        next.set(mv.target, CellState::owned(player_id));
        next
    }

    /// Marks a cell as a permanent neutral block
    pub fn place_block(&mut self, pos: Position) {
        self.set(pos, NEUTRAL_CELL);
    }

    /// Cells eligible for permanent-block placement: any cell the player
    /// currently owns
    pub fn legal_block_positions(&self, player_id: u8) -> Vec<Position> {
        self.player_cells(player_id)
    }

    pub fn count_cells(&self, player_id: u8) -> usize {
        self.cells.iter().filter(|c| c.is_owned_by(player_id)).count()
    }

    pub fn player_cells(&self, player_id: u8) -> Vec<Position> {
        self.positions()
            .filter(|&p| self.is_owned_by(p, player_id))
            .collect()
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.is_empty(p)).collect()
    }

    pub fn is_edge(&self, pos: Position) -> bool {
        let last = self.size as i32 - 1;
        pos.row == 0 || pos.row == last || pos.col == 0 || pos.col == last
    }

    pub fn is_corner(&self, pos: Position) -> bool {
        let last = self.size as i32 - 1;
        (pos.row == 0 || pos.row == last) && (pos.col == 0 || pos.col == last)
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size as i32;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellFlag, MoveKind, Owner};

    fn board_with_player(cells: &[(i32, i32)], base: (i32, i32)) -> Board {
        let mut board = Board::new(5);
        board.set_base(1, Position::new(base.0, base.1));
        for &(r, c) in cells {
            board.set(Position::new(r, c), CellState::owned(1));
        }
        board
    }

    #[test]
    fn test_neighbors_center_edge_corner() {
        let board = Board::new(5);
        assert_eq!(board.neighbors(Position::new(2, 2)).len(), 8);
        assert_eq!(board.neighbors(Position::new(0, 2)).len(), 5);
        assert_eq!(board.neighbors(Position::new(0, 0)).len(), 3);
    }

    #[test]
    fn test_out_of_bounds_queries_are_total() {
        let board = Board::new(5);
        let oob = Position::new(-1, 7);
        assert_eq!(board.get(oob), EMPTY_CELL);
        assert!(!board.is_owned_by(oob, 1));
        assert!(!board.is_attackable_by(oob, 1));
        assert!(!board.is_legal_origin(1, oob));
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut board = Board::new(5);
        board.set(Position::new(9, 9), CellState::owned(1));
        assert_eq!(board.count_cells(1), 0);
    }

    #[test]
    fn test_diagonal_is_adjacent() {
        let board = Board::new(5);
        assert!(board.is_adjacent(Position::new(0, 0), Position::new(1, 1)));
        assert!(!board.is_adjacent(Position::new(0, 0), Position::new(0, 2)));
        assert!(!board.is_adjacent(Position::new(2, 2), Position::new(2, 2)));
    }

    #[test]
    fn test_reachability_excludes_disconnected_island() {
        let board = board_with_player(&[(0, 0), (0, 1), (0, 2), (4, 4)], (0, 0));

        let reachable = board.reachable_cells(1);
        assert_eq!(reachable.len(), 3);
        assert!(board.is_legal_origin(1, Position::new(0, 2)));
        assert!(!board.is_legal_origin(1, Position::new(4, 4)));
    }

    #[test]
    fn test_reachability_falls_back_after_base_capture() {
        let mut board = board_with_player(&[(3, 3), (3, 4)], (0, 0));
        // Base cell was captured by player 2
        board.set(Position::new(0, 0), CellState::owned(2));

        assert!(board.is_legal_origin(1, Position::new(3, 3)));
        assert!(board.is_legal_origin(1, Position::new(3, 4)));
    }

    #[test]
    fn test_first_placement_covers_every_empty_cell() {
        let board = Board::new(5);
        let moves = board.legal_moves(1);
        assert_eq!(moves.len(), 25);
        for mv in &moves {
            assert_eq!(mv.kind, MoveKind::Grow);
            assert_eq!(mv.origin, mv.target);
        }
    }

    #[test]
    fn test_legal_moves_have_no_duplicate_targets() {
        // Two owned cells share empty neighbors; each target must appear once
        let board = board_with_player(&[(2, 2), (2, 3)], (2, 2));
        let moves = board.legal_moves(1);

        let mut seen = std::collections::HashSet::new();
        for mv in &moves {
            assert!(seen.insert((mv.target, mv.kind)), "duplicate {:?}", mv);
        }
    }

    #[test]
    fn test_attacks_skip_protected_cells() {
        let mut board = board_with_player(&[(2, 2)], (2, 2));
        board.set(Position::new(2, 3), CellState::owned(2));
        board.set(
            Position::new(1, 2),
            CellState {
                owner: Owner::Player(2),
                flag: CellFlag::Fortified,
            },
        );
        board.set(
            Position::new(3, 2),
            CellState {
                owner: Owner::Player(2),
                flag: CellFlag::Base,
            },
        );

        let attacks: Vec<_> = board
            .legal_moves(1)
            .into_iter()
            .filter(|m| m.kind == MoveKind::Attack)
            .collect();

        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].target, Position::new(2, 3));
    }

    #[test]
    fn test_apply_leaves_receiver_untouched() {
        let board = board_with_player(&[(2, 2)], (2, 2));
        let mv = Move::grow(Position::new(2, 3), Position::new(2, 2));
        let next = board.apply(&mv, 1);

        assert!(next.is_owned_by(Position::new(2, 3), 1));
        assert!(board.is_empty(Position::new(2, 3)));
    }

    #[test]
    fn test_clone_isolation() {
        let original = board_with_player(&[(1, 1)], (1, 1));
        let mut cloned = original.clone();

        cloned.set(Position::new(1, 1), CellState::owned(2));
        cloned.set_base(3, Position::new(4, 4));

        assert!(original.is_owned_by(Position::new(1, 1), 1));
        assert_eq!(original.base(3), None);
    }

    #[test]
    fn test_from_codes_reads_flag_bits() {
        let mut bases = HashMap::new();
        bases.insert(1, Position::new(0, 0));
        let codes = vec![vec![0x11, 0x01, 0x25], vec![0, 0x35, 0], vec![0, 0, 0]];
        let board = Board::from_codes(&codes, bases);

        assert_eq!(board.get(Position::new(0, 0)).flag, CellFlag::Base);
        assert!(board.get(Position::new(0, 1)).can_be_attacked());
        assert!(board.get(Position::new(1, 1)).is_neutral());
    }
}
