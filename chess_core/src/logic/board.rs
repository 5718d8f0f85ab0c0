use crate::engine::eval::PositionEvaluator;
use crate::engine::node::{possible_move_exist, LegalMoves};
use crate::engine::Evaluator;
use crate::logic::pieces::{Piece, PieceType};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;

pub const BOARD_SIZE: i32 = 8;
pub const NUM_SQUARES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Player id used by callers: 0 for white, 1 for black.
    pub const fn id(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::White),
            1 => Some(Self::Black),
            _ => None,
        }
    }

    /// Row step of a pawn advance. White starts on rows 6-7 and moves up.
    pub const fn forward(self) -> i32 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }
}

/// A board coordinate. Off-board values are representable so that offset
/// arithmetic never has to be checked before the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: i32,
    pub y: i32,
}

impl Square {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn is_valid(self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }

    #[allow(clippy::cast_sign_loss)]
    pub const fn index(self) -> Option<usize> {
        if self.is_valid() {
            Some((self.x + self.y * BOARD_SIZE) as usize)
        } else {
            None
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn from_index(index: usize) -> Self {
        Self {
            x: (index % 8) as i32,
            y: (index / 8) as i32,
        }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Column of an unmoved king. Castling is only possible from here.
pub const KING_HOME_X: i32 = 4;

const BACK_ROW: [PieceType; 8] = [
    PieceType::Tower,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Tower,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Mailbox, index = x + y * 8
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; NUM_SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; NUM_SQUARES],
        }
    }

    fn setup_initial_position(&mut self) {
        // Black on top (rows 0-1), white at the bottom (rows 6-7)
        self.setup_pieces(Color::Black, 0, 1);
        self.setup_pieces(Color::White, 7, 6);
    }

    fn setup_pieces(&mut self, color: Color, back_row: i32, pawn_row: i32) {
        for (x, &piece_type) in (0..BOARD_SIZE).zip(BACK_ROW.iter()) {
            self.set_piece(Square::new(x, back_row), Some(Piece::new(piece_type, color)));
            self.set_piece(
                Square::new(x, pawn_row),
                Some(Piece::new(PieceType::Pawn, color)),
            );
        }
    }

    pub fn clear(&mut self) {
        self.grid = [None; NUM_SQUARES];
    }

    #[must_use]
    pub fn get_piece(&self, sq: Square) -> Option<Piece> {
        sq.index().and_then(|idx| self.grid.get(idx).copied().flatten())
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(slot) = sq.index().and_then(|idx| self.grid.get_mut(idx)) {
            *slot = piece;
        }
    }

    /// Every occupied square in board order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|piece| (Square::from_index(idx), piece)))
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.piece_type == PieceType::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    /// Relocates a piece without any legality check. Used both for committed
    /// moves and for what-if copies. An unmoved king leaving its home column
    /// by two squares drags the corner tower next to it (castling).
    pub fn move_piece(&mut self, from: Square, to: Square) {
        if !from.is_valid() || !to.is_valid() {
            return;
        }
        let Some(mut piece) = self.get_piece(from) else {
            return;
        };

        if piece.piece_type == PieceType::King
            && piece.unmoved
            && from.x == KING_HOME_X
            && (to.x - from.x).abs() == 2
        {
            let (tower_x, tower_to_x) = if to.x < from.x {
                (0, 3)
            } else {
                (BOARD_SIZE - 1, 5)
            };
            self.move_piece(Square::new(tower_x, from.y), Square::new(tower_to_x, from.y));
        }

        piece.unmoved = false;
        self.set_piece(from, None);
        self.set_piece(to, Some(piece));
    }

    /// Walks a straight or diagonal line from `from` (exclusive) to `to`
    /// (inclusive). Any piece before `to` blocks. The piece on `to` blocks
    /// when there is no filter or when it belongs to `filter`.
    #[must_use]
    pub fn is_path_clear(&self, from: Square, to: Square, filter: Option<Color>) -> bool {
        if !from.is_valid() || !to.is_valid() {
            return false;
        }
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() != dy.abs() && dx != 0 && dy != 0 {
            return false;
        }

        let steps = dx.abs().max(dy.abs());
        for i in 1..=steps {
            let sq = from.offset(dx.signum() * i, dy.signum() * i);
            if let Some(p) = self.get_piece(sq) {
                if filter.map_or(true, |color| i < steps || p.color == color) {
                    return false;
                }
            }
        }
        true
    }

    /// True if any piece not owned by `player` threatens `sq`.
    #[must_use]
    pub fn is_attacked(&self, sq: Square, player: Color) -> bool {
        if !sq.is_valid() {
            return false;
        }
        self.pieces()
            .filter(|(_, p)| p.color != player)
            .any(|(from, p)| p.attacks(self, from, sq))
    }

    /// True if a king (of `player`, or of either side) stands on an attacked square.
    #[must_use]
    pub fn is_check(&self, player: Option<Color>) -> bool {
        self.pieces().any(|(sq, p)| {
            p.piece_type == PieceType::King
                && player.map_or(true, |color| p.color == color)
                && self.is_attacked(sq, p.color)
        })
    }

    #[must_use]
    pub fn will_be_check(&self, from: Square, to: Square, player: Option<Color>) -> bool {
        let mut next = self.clone();
        next.move_piece(from, to);
        next.is_check(player)
    }

    #[must_use]
    pub fn will_be_attacked(&self, from: Square, to: Square, player: Color) -> bool {
        let mut next = self.clone();
        next.move_piece(from, to);
        next.is_attacked(to, player)
    }

    #[must_use]
    pub fn is_checkmate(&self, player: Option<Color>) -> bool {
        self.is_check(player) && !possible_move_exist(self, player)
    }

    /// No legal move while not in check ("tables").
    #[must_use]
    pub fn is_stalemate(&self, player: Option<Color>) -> bool {
        !self.is_check(player) && !possible_move_exist(self, player)
    }

    /// Heuristic value of the position from `player`'s side, default weights.
    /// Units are tenths of a pawn: a pawn is worth 20 (material is doubled),
    /// mate is +-10000, check -500/+50 and stalemate -500.
    #[must_use]
    pub fn score(&self, player: Color) -> i32 {
        PositionEvaluator::default().evaluate(self, player)
    }

    pub fn legal_moves(&self, color: Color) -> LegalMoves<'_> {
        LegalMoves::new(self, color)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let c = self.get_piece(Square::new(x, y)).map_or('.', Piece::symbol);
                write!(f, "{c}")?;
            }
            if y + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(x: i32, y: i32) -> Square {
        Square::new(x, y)
    }

    #[test]
    fn test_initial_setup() {
        let board = Board::new();
        let king = board.get_piece(sq(4, 7)).unwrap();
        assert_eq!(king.piece_type, PieceType::King);
        assert_eq!(king.color, Color::White);
        assert!(king.unmoved);

        let queen = board.get_piece(sq(3, 0)).unwrap();
        assert_eq!(queen.piece_type, PieceType::Queen);
        assert_eq!(queen.color, Color::Black);

        assert_eq!(board.pieces().count(), 32);
        assert!(board.get_piece(sq(4, 4)).is_none());
    }

    #[test]
    fn test_display() {
        let board = Board::new();
        let expected = "tnbqkbnt\n\
                        pppppppp\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        ........\n\
                        PPPPPPPP\n\
                        TNBQKBNT";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut board = Board::new();
        assert!(board.get_piece(sq(-1, 0)).is_none());
        assert!(board.get_piece(sq(0, 8)).is_none());

        let before = board.clone();
        board.set_piece(sq(8, 3), Some(Piece::new(PieceType::Queen, Color::White)));
        board.set_piece(sq(3, -2), None);
        assert_eq!(board, before);

        board.move_piece(sq(0, 6), sq(0, 8));
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_clears_unmoved_flag() {
        let mut board = Board::new();
        board.move_piece(sq(4, 6), sq(4, 4));
        assert!(board.get_piece(sq(4, 6)).is_none());
        let pawn = board.get_piece(sq(4, 4)).unwrap();
        assert_eq!(pawn.piece_type, PieceType::Pawn);
        assert!(!pawn.unmoved);
    }

    #[test]
    fn test_move_from_empty_square_is_noop() {
        let mut board = Board::new();
        let before = board.clone();
        board.move_piece(sq(4, 4), sq(4, 3));
        assert_eq!(board, before);
    }

    #[test]
    fn test_castling_moves_tower() {
        let mut board = Board::empty();
        board.set_piece(sq(4, 7), Some(Piece::new(PieceType::King, Color::White)));
        board.set_piece(sq(0, 7), Some(Piece::new(PieceType::Tower, Color::White)));
        board.set_piece(sq(7, 7), Some(Piece::new(PieceType::Tower, Color::White)));

        let mut long = board.clone();
        long.move_piece(sq(4, 7), sq(2, 7));
        assert_eq!(long.get_piece(sq(2, 7)).unwrap().piece_type, PieceType::King);
        assert_eq!(long.get_piece(sq(3, 7)).unwrap().piece_type, PieceType::Tower);
        assert!(long.get_piece(sq(0, 7)).is_none());
        assert!(long.get_piece(sq(7, 7)).is_some());

        board.move_piece(sq(4, 7), sq(6, 7));
        assert_eq!(board.get_piece(sq(6, 7)).unwrap().piece_type, PieceType::King);
        assert_eq!(board.get_piece(sq(5, 7)).unwrap().piece_type, PieceType::Tower);
        assert!(board.get_piece(sq(7, 7)).is_none());
        assert!(!board.get_piece(sq(5, 7)).unwrap().unmoved);
    }

    #[test]
    fn test_two_step_king_off_home_column_moves_alone() {
        let mut board = Board::empty();
        board.set_piece(sq(3, 7), Some(Piece::new(PieceType::King, Color::White)));
        board.set_piece(sq(0, 7), Some(Piece::new(PieceType::Tower, Color::White)));
        board.set_piece(sq(7, 7), Some(Piece::new(PieceType::Tower, Color::White)));

        board.move_piece(sq(3, 7), sq(5, 7));
        assert_eq!(board.get_piece(sq(5, 7)).unwrap().piece_type, PieceType::King);
        assert!(board.get_piece(sq(7, 7)).unwrap().unmoved);
        assert!(board.get_piece(sq(0, 7)).unwrap().unmoved);
    }

    #[test]
    fn test_path_clear_geometry() {
        let board = Board::new();
        // Zero-length paths are vacuously clear
        for idx in 0..NUM_SQUARES {
            let s = Square::from_index(idx);
            assert!(board.is_path_clear(s, s, None));
            assert!(board.is_path_clear(s, s, Some(Color::White)));
        }
        // Not a line
        assert!(!board.is_path_clear(sq(0, 2), sq(1, 4), None));
        // Off the board
        assert!(!board.is_path_clear(sq(0, 2), sq(0, 9), None));
        // Empty file segment
        assert!(board.is_path_clear(sq(0, 2), sq(0, 5), None));
        // Blocked by a piece before the destination
        assert!(!board.is_path_clear(sq(0, 7), sq(0, 4), Some(Color::Black)));
    }

    #[test]
    fn test_path_clear_destination_filter() {
        let board = Board::new();
        // Destination holds a white pawn
        assert!(!board.is_path_clear(sq(0, 3), sq(0, 6), None));
        assert!(!board.is_path_clear(sq(0, 3), sq(0, 6), Some(Color::White)));
        assert!(board.is_path_clear(sq(0, 3), sq(0, 6), Some(Color::Black)));
        // Diagonal onto a black pawn
        assert!(board.is_path_clear(sq(4, 4), sq(1, 1), Some(Color::White)));
    }

    #[test]
    fn test_attacks_by_kind() {
        let mut board = Board::empty();
        board.set_piece(sq(3, 3), Some(Piece::new(PieceType::Pawn, Color::White)));
        // White pawns strike upward
        assert!(board.is_attacked(sq(2, 2), Color::Black));
        assert!(board.is_attacked(sq(4, 2), Color::Black));
        assert!(!board.is_attacked(sq(3, 2), Color::Black));
        assert!(!board.is_attacked(sq(2, 4), Color::Black));
        // Own pieces never attack for their own side
        assert!(!board.is_attacked(sq(2, 2), Color::White));

        board.clear();
        board.set_piece(sq(3, 3), Some(Piece::new(PieceType::Knight, Color::Black)));
        assert!(board.is_attacked(sq(4, 5), Color::White));
        assert!(board.is_attacked(sq(1, 2), Color::White));
        assert!(!board.is_attacked(sq(4, 4), Color::White));

        board.clear();
        board.set_piece(sq(0, 0), Some(Piece::new(PieceType::Queen, Color::Black)));
        board.set_piece(sq(0, 4), Some(Piece::new(PieceType::Pawn, Color::Black)));
        assert!(board.is_attacked(sq(7, 7), Color::White));
        assert!(board.is_attacked(sq(0, 3), Color::White));
        assert!(!board.is_attacked(sq(0, 5), Color::White));

        board.clear();
        board.set_piece(sq(4, 4), Some(Piece::new(PieceType::King, Color::Black)));
        assert!(board.is_attacked(sq(5, 5), Color::White));
        assert!(!board.is_attacked(sq(6, 6), Color::White));
        assert!(!board.is_attacked(sq(4, 4), Color::White));
    }

    #[test]
    fn test_start_position_not_in_check() {
        let board = Board::new();
        assert!(!board.is_check(Some(Color::White)));
        assert!(!board.is_check(Some(Color::Black)));
        assert!(!board.is_check(None));
        assert!(!board.is_checkmate(None));
        assert!(!board.is_stalemate(Some(Color::White)));
    }

    #[test]
    fn test_will_be_check_does_not_mutate() {
        let mut board = Board::empty();
        board.set_piece(sq(4, 7), Some(Piece::new(PieceType::King, Color::White)));
        board.set_piece(sq(4, 5), Some(Piece::new(PieceType::Bishop, Color::White)));
        board.set_piece(sq(4, 0), Some(Piece::new(PieceType::Tower, Color::Black)));
        let before = board.clone();

        // The bishop is pinned on the e-file
        assert!(board.will_be_check(sq(4, 5), sq(5, 4), Some(Color::White)));
        assert!(!board.will_be_check(sq(4, 7), sq(3, 7), Some(Color::White)));
        // The bishop still shields the king on e2
        assert!(!board.will_be_attacked(sq(4, 7), sq(4, 6), Color::White));
        assert!(board.will_be_attacked(sq(4, 5), sq(4, 1), Color::White));
        assert_eq!(board, before);
    }

    #[test]
    fn test_king_square() {
        let board = Board::new();
        assert_eq!(board.king_square(Color::White), Some(sq(4, 7)));
        assert_eq!(board.king_square(Color::Black), Some(sq(4, 0)));
        assert_eq!(Board::empty().king_square(Color::White), None);
    }

    #[test]
    fn test_color_ids() {
        assert_eq!(Color::from_id(0), Some(Color::White));
        assert_eq!(Color::from_id(1), Some(Color::Black));
        assert_eq!(Color::from_id(2), None);
        assert_eq!(Color::White.opposite().id(), 1);
    }
}
