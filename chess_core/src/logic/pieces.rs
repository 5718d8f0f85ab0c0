use crate::logic::board::{Board, Color, Square, BOARD_SIZE, KING_HOME_X};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Tower = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Tower,
        Self::Queen,
        Self::King,
    ];

    /// Only these kinds care whether they have moved (double step, castling).
    pub const fn has_unmoved_flag(self) -> bool {
        matches!(self, Self::Pawn | Self::Tower | Self::King)
    }
}

/// Result of asking a piece for the candidate at a given index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    Move(Square),
    /// Nothing legal at this index, the next index may still produce a move.
    Skip,
    Exhausted,
}

// (dx, dy)
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];

// Eight neighbours, then long and short castling
const KING_OFFSETS: [(i32, i32); 10] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-2, 0),
    (2, 0),
];

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ALL_DIRECTIONS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub unmoved: bool,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self {
            piece_type,
            color,
            unmoved: piece_type.has_unmoved_flag(),
        }
    }

    pub const fn symbol(self) -> char {
        let c = match self.piece_type {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Tower => 't',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Full legality of moving this piece from `from` to `to`, including the
    /// rule that the mover's own king may not be left in check.
    #[must_use]
    pub fn can_move(&self, board: &Board, from: Square, to: Square) -> bool {
        if !from.is_valid() || !to.is_valid() {
            return false;
        }
        match self.piece_type {
            PieceType::Pawn => self.can_pawn_move(board, from, to),
            PieceType::Knight => self.can_knight_move(board, from, to),
            PieceType::Bishop | PieceType::Tower | PieceType::Queen => {
                self.can_slide(board, from, to)
            }
            PieceType::King => self.can_king_move(board, from, to),
        }
    }

    /// Candidate destination number `index` from `from`. Callers start at 0
    /// and increase the index until `Candidate::Exhausted`.
    #[must_use]
    pub fn possible_move(&self, board: &Board, from: Square, index: usize) -> Candidate {
        match self.piece_type {
            PieceType::Pawn => {
                let forward = self.color.forward();
                let to = match index {
                    0 => from.offset(0, forward),
                    1 => from.offset(0, forward * 2),
                    2 => from.offset(-1, forward),
                    3 => from.offset(1, forward),
                    _ => return Candidate::Exhausted,
                };
                self.candidate(board, from, to)
            }
            PieceType::Knight => KNIGHT_OFFSETS
                .get(index)
                .map_or(Candidate::Exhausted, |&(dx, dy)| {
                    self.candidate(board, from, from.offset(dx, dy))
                }),
            PieceType::King => KING_OFFSETS
                .get(index)
                .map_or(Candidate::Exhausted, |&(dx, dy)| {
                    self.candidate(board, from, from.offset(dx, dy))
                }),
            PieceType::Bishop => self.nth_slide(board, from, &DIAGONAL, index),
            PieceType::Tower => self.nth_slide(board, from, &ORTHOGONAL, index),
            PieceType::Queen => self.nth_slide(board, from, &ALL_DIRECTIONS, index),
        }
    }

    /// Whether this piece, standing on `from`, threatens `target`.
    #[must_use]
    pub fn attacks(&self, board: &Board, from: Square, target: Square) -> bool {
        let dx = (target.x - from.x).abs();
        let dy = (target.y - from.y).abs();
        match self.piece_type {
            PieceType::Pawn => dx == 1 && target.y - from.y == self.color.forward(),
            PieceType::Knight => (dx == 1 && dy == 2) || (dx == 2 && dy == 1),
            PieceType::Bishop | PieceType::Tower | PieceType::Queen => {
                self.slides_along(dx, dy) && board.is_path_clear(from, target, Some(self.color))
            }
            PieceType::King => {
                dx <= 1
                    && dy <= 1
                    && (dx, dy) != (0, 0)
                    && board.is_path_clear(from, target, Some(self.color))
            }
        }
    }

    fn candidate(&self, board: &Board, from: Square, to: Square) -> Candidate {
        if self.can_move(board, from, to) {
            Candidate::Move(to)
        } else {
            Candidate::Skip
        }
    }

    // dx, dy are absolute deltas
    const fn slides_along(&self, dx: i32, dy: i32) -> bool {
        let straight = (dx == 0) != (dy == 0);
        let diagonal = dx != 0 && dx == dy;
        match self.piece_type {
            PieceType::Bishop => diagonal,
            PieceType::Tower => straight,
            PieceType::Queen => straight || diagonal,
            _ => false,
        }
    }

    fn nth_slide(
        &self,
        board: &Board,
        from: Square,
        directions: &[(i32, i32)],
        index: usize,
    ) -> Candidate {
        let mut seen = 0;
        for &(dx, dy) in directions {
            let mut to = from.offset(dx, dy);
            while to.is_valid() {
                let occupant = board.get_piece(to);
                if occupant.is_some_and(|p| p.color == self.color) {
                    break;
                }
                if !board.will_be_check(from, to, Some(self.color)) {
                    if seen == index {
                        return Candidate::Move(to);
                    }
                    seen += 1;
                }
                // A capture ends the ray
                if occupant.is_some() {
                    break;
                }
                to = to.offset(dx, dy);
            }
        }
        Candidate::Exhausted
    }

    fn can_pawn_move(&self, board: &Board, from: Square, to: Square) -> bool {
        let dx = (to.x - from.x).abs();
        let advance = (to.y - from.y) * self.color.forward();

        let capture = advance == 1
            && dx == 1
            && board
                .get_piece(to)
                .is_some_and(|p| p.color != self.color);
        let push = dx == 0
            && (advance == 1 || (advance == 2 && self.unmoved))
            && board.is_path_clear(from, to, None);

        (capture || push) && !board.will_be_check(from, to, Some(self.color))
    }

    fn can_knight_move(&self, board: &Board, from: Square, to: Square) -> bool {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        ((dx == 2 && dy == 1) || (dx == 1 && dy == 2))
            && board.get_piece(to).map_or(true, |p| p.color != self.color)
            && !board.will_be_check(from, to, Some(self.color))
    }

    fn can_slide(&self, board: &Board, from: Square, to: Square) -> bool {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        self.slides_along(dx, dy)
            && board.is_path_clear(from, to, Some(self.color))
            && !board.will_be_check(from, to, Some(self.color))
    }

    fn can_king_move(&self, board: &Board, from: Square, to: Square) -> bool {
        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        if dx == 2 && dy == 0 {
            return self.can_castle(board, from, to);
        }
        dx <= 1
            && dy <= 1
            && (dx, dy) != (0, 0)
            && board.get_piece(to).map_or(true, |p| p.color != self.color)
            && !board.will_be_attacked(from, to, self.color)
    }

    fn can_castle(&self, board: &Board, from: Square, to: Square) -> bool {
        if !self.unmoved || from.x != KING_HOME_X || board.is_attacked(from, self.color) {
            return false;
        }
        let step = (to.x - from.x).signum();
        let tower_sq = Square::new(if step < 0 { 0 } else { BOARD_SIZE - 1 }, from.y);
        let tower_ready = board.get_piece(tower_sq).is_some_and(|p| {
            p.piece_type == PieceType::Tower && p.color == self.color && p.unmoved
        });

        tower_ready
            && board.is_path_clear(from, tower_sq, Some(self.color.opposite()))
            && !board.will_be_attacked(from, from.offset(step, 0), self.color)
            && !board.will_be_attacked(from, from.offset(step * 2, 0), self.color)
    }
}
