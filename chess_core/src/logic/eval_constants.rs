use crate::logic::board::{Color, Square, BOARD_SIZE};
use crate::logic::pieces::PieceType;

// All values are in tenths of a pawn so the half-point table entries stay integral.

// Piece Values
pub const VAL_PAWN: i32 = 10;
pub const VAL_KNIGHT: i32 = 30;
pub const VAL_BISHOP: i32 = 30;
pub const VAL_TOWER: i32 = 50;
pub const VAL_QUEEN: i32 = 100;
pub const VAL_KING: i32 = 0;

// Terminal adjustments
pub const MATE_SCORE: i32 = 10_000;
pub const CHECK_PENALTY: i32 = 500;
pub const CHECK_BONUS: i32 = 50;
pub const STALEMATE_PENALTY: i32 = 500;

// Piece-Square Tables, oriented for white (row 0 is black's back row).
// Black reads them mirrored vertically.

#[rustfmt::skip]
pub const PST_PAWN: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
pub const PST_KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
pub const PST_BISHOP: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
pub const PST_TOWER: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
pub const PST_QUEEN: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
pub const PST_KING: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

const fn get_pst_table(piece_type: PieceType) -> &'static [i32; 64] {
    match piece_type {
        PieceType::Pawn => &PST_PAWN,
        PieceType::Knight => &PST_KNIGHT,
        PieceType::Bishop => &PST_BISHOP,
        PieceType::Tower => &PST_TOWER,
        PieceType::Queen => &PST_QUEEN,
        PieceType::King => &PST_KING,
    }
}

/// Positional bonus for a piece of `color` standing on `sq`. Off-board squares score 0.
pub fn get_pst_value(piece_type: PieceType, color: Color, sq: Square) -> i32 {
    let oriented = match color {
        Color::White => sq,
        Color::Black => Square::new(sq.x, BOARD_SIZE - 1 - sq.y),
    };
    oriented
        .index()
        .and_then(|idx| get_pst_table(piece_type).get(idx).copied())
        .unwrap_or(0)
}
