use crate::engine::config::EngineConfig;
use crate::engine::node::possible_move_exist;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, Score, Searcher};
use crate::logic::board::{Board, Color, Square};
use crate::logic::game::Player;
use crate::logic::pieces::{Piece, PieceType};
use std::sync::Arc;

fn sq(x: i32, y: i32) -> Square {
    Square::new(x, y)
}

/// Black king boxed in behind its own pawns, white tower free to reach row 0.
fn back_rank_position() -> Board {
    let mut board = Board::empty();
    board.set_piece(sq(6, 0), Some(Piece::new(PieceType::King, Color::Black)));
    for x in 5..8 {
        board.set_piece(sq(x, 1), Some(Piece::new(PieceType::Pawn, Color::Black)));
    }
    board.set_piece(sq(0, 7), Some(Piece::new(PieceType::Tower, Color::White)));
    board.set_piece(sq(6, 7), Some(Piece::new(PieceType::King, Color::White)));
    board
}

fn engine(seed: u64) -> AlphaBetaEngine {
    AlphaBetaEngine::new(Arc::new(EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    }))
}

#[test]
fn test_back_rank_mate_in_one() {
    let board = back_rank_position();
    let white = Player::new(Color::White, 1);

    for seed in 0..8 {
        let result = engine(seed).search(&board, &white).unwrap();
        assert_eq!(result.mv, Move::new(sq(0, 7), sq(0, 0)), "seed {seed}");
        assert!(result.board.is_checkmate(Some(Color::Black)));
        assert!(!possible_move_exist(&result.board, Some(Color::Black)));
        assert!(result.score > Score::Finite(9_000));
    }
}

#[test]
fn test_mate_found_through_deeper_search() {
    let board = back_rank_position();
    let next = engine(3)
        .get_best_move(&board, &Player::new(Color::White, 3))
        .unwrap();
    assert!(next.is_checkmate(Some(Color::Black)));
}

#[test]
fn test_mated_side_has_no_move() {
    let mut board = back_rank_position();
    board.move_piece(sq(0, 7), sq(0, 0));
    let black = Player::new(Color::Black, 2);
    assert!(engine(0).search(&board, &black).is_none());
}

#[test]
fn test_checkmate_without_side_given() {
    let mut board = back_rank_position();
    assert!(!board.is_checkmate(None));
    board.move_piece(sq(0, 7), sq(0, 0));
    assert!(board.is_check(None));
    assert!(!possible_move_exist(&board, None));
    assert!(board.is_checkmate(None));
    assert!(!board.is_checkmate(Some(Color::White)));
}
