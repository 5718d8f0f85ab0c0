use crate::engine::{Move, Searcher};
use crate::logic::board::{Board, Color, Square};
use crate::logic::pieces::Piece;
use serde::{Deserialize, Serialize};

/// A side of the game and how many plies its engine looks ahead.
/// Level 0 means the side is played by a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Color,
    pub ai_level: u8,
}

impl Player {
    pub const fn new(color: Color, ai_level: u8) -> Self {
        Self { color, ai_level }
    }

    pub const fn is_ai(&self) -> bool {
        self.ai_level > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,
    #[error("square {0} is off the board")]
    OutOfBounds(Square),
    #[error("no piece at {0}")]
    NoPieceAtSource(Square),
    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Color),
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("{0:?} is not played by the engine")]
    NotAiControlled(Color),
    #[error("the engine found no move for {0:?}")]
    NoMoveFound(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    /// The given side is in check.
    Check(Color),
    Checkmate { winner: Color },
    Stalemate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub players: [Player; 2],
    pub turn: Color,
    pub status: GameStatus,
    pub last_move: Option<Move>,
    pub history: Vec<MoveRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl GameState {
    /// Start position, white to move.
    #[must_use]
    pub fn new(white_level: u8, black_level: u8) -> Self {
        Self::with_board(Board::new(), white_level, black_level, Color::White)
    }

    #[must_use]
    pub fn with_board(board: Board, white_level: u8, black_level: u8, turn: Color) -> Self {
        let mut state = Self {
            board,
            players: [
                Player::new(Color::White, white_level),
                Player::new(Color::Black, black_level),
            ],
            turn,
            status: GameStatus::Playing,
            last_move: None,
            history: Vec::new(),
        };
        state.update_status();
        state
    }

    pub const fn current_player(&self) -> &Player {
        let [white, black] = &self.players;
        match self.turn {
            Color::White => white,
            Color::Black => black,
        }
    }

    pub const fn is_finished(&self) -> bool {
        matches!(
            self.status,
            GameStatus::Checkmate { .. } | GameStatus::Stalemate
        )
    }

    pub fn make_move(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameOver);
        }
        if !from.is_valid() {
            return Err(MoveError::OutOfBounds(from));
        }
        if !to.is_valid() {
            return Err(MoveError::OutOfBounds(to));
        }

        let piece = self
            .board
            .get_piece(from)
            .ok_or(MoveError::NoPieceAtSource(from))?;
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn(piece.color));
        }
        let mv = Move::new(from, to);
        if !piece.can_move(&self.board, from, to) {
            return Err(MoveError::IllegalMove(mv));
        }

        let captured = self.board.get_piece(to);
        self.board.move_piece(from, to);
        self.history.push(MoveRecord {
            mv,
            piece,
            captured,
        });
        self.last_move = Some(mv);
        self.turn = self.turn.opposite();
        self.update_status();
        Ok(())
    }

    /// Lets `engine` pick the move for the side to play and applies it.
    pub fn play_ai_turn<S: Searcher + ?Sized>(
        &mut self,
        engine: &mut S,
    ) -> Result<Move, MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameOver);
        }
        let player = *self.current_player();
        if !player.is_ai() {
            return Err(MoveError::NotAiControlled(player.color));
        }

        let result = engine
            .search(&self.board, &player)
            .ok_or(MoveError::NoMoveFound(player.color))?;
        self.make_move(result.mv.from, result.mv.to)?;
        Ok(result.mv)
    }

    fn update_status(&mut self) {
        let side = self.turn;
        self.status = if self.board.is_checkmate(Some(side)) {
            GameStatus::Checkmate {
                winner: side.opposite(),
            }
        } else if self.board.is_stalemate(Some(side)) {
            GameStatus::Stalemate
        } else if self.board.is_check(Some(side)) {
            GameStatus::Check(side)
        } else {
            GameStatus::Playing
        };
    }
}
