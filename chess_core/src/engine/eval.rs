use crate::engine::config::EngineConfig;
use crate::engine::node::possible_move_exist;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Color};
use crate::logic::eval_constants::get_pst_value;
use std::sync::Arc;

/// Material plus piece-square evaluation with mate, check and stalemate terms.
pub struct PositionEvaluator {
    config: Arc<EngineConfig>,
}

impl Default for PositionEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(EngineConfig::default()))
    }
}

impl PositionEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Material and positional balance only. Both terms take the owner's
    /// sign, so the table bonus of the opponent's pieces counts against
    /// `player` whichever color that is.
    pub fn material_balance(&self, board: &Board, player: Color) -> i32 {
        board
            .pieces()
            .map(|(sq, piece)| {
                let value = self.config.piece_value(piece.piece_type) * 2
                    + get_pst_value(piece.piece_type, piece.color, sq);
                if piece.color == player {
                    value
                } else {
                    -value
                }
            })
            .sum()
    }

    // First matching term wins. Move generation only runs for the terms that need it.
    fn terminal_adjustment(&self, board: &Board, player: Color) -> i32 {
        let other = player.opposite();
        let own_check = board.is_check(Some(player));
        let other_check = board.is_check(Some(other));
        let stuck = |color: Color| !possible_move_exist(board, Some(color));

        if own_check && stuck(player) {
            -self.config.mate_score
        } else if other_check && stuck(other) {
            self.config.mate_score
        } else if own_check {
            -self.config.check_penalty
        } else if other_check {
            self.config.check_bonus
        } else if stuck(player) || stuck(other) {
            -self.config.stalemate_penalty
        } else {
            0
        }
    }
}

impl Evaluator for PositionEvaluator {
    fn evaluate(&self, board: &Board, player: Color) -> i32 {
        self.material_balance(board, player) + self.terminal_adjustment(board, player)
    }
}
