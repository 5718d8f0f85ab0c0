use crate::logic::eval_constants::{
    CHECK_BONUS, CHECK_PENALTY, MATE_SCORE, STALEMATE_PENALTY, VAL_BISHOP, VAL_KING, VAL_KNIGHT,
    VAL_PAWN, VAL_QUEEN, VAL_TOWER,
};
use crate::logic::pieces::PieceType;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read engine config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters (tenths of a pawn)
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_tower: i32,
    pub val_queen: i32,
    pub val_king: i32,

    pub mate_score: i32,
    pub check_penalty: i32,
    pub check_bonus: i32,
    pub stalemate_penalty: i32, // Applied whichever side is stalemated

    // Search Parameters
    pub seed: Option<u64>,
    pub max_nodes: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_tower: VAL_TOWER,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,

            mate_score: MATE_SCORE,
            check_penalty: CHECK_PENALTY,
            check_bonus: CHECK_BONUS,
            stalemate_penalty: STALEMATE_PENALTY,

            seed: None,
            max_nodes: None,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_tower: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,

    mate_score: Option<f32>,
    check_penalty: Option<f32>,
    check_bonus: Option<f32>,
    stalemate_penalty: Option<f32>,

    seed: Option<u64>,
    max_nodes: Option<u64>,
}

impl EngineConfig {
    /// Parses a tuning file where every weight is a multiplier of its default.
    /// `seed` and `max_nodes` are taken as-is.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_tower: apply_scale(default.val_tower, json_config.val_tower),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),

            mate_score: apply_scale(default.mate_score, json_config.mate_score),
            check_penalty: apply_scale(default.check_penalty, json_config.check_penalty),
            check_bonus: apply_scale(default.check_bonus, json_config.check_bonus),
            stalemate_penalty: apply_scale(
                default.stalemate_penalty,
                json_config.stalemate_penalty,
            ),

            seed: json_config.seed,
            max_nodes: json_config.max_nodes,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::load_from_json(&text)?)
    }

    pub const fn piece_value(&self, piece_type: PieceType) -> i32 {
        match piece_type {
            PieceType::Pawn => self.val_pawn,
            PieceType::Knight => self.val_knight,
            PieceType::Bishop => self.val_bishop,
            PieceType::Tower => self.val_tower,
            PieceType::Queen => self.val_queen,
            PieceType::King => self.val_king,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}
