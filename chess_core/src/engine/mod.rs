use crate::logic::board::{Board, Color, Square};
use crate::logic::game::Player;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod node;
pub mod search;

#[cfg(test)]
mod mate_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Search value with explicit infinities. The derived order puts every
/// finite value strictly between the two bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Score {
    NegativeInfinity,
    Finite(i32),
    PositiveInfinity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub cutoffs: u64,
    pub time_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Position after the chosen move.
    pub board: Board,
    pub mv: Move,
    /// Backed-up value of the best line, from the mover's side.
    pub score: Score,
    pub stats: SearchStats,
}

pub trait Evaluator {
    fn evaluate(&self, board: &Board, player: Color) -> i32;
}

pub trait Searcher {
    fn search(&mut self, board: &Board, player: &Player) -> Option<SearchResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_order() {
        assert!(Score::NegativeInfinity < Score::Finite(i32::MIN));
        assert!(Score::Finite(i32::MAX) < Score::PositiveInfinity);
        assert!(Score::Finite(-5) < Score::Finite(3));
        assert_eq!(
            Score::Finite(7).max(Score::NegativeInfinity),
            Score::Finite(7)
        );
    }
}
