use crate::engine::config::EngineConfig;
use crate::engine::eval::PositionEvaluator;
use crate::engine::node::SearchNode;
use crate::engine::{Evaluator, Score, SearchResult, SearchStats, Searcher};
use crate::logic::board::Board;
use crate::logic::game::Player;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared flag that asks a search to wind down. Once raised, the remaining
/// nodes are scored as leaves and the best move so far is returned. A stop
/// raised between searches applies to the next one. The flag is cleared
/// whenever a search returns.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Value of a subtree and the child that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcome {
    score: Score,
    best_child: Option<usize>,
}

impl Outcome {
    const fn leaf(score: i32) -> Self {
        Self {
            score: Score::Finite(score),
            best_child: None,
        }
    }
}

pub struct AlphaBetaEngine<E = PositionEvaluator> {
    config: Arc<EngineConfig>,
    evaluator: E,
    rng: StdRng,
    stop: StopHandle,
    nodes_searched: u64,
    cutoffs: u64,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        let evaluator = PositionEvaluator::new(config.clone());
        Self::with_evaluator(config, evaluator)
    }
}

impl<E: Evaluator> AlphaBetaEngine<E> {
    /// Engine scoring leaves with `evaluator`. Weights in `config` only
    /// reach the evaluator if it was built from the same config.
    pub fn with_evaluator(config: Arc<EngineConfig>, evaluator: E) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            evaluator,
            config,
            rng,
            stop: StopHandle::default(),
            nodes_searched: 0,
            cutoffs: 0,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle for stopping the search from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Position one ply below `board` on the best line for `player`.
    pub fn get_best_move(&mut self, board: &Board, player: &Player) -> Option<Board> {
        self.search(board, player).map(|result| result.board)
    }

    fn should_stop(&self) -> bool {
        if self
            .config
            .max_nodes
            .is_some_and(|max| self.nodes_searched >= max)
        {
            self.stop.stop();
        }
        self.stop.is_stopped()
    }

    /// Minimax with alpha-beta pruning over lazily generated children.
    /// Scores are always from the root player's side. The root (`ply == 0`)
    /// always expands at least one child, even once stopped.
    fn alpha_beta(
        &mut self,
        node: &mut SearchNode,
        depth: u8,
        ply: u8,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Outcome {
        self.nodes_searched += 1;

        let stopped = self.should_stop();
        if depth == 0 || (stopped && ply > 0) || node.is_terminal() {
            return Outcome::leaf(node.heuristic(&self.evaluator));
        }

        let mut best = if maximizing {
            Score::NegativeInfinity
        } else {
            Score::PositiveInfinity
        };
        let mut best_child = None;

        loop {
            if node.generate_next_child(&mut self.rng).is_none() {
                break;
            }
            let index = node.child_count() - 1;
            let Some(child) = node.child_mut(index) else {
                break;
            };
            let score = self
                .alpha_beta(child, depth - 1, ply + 1, alpha, beta, !maximizing)
                .score;
            child.discard_children();

            if maximizing {
                if score > best {
                    best = score;
                    best_child = Some(index);
                }
                if best > alpha {
                    alpha = best;
                }
            } else {
                if score < best {
                    best = score;
                    best_child = Some(index);
                }
                if best < beta {
                    beta = best;
                }
            }

            if alpha >= beta {
                self.cutoffs += 1;
                break;
            }
            if best_child.is_some() && self.stop.is_stopped() {
                break;
            }
        }

        Outcome {
            score: best,
            best_child,
        }
    }
}

impl<E: Evaluator> Searcher for AlphaBetaEngine<E> {
    fn search(&mut self, board: &Board, player: &Player) -> Option<SearchResult> {
        let depth = player.ai_level;
        if depth == 0 {
            log::warn!("{:?} has no search depth, nothing to do", player.color);
            return None;
        }

        self.nodes_searched = 0;
        self.cutoffs = 0;
        let start = Instant::now();

        let mut root = SearchNode::root(board.clone(), player.color, &mut self.rng);
        let outcome = self.alpha_beta(
            &mut root,
            depth,
            0,
            Score::NegativeInfinity,
            Score::PositiveInfinity,
            true,
        );

        let stopped = self.stop.is_stopped();
        self.stop.reset();
        if stopped {
            log::warn!(
                "search for {:?} stopped after {} nodes",
                player.color,
                self.nodes_searched
            );
        }

        let Some(child) = outcome.best_child.and_then(|index| root.take_child(index)) else {
            log::warn!("no legal move for {:?}", player.color);
            return None;
        };
        let mv = child.last_move()?;

        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            cutoffs: self.cutoffs,
            time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        log::debug!(
            "depth {} best {} score {:?} nodes {} cutoffs {} in {}ms",
            stats.depth,
            mv,
            outcome.score,
            stats.nodes,
            stats.cutoffs,
            stats.time_ms
        );

        Some(SearchResult {
            board: child.into_board(),
            mv,
            score: outcome.score,
            stats,
        })
    }
}
