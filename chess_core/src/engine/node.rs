use crate::engine::{Evaluator, Move};
use crate::logic::board::{Board, Color, Square, NUM_SQUARES};
use crate::logic::pieces::Candidate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::cell::OnceCell;

/// Resumable walk over the legal moves of one side.
///
/// Squares are visited in `order`; on each square owned by the mover the
/// piece is asked for candidates with an increasing index until it reports
/// `Candidate::Exhausted`. Cloning the cursor snapshots the walk.
#[derive(Debug, Clone)]
pub struct MoveCursor {
    order: [u8; NUM_SQUARES],
    position: usize,
    move_index: usize,
}

impl MoveCursor {
    /// Board order, square index 0 first.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sequential() -> Self {
        Self {
            order: std::array::from_fn(|i| i as u8),
            position: 0,
            move_index: 0,
        }
    }

    /// Random square order, fixed for the life of the cursor.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cursor = Self::sequential();
        cursor.order.shuffle(rng);
        cursor
    }

    pub const fn is_exhausted(&self) -> bool {
        self.position >= NUM_SQUARES
    }

    pub fn next_move(&mut self, board: &Board, mover: Color) -> Option<Move> {
        while let Some(&square_index) = self.order.get(self.position) {
            let from = Square::from_index(usize::from(square_index));
            match board.get_piece(from) {
                Some(piece) if piece.color == mover => {
                    let candidate = piece.possible_move(board, from, self.move_index);
                    self.move_index += 1;
                    match candidate {
                        Candidate::Move(to) => return Some(Move::new(from, to)),
                        Candidate::Skip => {}
                        Candidate::Exhausted => self.advance(),
                    }
                }
                _ => self.advance(),
            }
        }
        None
    }

    fn advance(&mut self) {
        self.position += 1;
        self.move_index = 0;
    }
}

/// Legal moves of `mover` in board order.
pub struct LegalMoves<'a> {
    board: &'a Board,
    mover: Color,
    cursor: MoveCursor,
}

impl<'a> LegalMoves<'a> {
    pub fn new(board: &'a Board, mover: Color) -> Self {
        Self {
            board,
            mover,
            cursor: MoveCursor::sequential(),
        }
    }
}

impl Iterator for LegalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        self.cursor.next_move(self.board, self.mover)
    }
}

/// One position in the search tree. Children are generated lazily, one per
/// call, so siblings that get pruned are never built.
#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    root_player: Color,
    to_move: Color,
    last_move: Option<Move>,
    heuristic: OnceCell<i32>,
    children: Vec<SearchNode>,
    cursor: MoveCursor,
}

impl SearchNode {
    pub fn new(
        board: Board,
        root_player: Color,
        to_move: Color,
        last_move: Option<Move>,
        cursor: MoveCursor,
    ) -> Self {
        Self {
            board,
            root_player,
            to_move,
            last_move,
            heuristic: OnceCell::new(),
            children: Vec::new(),
            cursor,
        }
    }

    /// Root of a search for `player`, who is also the side to move.
    pub fn root<R: Rng + ?Sized>(board: Board, player: Color, rng: &mut R) -> Self {
        Self::new(board, player, player, None, MoveCursor::shuffled(rng))
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn to_move(&self) -> Color {
        self.to_move
    }

    pub const fn root_player(&self) -> Color {
        self.root_player
    }

    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[SearchNode] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut SearchNode> {
        self.children.get_mut(index)
    }

    /// Evaluation from the root player's side, computed on first use.
    pub fn heuristic<E: Evaluator + ?Sized>(&self, evaluator: &E) -> i32 {
        *self
            .heuristic
            .get_or_init(|| evaluator.evaluate(&self.board, self.root_player))
    }

    /// Appends the next child and returns it, or `None` once every legal move
    /// has been expanded.
    pub fn generate_next_child<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<&mut SearchNode> {
        let mv = self.cursor.next_move(&self.board, self.to_move)?;
        let mut board = self.board.clone();
        board.move_piece(mv.from, mv.to);
        self.children.push(Self::new(
            board,
            self.root_player,
            self.to_move.opposite(),
            Some(mv),
            MoveCursor::shuffled(rng),
        ));
        log::trace!("expanded {} ({} children so far)", mv, self.children.len());
        self.children.last_mut()
    }

    /// True if a child exists or one more could be generated.
    pub fn can_have_children(&self) -> bool {
        !self.children.is_empty()
            || self
                .cursor
                .clone()
                .next_move(&self.board, self.to_move)
                .is_some()
    }

    pub fn is_terminal(&self) -> bool {
        !self.can_have_children()
    }

    /// Frees the subtree below this node. The node keeps its own board and
    /// cached heuristic.
    pub fn discard_children(&mut self) {
        self.children = Vec::new();
    }

    pub fn take_child(&mut self, index: usize) -> Option<SearchNode> {
        (index < self.children.len()).then(|| self.children.swap_remove(index))
    }

    pub fn into_board(self) -> Board {
        self.board
    }
}

/// Whether `player` (or, with `None`, each side) has at least one legal move.
pub fn possible_move_exist(board: &Board, player: Option<Color>) -> bool {
    let has_move = |color: Color| {
        !SearchNode::new(board.clone(), color, color, None, MoveCursor::sequential()).is_terminal()
    };
    match player {
        Some(color) => has_move(color),
        None => has_move(Color::White) && has_move(Color::Black),
    }
}
