//! A game tree search to choose moves

use tracing::debug;

use crate::{
    board::{Board, Color},
    evaluator::{evaluate, LOSS_SCORE, WIN_SCORE},
    moves::Move,
};

/// Search depth used when none is configured
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchConfig {
    /// Number of plies searched below the current position
    pub depth: usize,

    /// Whether the minimizing plies play the opponent's moves.
    /// When false, every ply generates and plays moves for the searching color.
    pub alternate_colors: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            alternate_colors: true,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_alternate_colors(mut self, alternate_colors: bool) -> Self {
        self.alternate_colors = alternate_colors;
        self
    }
}

/// An agent choosing moves for one color
///
/// # Notes
/// The search is a depth-limited minimax with alpha-beta pruning. Every
/// candidate move is applied to the one shared board and undone before the
/// next sibling is tried, so the board is never copied.
///
/// # Position Scoring
/// A position where the searching color has a network scores `WIN_SCORE`,
/// one where the opponent has a network scores `LOSS_SCORE`. Positions at the
/// depth limit are scored with [`evaluate`].
pub struct Solver<'a> {
    board: &'a mut Board,
    color: Color,
    config: SearchConfig,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl<'a> Solver<'a> {
    /// Creates a new `Solver` searching for `color` with the default config
    pub fn new(board: &'a mut Board, color: Color) -> Self {
        Self {
            board,
            color,
            config: SearchConfig::default(),
            node_count: 0,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    fn mover(&self, maximizing: bool) -> Color {
        if maximizing || !self.config.alternate_colors {
            self.color
        } else {
            self.color.opponent()
        }
    }

    /// Performs game tree search
    ///
    /// Returns the best move found, if any move improved on the window, and
    /// the score of the position (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    fn minimax(
        &mut self,
        maximizing: bool,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> (Option<Move>, i32) {
        self.node_count += 1;

        if self.board.has_network(self.color) {
            return (None, WIN_SCORE);
        }
        if self.board.has_network(self.color.opponent()) {
            return (None, LOSS_SCORE);
        }
        if depth == 0 {
            return (None, evaluate(&*self.board, self.color));
        }

        let mut best_move = None;
        let mut best_score = if maximizing { alpha } else { beta };

        let mover = self.mover(maximizing);
        for candidate in self.board.legal_moves(mover) {
            self.board.apply(candidate, mover);
            let (_, score) = self.minimax(!maximizing, depth - 1, alpha, beta);
            self.board.undo(candidate, mover);

            if maximizing && score > best_score {
                best_move = Some(candidate);
                best_score = score;
                alpha = score;
            } else if !maximizing && score < best_score {
                best_move = Some(candidate);
                best_score = score;
                beta = score;
            }
            // the other side already has a better alternative higher up
            if alpha >= beta {
                break;
            }
        }
        (best_move, best_score)
    }

    /// Searches the current position with a full window
    ///
    /// Returns the score of the position and the best move, which is `None`
    /// only if the position is already decided or `color` has no legal move
    pub fn solve(&mut self) -> (i32, Option<Move>) {
        let (best_move, score) = self.minimax(true, self.config.depth, i32::MIN, i32::MAX);

        debug!(
            color = %self.color,
            depth = self.config.depth,
            nodes = self.node_count,
            score,
            best_move = ?best_move,
            "search finished"
        );
        (score, best_move)
    }

    /// Searches the current position and returns only the chosen move
    pub fn find_best(&mut self) -> Option<Move> {
        self.solve().1
    }
}

impl std::ops::Deref for Solver<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &*self.board
    }
}
