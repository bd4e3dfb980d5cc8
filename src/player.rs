//! Players and the machine player

use tracing::debug;

use crate::{
    board::{Board, Color},
    moves::Move,
    search::{SearchConfig, Solver},
};

/// What a game harness needs from a player
///
/// Every player keeps its own board and is told about the other side's moves.
pub trait Player {
    fn color(&self) -> Color;

    /// Chooses a move, records it on the player's board and returns it.
    /// Returns `None` if there is no move to make.
    fn choose_move(&mut self) -> Option<Move>;

    /// Records a move by the opponent if it is legal, returning false and
    /// leaving the board untouched otherwise
    fn opponent_move(&mut self, opponent_move: Move) -> bool;

    /// Records a move by this player if it is legal, returning false and
    /// leaving the board untouched otherwise. Used to set up positions.
    fn force_move(&mut self, forced_move: Move) -> bool;
}

/// A player choosing its moves with game tree search
pub struct MachinePlayer {
    color: Color,
    config: SearchConfig,
    board: Board,
}

impl MachinePlayer {
    pub fn new(color: Color) -> Self {
        Self::with_config(color, SearchConfig::default())
    }

    pub fn with_config(color: Color, config: SearchConfig) -> Self {
        Self {
            color,
            config,
            board: Board::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    fn record(&mut self, candidate: Move, color: Color) -> bool {
        if !self.board.is_legal(candidate, color) {
            debug!(%color, %candidate, "rejected illegal move");
            return false;
        }
        self.board.apply(candidate, color);
        true
    }
}

impl Player for MachinePlayer {
    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self) -> Option<Move> {
        let color = self.color;
        let best_move = Solver::new(&mut self.board, color)
            .with_config(self.config)
            .find_best();

        // a decided position leaves the search without a move, play anything legal
        let chosen = match best_move {
            Some(best_move) => best_move,
            None => self.board.legal_moves(color).into_iter().next()?,
        };
        self.board.apply(chosen, color);
        Some(chosen)
    }

    fn opponent_move(&mut self, opponent_move: Move) -> bool {
        self.record(opponent_move, self.color.opponent())
    }

    fn force_move(&mut self, forced_move: Move) -> bool {
        self.record(forced_move, self.color)
    }
}
