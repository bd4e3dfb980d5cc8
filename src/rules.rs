//! Move legality and move generation

use crate::{
    board::{goal_area, neighbourhood, Board, Color, Coordinate, Squares},
    moves::Move,
    BOARD_SIZE,
};

impl Board {
    /// Returns true if `candidate` may be played by `color` on this board
    pub fn is_legal(&self, candidate: Move, color: Color) -> bool {
        let to = candidate.to();

        // the moving piece is not part of the board it lands on
        let own_pieces = match candidate {
            Move::Add { .. } => {
                if self.reserve(color) == 0 {
                    return false;
                }
                self.mask(color)
            }
            Move::Step { from, .. } => {
                if from == to || self.reserve(color) > 0 {
                    return false;
                }
                if !from.on_board() || self.mask(color) & from.bit() == 0 {
                    return false;
                }
                self.mask(color) & !from.bit()
            }
        };

        if !to.on_board() || to.is_corner() || !self.cell(to).is_empty() {
            return false;
        }
        // the opponent's goal edges are closed to this color
        if goal_area(color.opponent()) & to.bit() != 0 {
            return false;
        }
        !creates_cluster(own_pieces, to)
    }

    /// Generates every legal move for `color` in row-major order of the
    /// destination square
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let empty_squares = Squares::new(!self.occupied());

        if self.reserve(color) > 0 {
            empty_squares
                .map(|to| Move::Add { to })
                .filter(|&candidate| self.is_legal(candidate, color))
                .collect()
        } else {
            let mut moves = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
            for to in empty_squares {
                for from in self.pieces(color) {
                    let candidate = Move::Step { to, from };
                    if self.is_legal(candidate, color) {
                        moves.push(candidate);
                    }
                }
            }
            moves
        }
    }
}

/// Returns true if a piece placed on `square` would join a group of three or
/// more touching pieces of `own_pieces`
fn creates_cluster(own_pieces: u64, square: Coordinate) -> bool {
    let touching = neighbourhood(square) & own_pieces;
    match touching.count_ones() {
        0 => false,
        1 => {
            // the single neighbour must not already have a neighbour of its own
            Squares::new(touching)
                .any(|neighbour| neighbourhood(neighbour) & own_pieces != 0)
        }
        _ => true,
    }
}
