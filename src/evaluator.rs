//! Static evaluation of positions that are not yet won

use crate::board::{goal_mask, Board, Color, GoalEdge};

/// Score of a position where the evaluated color has a network
pub const WIN_SCORE: i32 = 100;
/// Score of a position where the opponent has a network
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Bonus for each goal edge holding at least one piece
pub const GOAL_EDGE_SCORE: i32 = 5;
/// Bonus per piece of the longest chain
pub const CHAIN_PIECE_SCORE: i32 = 10;

/// Scores the board from the point of view of `color`
///
/// Completed networks dominate, otherwise the score is the difference of the
/// two colors' goal edge and longest chain bonuses.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let opponent = color.opponent();
    if board.has_network(color) {
        return WIN_SCORE;
    }
    if board.has_network(opponent) {
        return LOSS_SCORE;
    }
    heuristic_score(board, color) - heuristic_score(board, opponent)
}

fn heuristic_score(board: &Board, color: Color) -> i32 {
    let goal_edges = [GoalEdge::Start, GoalEdge::End]
        .iter()
        .filter(|&&edge| board.mask(color) & goal_mask(color, edge) != 0)
        .count() as i32;

    goal_edges * GOAL_EDGE_SCORE + board.longest_chain(color) as i32 * CHAIN_PIECE_SCORE
}
