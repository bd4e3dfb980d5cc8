//! Connections between pieces and the search for networks
//!
//! Two pieces of the same color are connected when they lie on a common row,
//! column or diagonal with only empty squares between them. A network is a
//! chain of at least six connected pieces running from one goal edge of a
//! color to the other, using no piece twice and never continuing in the same
//! direction across two consecutive links.

use crate::{
    board::{goal_mask, Board, Cell, Color, Coordinate, Direction, GoalEdge},
    MAX_NETWORK_LENGTH, MIN_NETWORK_LENGTH,
};

/// The pieces connected to one square, at most one per direction
pub struct Connections {
    size: usize,
    links: [(Coordinate, Direction); 8],
}

impl Connections {
    fn new() -> Self {
        Self {
            size: 0,
            links: [(Coordinate::new(0, 0), Direction::Up); 8],
        }
    }
    fn push(&mut self, square: Coordinate, direction: Direction) {
        self.links[self.size] = (square, direction);
        self.size += 1;
    }
    pub fn len(&self) -> usize {
        self.size
    }
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Iterator for Connections {
    type Item = (Coordinate, Direction);

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some(self.links[self.size])
            }
        }
    }
}

impl Board {
    /// Finds the nearest piece of the same color in each direction from
    /// `square`, stopping each ray at the first occupied square
    ///
    /// An empty `square` has no connections.
    pub fn connections(&self, square: Coordinate) -> Connections {
        let mut connections = Connections::new();
        let color = match self.cell(square).color() {
            Some(color) => color,
            None => return connections,
        };
        let own = Cell::from(color);

        // pushed in reverse so the iterator yields them in compass order
        for &direction in Direction::ALL.iter().rev() {
            let mut ray = square.offset(direction);
            while let Some(next) = ray {
                match self.cell(next) {
                    Cell::Empty => ray = next.offset(direction),
                    cell if cell == own => {
                        connections.push(next, direction);
                        break;
                    }
                    // blocked by the opponent
                    _ => break,
                }
            }
        }
        connections
    }

    /// Returns true if `color` has a completed network on the board
    pub fn has_network(&self, color: Color) -> bool {
        self.find_network(color).is_some()
    }

    /// Returns the first network found for `color`, ordered from the start
    /// goal edge to the end goal edge
    pub fn find_network(&self, color: Color) -> Option<Vec<Coordinate>> {
        // a network needs six pieces and a piece in each goal
        if self.num_pieces(color) < MIN_NETWORK_LENGTH
            || self.mask(color) & goal_mask(color, GoalEdge::Start) == 0
            || self.mask(color) & goal_mask(color, GoalEdge::End) == 0
        {
            return None;
        }

        let mut search = ChainSearch::new(self, color);
        for start in self.goal_pieces(color, GoalEdge::Start) {
            if search.extend(start, 1, None) {
                return Some(search.path);
            }
        }
        None
    }

    /// Decides the game after a move by `last_mover`
    ///
    /// A move completing networks for both colors loses for the player who made it.
    pub fn winner(&self, last_mover: Color) -> Option<Color> {
        let opponent = last_mover.opponent();
        if self.has_network(opponent) {
            Some(opponent)
        } else if self.has_network(last_mover) {
            Some(last_mover)
        } else {
            None
        }
    }

    /// Length of the longest chain from the start goal edge of `color`
    ///
    /// Chains follow the same rules as networks and end when they reach the
    /// end goal edge, so a result of six or more does not mean `color` has a
    /// network unless the chain actually reached the far edge.
    pub fn longest_chain(&self, color: Color) -> usize {
        let mut search = ChainSearch::new(self, color);
        self.goal_pieces(color, GoalEdge::Start)
            .map(|start| search.longest(start, 1, None))
            .max()
            .unwrap_or(0)
    }
}

/// Backtracking search over the connections of one color
///
/// `path` holds the pieces of the chain being built, `visited` the same
/// pieces as a mask.
struct ChainSearch<'a> {
    board: &'a Board,
    end_goal: u64,
    path: Vec<Coordinate>,
    visited: u64,
}

impl<'a> ChainSearch<'a> {
    fn new(board: &'a Board, color: Color) -> Self {
        Self {
            board,
            end_goal: goal_mask(color, GoalEdge::End),
            path: Vec::with_capacity(MAX_NETWORK_LENGTH),
            visited: 0,
        }
    }

    fn push(&mut self, square: Coordinate) {
        self.path.push(square);
        self.visited |= square.bit();
    }

    fn pop(&mut self) {
        if let Some(square) = self.path.pop() {
            self.visited &= !square.bit();
        }
    }

    /// Tries to complete a network through `current`, which would be piece
    /// number `pieces_used` of the chain. On success `path` holds the network.
    fn extend(
        &mut self,
        current: Coordinate,
        pieces_used: usize,
        last_direction: Option<Direction>,
    ) -> bool {
        if pieces_used > MAX_NETWORK_LENGTH {
            return false;
        }
        if self.end_goal & current.bit() != 0 {
            if pieces_used >= MIN_NETWORK_LENGTH {
                self.path.push(current);
                return true;
            }
            return false;
        }
        if self.visited & current.bit() != 0 {
            return false;
        }

        self.push(current);
        for (next, direction) in self.board.connections(current) {
            if Some(direction) == last_direction {
                continue;
            }
            if self.extend(next, pieces_used + 1, Some(direction)) {
                return true;
            }
        }
        self.pop();
        false
    }

    /// Longest chain starting with the current path and continuing through
    /// `current`, counted in pieces
    fn longest(
        &mut self,
        current: Coordinate,
        pieces_used: usize,
        last_direction: Option<Direction>,
    ) -> usize {
        if self.visited & current.bit() != 0 {
            return pieces_used - 1;
        }
        if self.end_goal & current.bit() != 0 || pieces_used >= MAX_NETWORK_LENGTH {
            return pieces_used.min(MAX_NETWORK_LENGTH);
        }

        self.push(current);
        let mut max = pieces_used;
        for (next, direction) in self.board.connections(current) {
            if Some(direction) == last_direction {
                continue;
            }
            max = max.max(self.longest(next, pieces_used + 1, Some(direction)));
        }
        self.pop();
        max
    }
}
