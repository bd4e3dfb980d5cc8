//! An agent for playing the connection board game 'Network'
//!
//! Two colors place ten pieces each on an 8x8 board and then move them,
//! each trying to build a network: a chain of at least six of its pieces
//! linking its two goal edges. This agent picks its moves with a
//! depth-limited game tree search.
//!
//! # Basic Usage
//!
//! ```
//! use network_ai::{
//!     board::Color,
//!     moves::Move,
//!     player::{MachinePlayer, Player},
//!     search::SearchConfig,
//! };
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let config = SearchConfig::default().with_depth(2);
//! let mut player = MachinePlayer::with_config(Color::Black, config);
//!
//! assert!(player.opponent_move("0 3".parse::<Move>()?));
//! let chosen = player.choose_move().ok_or("no legal move")?;
//!
//! assert!(player.board().num_pieces(Color::Black) == 1);
//! assert!(!player.opponent_move(chosen));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod moves;

pub mod rules;

pub mod network;

pub mod evaluator;

pub mod search;

pub mod player;

mod test;

/// The width and height of the game board in squares
pub const BOARD_SIZE: usize = 8;

/// The number of pieces each color plays with
pub const PIECES_PER_COLOR: usize = 10;

/// The minimum number of pieces in a network
pub const MIN_NETWORK_LENGTH: usize = 6;

/// The longest chain the network search will follow
pub const MAX_NETWORK_LENGTH: usize = 10;

// ensure the board fits in a u64 for the occupancy masks
const_assert!(BOARD_SIZE * BOARD_SIZE <= 64);
// a chain can never use more pieces than a color owns
const_assert!(MAX_NETWORK_LENGTH == PIECES_PER_COLOR);
const_assert!(MIN_NETWORK_LENGTH <= MAX_NETWORK_LENGTH);
