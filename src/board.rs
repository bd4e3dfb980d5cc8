use anyhow::{anyhow, Result};

use std::fmt;

use crate::{moves::Move, BOARD_SIZE, PIECES_PER_COLOR};

mod static_masks {
    use crate::BOARD_SIZE;

    pub const fn row_mask(y: usize) -> u64 {
        0xff << (y * BOARD_SIZE)
    }
    pub const fn column_mask(x: usize) -> u64 {
        0x0101_0101_0101_0101 << x
    }
    pub const fn corner_mask() -> u64 {
        1 | 1 << (BOARD_SIZE - 1)
            | 1 << (BOARD_SIZE * (BOARD_SIZE - 1))
            | 1 << (BOARD_SIZE * BOARD_SIZE - 1)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// A square of the board, `x` is the column and `y` the row
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Coordinate {
    pub x: usize,
    pub y: usize,
}

impl Coordinate {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn on_board(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    pub fn is_corner(&self) -> bool {
        self.on_board() && self.bit() & static_masks::corner_mask() != 0
    }

    /// The square one step away in `direction`, if it is still on the board
    pub fn offset(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 || x >= BOARD_SIZE as i32 || y >= BOARD_SIZE as i32 {
            None
        } else {
            Some(Self::new(x as usize, y as usize))
        }
    }

    // only meaningful for on-board squares
    pub(crate) fn bit(&self) -> u64 {
        1 << (self.x + BOARD_SIZE * self.y)
    }

    fn from_index(index: usize) -> Self {
        Self::new(index % BOARD_SIZE, index / BOARD_SIZE)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight compass directions, with `Up` pointing towards row 0
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        }
    }
}

/// One of the two opposite edges a color has to connect
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GoalEdge {
    Start,
    End,
}

/// Mask of a goal edge, corners excluded. Black connects the top and bottom
/// rows, White the left and right columns.
pub fn goal_mask(color: Color, edge: GoalEdge) -> u64 {
    let line = match (color, edge) {
        (Color::Black, GoalEdge::Start) => static_masks::row_mask(0),
        (Color::Black, GoalEdge::End) => static_masks::row_mask(BOARD_SIZE - 1),
        (Color::White, GoalEdge::Start) => static_masks::column_mask(0),
        (Color::White, GoalEdge::End) => static_masks::column_mask(BOARD_SIZE - 1),
    };
    line & !static_masks::corner_mask()
}

/// Mask of both goal edges of `color`
pub fn goal_area(color: Color) -> u64 {
    goal_mask(color, GoalEdge::Start) | goal_mask(color, GoalEdge::End)
}

/// Mask of the up to eight squares touching `square`
pub(crate) fn neighbourhood(square: Coordinate) -> u64 {
    Direction::ALL
        .iter()
        .filter_map(|&direction| square.offset(direction))
        .fold(0, |mask, neighbour| mask | neighbour.bit())
}

/// Iterates over the squares of a mask in row-major order
#[derive(Copy, Clone, Debug)]
pub struct Squares(u64);

impl Squares {
    pub fn new(mask: u64) -> Self {
        Self(mask)
    }
}

impl Iterator for Squares {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        match self.0 {
            0 => None,
            mask => {
                // clear the lowest set bit
                self.0 &= mask - 1;
                Some(Coordinate::from_index(mask.trailing_zeros() as usize))
            }
        }
    }
}

/// The state of a game in progress
///
/// # Notes
/// Each color's pieces are stored as a 64-bit occupancy mask with one bit per
/// square, `x + 8 * y`. Pieces not yet on the board are counted in the color's
/// reserve, so `reserve + pieces on board == 10` holds for both colors.
///
/// Moves are made with [`Board::apply`] and taken back with [`Board::undo`],
/// which must be called in matching LIFO order. The game tree search relies
/// on this instead of copying the board.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board {
    masks: [u64; 2],
    reserves: [usize; 2],
}

impl Board {
    pub fn new() -> Self {
        Self {
            masks: [0; 2],
            reserves: [PIECES_PER_COLOR; 2],
        }
    }

    /// Creates a board from eight rows of `.`, `B` and `W`, row 0 first
    ///
    /// Reserves are whatever pieces of each color are not on the board.
    pub fn from_diagram<S: AsRef<str>>(diagram: S) -> Result<Self> {
        let mut board = Self::new();

        let rows: Vec<&str> = diagram
            .as_ref()
            .lines()
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return Err(anyhow!(
                "Invalid diagram, expected {} rows but found {}",
                BOARD_SIZE,
                rows.len()
            ));
        }

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_SIZE {
                return Err(anyhow!(
                    "Invalid diagram, row {} has {} squares instead of {}",
                    y,
                    row.chars().count(),
                    BOARD_SIZE
                ));
            }
            for (x, square_char) in row.chars().enumerate() {
                let square = Coordinate::new(x, y);
                let color = match square_char {
                    '.' => continue,
                    'B' | 'b' => Color::Black,
                    'W' | 'w' => Color::White,
                    _ => {
                        return Err(anyhow!(
                            "could not parse '{}' at {} as a square",
                            square_char,
                            square
                        ))
                    }
                };
                if square.is_corner() {
                    return Err(anyhow!("Invalid diagram, corner {} is occupied", square));
                }
                board.masks[color.index()] |= square.bit();
            }
        }

        for &color in [Color::Black, Color::White].iter() {
            let on_board = board.num_pieces(color);
            if on_board > PIECES_PER_COLOR {
                return Err(anyhow!(
                    "Invalid diagram, {} has {} pieces on the board",
                    color,
                    on_board
                ));
            }
            board.reserves[color.index()] = PIECES_PER_COLOR - on_board;
        }
        Ok(board)
    }

    /// Contents of the square at (x, y), or `Cell::Empty` off the board
    pub fn read(&self, x: i32, y: i32) -> Cell {
        if x < 0 || y < 0 || x >= BOARD_SIZE as i32 || y >= BOARD_SIZE as i32 {
            return Cell::Empty;
        }
        self.cell(Coordinate::new(x as usize, y as usize))
    }

    pub fn cell(&self, square: Coordinate) -> Cell {
        if !square.on_board() {
            Cell::Empty
        } else if self.masks[Color::Black.index()] & square.bit() != 0 {
            Cell::Black
        } else if self.masks[Color::White.index()] & square.bit() != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    pub fn mask(&self, color: Color) -> u64 {
        self.masks[color.index()]
    }

    pub fn occupied(&self) -> u64 {
        self.masks[0] | self.masks[1]
    }

    pub fn reserve(&self, color: Color) -> usize {
        self.reserves[color.index()]
    }

    pub fn num_pieces(&self, color: Color) -> usize {
        self.mask(color).count_ones() as usize
    }

    pub fn pieces(&self, color: Color) -> Squares {
        Squares::new(self.mask(color))
    }

    pub fn goal_pieces(&self, color: Color, edge: GoalEdge) -> Squares {
        Squares::new(self.mask(color) & goal_mask(color, edge))
    }

    /// Plays a move for `color` without checking that it is legal
    pub fn apply(&mut self, next_move: Move, color: Color) {
        let i = color.index();
        match next_move {
            Move::Add { to } => {
                self.masks[i] |= to.bit();
                self.reserves[i] -= 1;
            }
            Move::Step { to, from } => {
                self.masks[i] &= !from.bit();
                self.masks[i] |= to.bit();
            }
        }
    }

    /// Takes back a move previously made with [`Board::apply`]
    pub fn undo(&mut self, last_move: Move, color: Color) {
        let i = color.index();
        match last_move {
            Move::Add { to } => {
                self.masks[i] &= !to.bit();
                self.reserves[i] += 1;
            }
            Move::Step { to, from } => {
                self.masks[i] &= !to.bit();
                self.masks[i] |= from.bit();
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let square_char = match self.cell(Coordinate::new(x, y)) {
                    Cell::Empty => '.',
                    Cell::Black => 'B',
                    Cell::White => 'W',
                };
                write!(f, "{}", square_char)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
