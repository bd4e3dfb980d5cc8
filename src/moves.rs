//! Moves and their text and wire forms

use anyhow::{anyhow, Result};
use byteorder::{ReadBytesExt, WriteBytesExt};

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::{board::Coordinate, BOARD_SIZE};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MoveKind {
    Add = 0,
    Step = 1,
}

/// A move for one color
///
/// `Add` places a piece from the reserve, `Step` relocates a piece already on
/// the board and is only possible once the reserve is empty.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Move {
    Add { to: Coordinate },
    Step { to: Coordinate, from: Coordinate },
}

impl Move {
    pub fn add(x: usize, y: usize) -> Self {
        Move::Add {
            to: Coordinate::new(x, y),
        }
    }

    pub fn step(to_x: usize, to_y: usize, from_x: usize, from_y: usize) -> Self {
        Move::Step {
            to: Coordinate::new(to_x, to_y),
            from: Coordinate::new(from_x, from_y),
        }
    }

    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Add { .. } => MoveKind::Add,
            Move::Step { .. } => MoveKind::Step,
        }
    }

    /// The square the moving piece lands on
    pub fn to(&self) -> Coordinate {
        match *self {
            Move::Add { to } | Move::Step { to, .. } => to,
        }
    }

    /// Writes the move as a kind byte followed by the destination and, for a
    /// step, the source square
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.kind() as u8)?;
        let squares = match *self {
            Move::Add { to } => vec![to],
            Move::Step { to, from } => vec![to, from],
        };
        for square in squares {
            writer.write_u8(square.x as u8)?;
            writer.write_u8(square.y as u8)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let kind = reader.read_u8()?;
        let to = read_coordinate(reader)?;
        match kind {
            0 => Ok(Move::Add { to }),
            1 => Ok(Move::Step {
                to,
                from: read_coordinate(reader)?,
            }),
            _ => Err(anyhow!("Invalid move kind tag {}", kind)),
        }
    }
}

fn read_coordinate<R: Read>(reader: &mut R) -> Result<Coordinate> {
    let x = reader.read_u8()? as usize;
    let y = reader.read_u8()? as usize;
    let square = Coordinate::new(x, y);
    if !square.on_board() {
        return Err(anyhow!("Invalid square {}, outside of the board", square));
    }
    Ok(square)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Add { to } => write!(f, "{} {}", to.x, to.y),
            Move::Step { to, from } => write!(f, "{} {} {} {}", to.x, to.y, from.x, from.y),
        }
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    /// Parses `"x y"` as an add and `"x y fx fy"` as a step to (x, y) from (fx, fy)
    fn from_str(s: &str) -> Result<Self> {
        let mut values = Vec::with_capacity(4);
        for token in s.split_whitespace() {
            match token.parse::<usize>() {
                Ok(value) if value < BOARD_SIZE => values.push(value),
                _ => return Err(anyhow!("could not parse '{}' as a board index", token)),
            }
        }
        match values[..] {
            [x, y] => Ok(Move::add(x, y)),
            [x, y, from_x, from_y] => Ok(Move::step(x, y, from_x, from_y)),
            _ => Err(anyhow!(
                "Invalid move '{}', expected 'x y' or 'x y from_x from_y'",
                s.trim()
            )),
        }
    }
}
