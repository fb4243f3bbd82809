//! Map identifiers, tile coordinates and directions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A map, identified by its `(group, number)` pair in the game's map table.
///
/// The same pair means different maps in different [`MapFamily`](crate::MapFamily)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId {
    pub group: u8,
    pub number: u8,
}

impl MapId {
    pub const fn new(group: u8, number: u8) -> Self {
        Self { group, number }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.group, self.number)
    }
}

/// Local tile coordinates within a map.
///
/// Stored as `i16` to match the engine's signed 16-bit position fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x: i16,
    pub y: i16,
}

impl Coords {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Offset by a delta. Wraps instead of panicking so garbage input stays garbage.
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

impl From<(i16, i16)> for Coords {
    fn from((x, y): (i16, i16)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing or movement direction on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Decode the engine's 4-bit direction code (`DIR_SOUTH = 1` .. `DIR_EAST = 4`).
    ///
    /// `DIR_NONE` and any out-of-range value decode to `None`.
    pub fn from_engine_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Direction::Down),
            2 => Some(Direction::Up),
            3 => Some(Direction::Left),
            4 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn engine_code(self) -> u8 {
        match self {
            Direction::Down => 1,
            Direction::Up => 2,
            Direction::Left => 3,
            Direction::Right => 4,
        }
    }

    /// The tile one step ahead of `coords` in this direction.
    pub fn step(self, coords: Coords) -> Coords {
        match self {
            Direction::Up => coords.offset(0, -1),
            Direction::Down => coords.offset(0, 1),
            Direction::Left => coords.offset(-1, 0),
            Direction::Right => coords.offset(1, 0),
        }
    }

    /// Direction of the next step from `from` towards `to`.
    ///
    /// Horizontal distance is closed first. Returns `None` when already there.
    pub fn towards(from: Coords, to: Coords) -> Option<Self> {
        if to.x > from.x {
            Some(Direction::Right)
        } else if to.x < from.x {
            Some(Direction::Left)
        } else if to.y > from.y {
            Some(Direction::Down)
        } else if to.y < from.y {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        f.write_str(name)
    }
}
