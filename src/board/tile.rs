//! Grid coordinates and tiles

use crate::core::{PlayerId, UnitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate; (0, 0) is the top-left tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn chebyshev(&self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// One of the eight surrounding tiles (diagonals count)
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.chebyshev(other) == 1
    }

    /// The four orthogonal neighbours, unchecked against bounds
    pub fn orthogonal_neighbours(&self) -> [Position; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Highlight marker on a tile; drives both display and input validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HighlightMode {
    #[default]
    None,
    Move,
    Attack,
}

/// The unit standing on a tile, with its owner cached for path checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub unit: UnitId,
    pub owner: PlayerId,
}

/// One cell of the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position,
    pub occupant: Option<Occupant>,
    pub highlight: HighlightMode,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Tile {
            position,
            occupant: None,
            highlight: HighlightMode::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Occupied by a unit belonging to someone other than `player`
    pub fn is_enemy_of(&self, player: PlayerId) -> bool {
        self.occupant.is_some_and(|o| o.owner != player)
    }

    pub fn is_friendly_to(&self, player: PlayerId) -> bool {
        self.occupant.is_some_and(|o| o.owner == player)
    }
}
