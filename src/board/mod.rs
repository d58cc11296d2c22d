//! Board model: tiles, occupancy, highlighting and reachability

pub mod grid;
pub mod reach;
pub mod tile;

pub use grid::{Board, BOARD_HEIGHT, BOARD_WIDTH};
pub use reach::MOVE_RANGE;
pub use tile::{HighlightMode, Occupant, Position, Tile};
