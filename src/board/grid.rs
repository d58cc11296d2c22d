//! The tile grid: occupancy, roster and highlight state

use crate::board::{HighlightMode, Occupant, Position, Tile};
use crate::core::{PlayerId, UnitId};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};

pub const BOARD_WIDTH: i32 = 9;
pub const BOARD_HEIGHT: i32 = 5;

/// Fixed-size grid of tiles
///
/// The board is the only place occupancy is recorded. A unit's stored
/// position is kept in sync by `GameState`, which is the only caller of the
/// placement methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: i32,
    height: i32,
    /// Column-major: index = x * height + y
    tiles: Vec<Tile>,
    /// Units on the board in placement order
    roster: Vec<UnitId>,
}

impl Board {
    pub fn new() -> Self {
        Board::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }

    pub fn with_size(width: i32, height: i32) -> Self {
        let mut tiles = Vec::with_capacity((width * height).max(0) as usize);
        for x in 0..width {
            for y in 0..height {
                tiles.push(Tile::new(Position::new(x, y)));
            }
        }
        Board {
            width,
            height,
            tiles,
            roster: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok((pos.x * self.height + pos.y) as usize)
        } else {
            Err(DuelError::OutOfBounds { x: pos.x, y: pos.y })
        }
    }

    /// Tile lookup, failing with `OutOfBounds` off the grid
    pub fn tile(&self, pos: Position) -> Result<&Tile> {
        let idx = self.index(pos)?;
        Ok(&self.tiles[idx])
    }

    fn tile_mut(&mut self, pos: Position) -> Result<&mut Tile> {
        let idx = self.index(pos)?;
        Ok(&mut self.tiles[idx])
    }

    /// All tiles, x-major (column by column)
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Occupant at `pos`; `None` for empty or off-board tiles
    pub fn occupant(&self, pos: Position) -> Option<Occupant> {
        self.tile(pos).ok().and_then(|t| t.occupant)
    }

    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.occupant(pos).map(|o| o.unit)
    }

    pub fn is_empty_tile(&self, pos: Position) -> bool {
        self.tile(pos).map(|t| t.is_empty()).unwrap_or(false)
    }

    /// Units on the board in placement order
    pub fn roster(&self) -> &[UnitId] {
        &self.roster
    }

    /// Put a unit on an empty tile
    pub fn place_unit(&mut self, pos: Position, occupant: Occupant) -> Result<()> {
        let tile = self.tile_mut(pos)?;
        if tile.occupant.is_some() {
            return Err(DuelError::TileOccupied { x: pos.x, y: pos.y });
        }
        tile.occupant = Some(occupant);
        self.roster.push(occupant.unit);
        Ok(())
    }

    /// Take whatever unit is on `pos` off the board
    pub fn remove_unit(&mut self, pos: Position) -> Result<Option<Occupant>> {
        let removed = self.tile_mut(pos)?.occupant.take();
        if let Some(occ) = removed {
            self.roster.retain(|id| *id != occ.unit);
        }
        Ok(removed)
    }

    /// Relocate the unit on `from` to the empty tile `to`
    pub fn move_unit(&mut self, from: Position, to: Position) -> Result<Occupant> {
        if !self.tile(to)?.is_empty() {
            return Err(DuelError::TileOccupied { x: to.x, y: to.y });
        }
        let occupant = self
            .tile_mut(from)?
            .occupant
            .take()
            .ok_or_else(|| DuelError::InvalidAction(format!("no unit on {from}")))?;
        self.tile_mut(to)?.occupant = Some(occupant);
        Ok(occupant)
    }

    /// In-bounds tiles among the eight surrounding `pos`
    pub fn adjacent_positions(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| pos.offset(dx, dy)))
            .filter(move |p| *p != pos && self.in_bounds(*p))
    }

    /// Empty tiles, x-major
    pub fn empty_tiles(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|t| t.is_empty())
            .map(|t| t.position)
            .collect()
    }

    /// Occupied tiles whose occupant satisfies `pred`, x-major
    pub fn tiles_with_units(&self, mut pred: impl FnMut(Occupant) -> bool) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|t| t.occupant.is_some_and(&mut pred))
            .map(|t| t.position)
            .collect()
    }

    /// Tiles holding units owned by `player`
    pub fn tiles_of_player(&self, player: PlayerId) -> Vec<Position> {
        self.tiles_with_units(|o| o.owner == player)
    }

    /// Empty tiles touching (8-way) any unit of `player`, x-major
    pub fn empty_tiles_adjacent_to(&self, player: PlayerId) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|t| t.is_empty())
            .filter(|t| {
                self.adjacent_positions(t.position)
                    .any(|p| self.occupant(p).is_some_and(|o| o.owner == player))
            })
            .map(|t| t.position)
            .collect()
    }

    pub fn highlight(&self, pos: Position) -> Result<HighlightMode> {
        Ok(self.tile(pos)?.highlight)
    }

    /// Set one tile's highlight; returns whether it changed
    pub fn set_highlight(&mut self, pos: Position, mode: HighlightMode) -> Result<bool> {
        let tile = self.tile_mut(pos)?;
        let changed = tile.highlight != mode;
        tile.highlight = mode;
        Ok(changed)
    }

    /// Set a batch of tiles; returns the ones that changed
    pub fn set_highlights(&mut self, positions: &[Position], mode: HighlightMode) -> Result<Vec<Position>> {
        let mut changed = Vec::new();
        for pos in positions {
            if self.set_highlight(*pos, mode)? {
                changed.push(*pos);
            }
        }
        Ok(changed)
    }

    /// Set every tile; returns the ones that changed
    pub fn highlight_all(&mut self, mode: HighlightMode) -> Vec<Position> {
        let mut changed = Vec::new();
        for tile in self.tiles.iter_mut() {
            if tile.highlight != mode {
                tile.highlight = mode;
                changed.push(tile.position);
            }
        }
        changed
    }

    /// Tiles currently carrying `mode`, x-major
    pub fn highlighted(&self, mode: HighlightMode) -> Vec<Position> {
        self.tiles
            .iter()
            .filter(|t| t.highlight == mode)
            .map(|t| t.position)
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
