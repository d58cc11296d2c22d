//! Inbound events and the outcomes reported back to the caller

use crate::board::Position;
use crate::core::{CardId, UnitId};
use serde::{Deserialize, Serialize};

/// Click-equivalent input from a client or from the opponent policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// `hand_position` is 1-based, as shown to the player
    SelectCard { hand_position: usize },
    SelectTile { x: i32, y: i32 },
    EndTurn,
    /// Click outside any card, tile or end-turn control
    DeselectElsewhere,
}

impl InputEvent {
    pub fn tile(pos: Position) -> Self {
        InputEvent::SelectTile { x: pos.x, y: pos.y }
    }
}

/// Who produced an event; synthetic events bypass the UI gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOrigin {
    Human,
    Synthetic,
}

/// Why a user-correctable request did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Target tile was not highlighted
    InvalidTile,
    NotEnoughMana,
    /// Summon target already occupied
    TileOccupied,
    /// Spell target tile holds no unit
    NoTarget,
    /// Unit has no moves or attacks left
    Exhausted,
    /// Tile not valid for the selected unit's remaining resources
    NotAllowed,
    /// No free tile next to the target to attack from
    NoApproach,
}

impl Rejection {
    /// Text shown to the player, for rejections that are surfaced
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Rejection::InvalidTile => Some("Invalid Tile"),
            Rejection::NotEnoughMana => Some("Not Enough Mana"),
            Rejection::TileOccupied => Some("Tile Occupied"),
            _ => None,
        }
    }
}

/// Result of the action resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved { from: Position, to: Position },
    Attacked { target: Position, countered: bool },
    MovedAndAttacked { to: Position, target: Position, countered: bool },
    Rejected(Rejection),
}

/// Result of the card resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOutcome {
    Summoned(UnitId),
    Cast { card: CardId, target: Position },
    Rejected(Rejection),
}

/// Why an event was dropped without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    GameOver,
    /// Human input while the UI gate is closed
    UiLocked,
    EmptyHandSlot,
    /// Tile has no friendly unit to select
    NothingToSelect,
}

/// What processing one event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Ignored(IgnoreReason),
    CardSelected { card: CardId, slot: usize },
    UnitSelected(UnitId),
    CardPlayed(CardOutcome),
    UnitActed(ActionOutcome),
    Deselected,
    TurnEnded,
}
