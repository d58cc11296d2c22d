//! Outbound render commands
//!
//! The engine never talks to a display directly. Every visible change is
//! appended to a `RenderLog` in the order it happened; the transport drains
//! the log after each event and forwards the commands to the client.

use crate::board::{HighlightMode, Position};
use crate::core::{CardId, PlayerId, UnitId};
use serde::{Deserialize, Serialize};

/// Unit animation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitAnimation {
    Idle,
    Move,
    Attack,
    Hit,
    Death,
    Channel,
}

/// One display instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderCommand {
    HighlightTile { position: Position, mode: HighlightMode },
    DrawUnit { unit: UnitId, position: Position },
    DeleteUnit { unit: UnitId },
    MoveUnitToTile { unit: UnitId, position: Position },
    SetUnitHealth { unit: UnitId, health: i32 },
    SetUnitAttack { unit: UnitId, attack: i32 },
    PlayUnitAnimation { unit: UnitId, animation: UnitAnimation },
    PlayProjectileAnimation { from: Position, to: Position },
    /// `slot` is 1-based as shown to the player
    DrawCard { card: CardId, slot: usize, highlighted: bool },
    DeleteCard { slot: usize },
    SetPlayerHealth { player: PlayerId, health: i32 },
    SetPlayerMana { player: PlayerId, mana: i32 },
    Notify { message: String, duration_secs: u32 },
}

/// Ordered buffer of render commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderLog {
    commands: Vec<RenderCommand>,

    /// Self-play and benchmarks turn recording off
    enabled: bool,
}

impl RenderLog {
    pub fn new() -> Self {
        RenderLog {
            commands: Vec::new(),
            enabled: true,
        }
    }

    /// Create a log that drops everything
    pub fn disabled() -> Self {
        RenderLog {
            commands: Vec::new(),
            enabled: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.commands.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn push(&mut self, command: RenderCommand) {
        if self.enabled {
            self.commands.push(command);
        }
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Hand over everything recorded so far
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Messages of all pending `Notify` commands
    pub fn notifications(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Notify { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for RenderLog {
    fn default() -> Self {
        Self::new()
    }
}
