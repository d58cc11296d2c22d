//! Units on the board

use crate::board::Position;
use crate::core::{Ability, AbilitySet, CardName, GameEntity, PlayerId, UnitId};
use serde::{Deserialize, Serialize};

/// Moves granted to every unit at the start of its controller's turn
pub const MOVES_PER_TURN: u8 = 1;

/// A combat piece: an avatar or a summoned unit
///
/// Health is private so that the first assignment can be captured as the
/// starting health (the heal cap for spells).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: CardName,
    pub owner: PlayerId,

    /// Tile the unit stands on; `None` once it has left the board
    pub position: Option<Position>,

    health: i32,
    starting_health: Option<i32>,
    pub attack: i32,

    pub moves_remaining: u8,
    pub attacks_remaining: u8,
    pub attacks_per_turn: u8,

    pub is_avatar: bool,
    pub abilities: AbilitySet,
}

impl Unit {
    pub fn new(
        id: UnitId,
        name: impl Into<CardName>,
        owner: PlayerId,
        attack: i32,
        health: i32,
        abilities: AbilitySet,
    ) -> Self {
        let attacks_per_turn = if abilities.contains(Ability::AttackTwice) {
            2
        } else {
            1
        };
        let mut unit = Unit {
            id,
            name: name.into(),
            owner,
            position: None,
            health: 0,
            starting_health: None,
            attack,
            moves_remaining: 0,
            attacks_remaining: 0,
            attacks_per_turn,
            is_avatar: false,
            abilities,
        };
        unit.set_health(health);
        unit
    }

    /// Create an avatar, ready to act on its first turn
    pub fn avatar(id: UnitId, name: impl Into<CardName>, owner: PlayerId, attack: i32, health: i32) -> Self {
        let mut unit = Unit::new(id, name, owner, attack, health, AbilitySet::empty());
        unit.is_avatar = true;
        unit.refresh_actions();
        unit
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Health the unit had when first created
    pub fn starting_health(&self) -> i32 {
        self.starting_health.unwrap_or(self.health)
    }

    /// Set health; the first call fixes the starting health
    pub fn set_health(&mut self, health: i32) {
        if self.starting_health.is_none() {
            self.starting_health = Some(health);
        }
        self.health = health;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn has(&self, ability: Ability) -> bool {
        self.abilities.contains(ability)
    }

    /// Restore full move and attack allowance for a new turn
    pub fn refresh_actions(&mut self) {
        self.attacks_remaining = self.attacks_per_turn;
        self.moves_remaining = MOVES_PER_TURN;
    }

    /// Zero both allowances (freshly summoned units cannot act)
    pub fn exhaust(&mut self) {
        self.attacks_remaining = 0;
        self.moves_remaining = 0;
    }

    pub fn spend_move(&mut self) {
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }

    /// An attack always costs a move as well
    pub fn spend_attack(&mut self) {
        self.attacks_remaining = self.attacks_remaining.saturating_sub(1);
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }

    pub fn is_exhausted(&self) -> bool {
        self.attacks_remaining == 0 && self.moves_remaining == 0
    }
}

impl GameEntity<Unit> for Unit {
    fn id(&self) -> UnitId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
