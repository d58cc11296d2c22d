//! Card types and definitions

use crate::core::{CardId, CardName, GameEntity, PlayerId, SpellEffect};
use serde::{Deserialize, Serialize};

/// What a card does when played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Summons a unit with these base stats
    Unit { attack: i32, health: i32 },
    /// Resolves a spell effect against a target unit
    Spell(SpellEffect),
}

/// A card instance in a player's deck or hand
///
/// Cards are immutable once dealt; playing one removes it from the hand and
/// either creates a `Unit` or resolves its spell effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID for this card instance
    pub id: CardId,

    /// Card name (e.g., "Azurite Lion")
    pub name: CardName,

    pub mana_cost: i32,

    pub kind: CardKind,

    /// Player whose deck this card was dealt into
    pub owner: PlayerId,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<CardName>, mana_cost: i32, kind: CardKind, owner: PlayerId) -> Self {
        Card {
            id,
            name: name.into(),
            mana_cost,
            kind,
            owner,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.kind, CardKind::Unit { .. })
    }

    pub fn is_spell(&self) -> bool {
        matches!(self.kind, CardKind::Spell(_))
    }

    /// Spell effect, if this is a spell card
    pub fn spell_effect(&self) -> Option<SpellEffect> {
        match self.kind {
            CardKind::Spell(effect) => Some(effect),
            CardKind::Unit { .. } => None,
        }
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
