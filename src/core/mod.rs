//! Core game types and entities

pub mod card;
pub mod deck;
pub mod effects;
pub mod entity;
pub mod player;
pub mod types;
pub mod unit;

pub use card::{Card, CardKind};
pub use deck::Deck;
pub use effects::{Ability, AbilitySet, SpellEffect, SpellTarget};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use player::{Hand, Player, HAND_SIZE};
pub use types::{CardName, PlayerName};
pub use unit::Unit;

pub type CardId = EntityId<Card>;
pub type PlayerId = EntityId<Player>;
pub type UnitId = EntityId<Unit>;
