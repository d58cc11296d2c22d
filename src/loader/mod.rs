//! Catalog loading and game setup

pub mod catalog;
pub mod game_init;

pub use catalog::{AvatarStats, CardCatalog, CardDefinition, DeckEntry, DeckLists};
pub use game_init::GameInitializer;
