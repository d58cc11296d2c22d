//! Card catalog: stats, abilities and deck lists
//!
//! The default catalog is embedded in the binary; an alternative JSON file
//! with the same shape can be loaded at startup.

use crate::core::{AbilitySet, Card, CardId, CardKind, CardName, PlayerId};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Definition of a card as it appears in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: CardName,
    pub mana_cost: i32,
    pub kind: CardKind,
    /// Ability tags of the unit this card summons
    #[serde(default)]
    pub abilities: AbilitySet,
}

impl CardDefinition {
    /// Create a card instance for a player's deck
    pub fn instantiate(&self, id: CardId, owner: PlayerId) -> Card {
        Card::new(id, self.name.clone(), self.mana_cost, self.kind, owner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarStats {
    pub attack: i32,
    pub health: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: CardName,
    pub count: u32,
}

/// Deck lists for both seats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckLists {
    pub human: Vec<DeckEntry>,
    pub opponent: Vec<DeckEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    avatar: AvatarStats,
    cards: Vec<CardDefinition>,
    decks: DeckLists,
}

/// Lookup of card definitions by name (case-insensitive)
#[derive(Debug, Clone)]
pub struct CardCatalog {
    avatar: AvatarStats,
    cards: HashMap<String, CardDefinition>,
    /// Names in file order, for listing
    order: Vec<CardName>,
    decks: DeckLists,
}

impl CardCatalog {
    /// The catalog shipped with the engine
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let mut cards = HashMap::new();
        let mut order = Vec::with_capacity(file.cards.len());
        for def in file.cards {
            let key = def.name.as_str().to_lowercase();
            if cards.contains_key(&key) {
                return Err(DuelError::Catalog(format!("duplicate card: {}", def.name)));
            }
            order.push(def.name.clone());
            cards.insert(key, def);
        }

        let catalog = CardCatalog {
            avatar: file.avatar,
            cards,
            order,
            decks: file.decks,
        };
        for entry in catalog.decks.human.iter().chain(catalog.decks.opponent.iter()) {
            if !catalog.contains(entry.card.as_str()) {
                return Err(DuelError::Catalog(format!(
                    "deck references unknown card: {}",
                    entry.card
                )));
            }
        }
        Ok(catalog)
    }

    /// Look up a card by name
    pub fn get_card(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&name.to_lowercase())
    }

    /// Ability tags for a unit name; `None` on a miss
    pub fn abilities(&self, name: &str) -> Option<AbilitySet> {
        self.get_card(name).map(|def| def.abilities)
    }

    pub fn avatar(&self) -> AvatarStats {
        self.avatar
    }

    pub fn decks(&self) -> &DeckLists {
        &self.decks
    }

    /// Definitions in file order
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.order.iter().filter_map(|name| self.get_card(name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ability, SpellEffect};

    #[test]
    fn test_embedded_catalog() {
        let catalog = CardCatalog::embedded().unwrap();
        assert_eq!(catalog.len(), 19);
        assert_eq!(catalog.avatar(), AvatarStats { attack: 2, health: 20 });

        let total = |entries: &[DeckEntry]| entries.iter().map(|e| e.count).sum::<u32>();
        assert_eq!(total(&catalog.decks().human), 20);
        assert_eq!(total(&catalog.decks().opponent), 20);
        assert_eq!(catalog.decks().human[0].card.as_str(), "Comodo Charger");
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog = CardCatalog::embedded().unwrap();
        let knight = catalog.get_card("silverguard knight").unwrap();
        assert_eq!(knight.mana_cost, 3);
        assert!(knight.abilities.contains(Ability::Provoke));
        assert!(knight.abilities.contains(Ability::AvatarDamageEffect));

        let decay = catalog.get_card("Entropic Decay").unwrap();
        assert_eq!(decay.kind, CardKind::Spell(SpellEffect::Destroy));
        assert!(decay.abilities.is_empty());
    }

    #[test]
    fn test_lookup_miss() {
        let catalog = CardCatalog::embedded().unwrap();
        assert!(catalog.abilities("Nonexistent Card").is_none());
        assert_eq!(
            catalog.abilities("WindShrike"),
            Some([Ability::Flying, Ability::DrawCardOnDeath].into_iter().collect())
        );
    }

    #[test]
    fn test_unknown_deck_card_rejected() {
        let json = r#"{
            "avatar": { "attack": 2, "health": 20 },
            "cards": [],
            "decks": { "human": [{ "card": "Ghost", "count": 1 }], "opponent": [] }
        }"#;
        assert!(matches!(CardCatalog::from_json(json), Err(DuelError::Catalog(_))));
    }
}
