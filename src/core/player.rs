//! Player representation

use crate::core::{CardId, Deck, GameEntity, PlayerId, PlayerName, UnitId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of hand slots
pub const HAND_SIZE: usize = 6;

/// Ordered hand of at most `HAND_SIZE` cards
///
/// Slots are always contiguous from index 0; removing a card shifts the
/// later cards down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    slots: SmallVec<[CardId; HAND_SIZE]>,
}

impl Hand {
    pub fn new() -> Self {
        Hand {
            slots: SmallVec::new(),
        }
    }

    /// Add a card to the first free slot; hands the card back when full
    pub fn add(&mut self, card: CardId) -> std::result::Result<usize, CardId> {
        if self.is_full() {
            return Err(card);
        }
        self.slots.push(card);
        Ok(self.slots.len() - 1)
    }

    /// Remove the card in slot `index` and compact
    pub fn remove_at(&mut self, index: usize) -> Option<CardId> {
        if index < self.slots.len() {
            Some(self.slots.remove(index))
        } else {
            None
        }
    }

    /// Remove a specific card and compact
    pub fn remove(&mut self, card: CardId) -> Option<usize> {
        let index = self.position_of(card)?;
        self.slots.remove(index);
        Some(index)
    }

    pub fn get(&self, index: usize) -> Option<CardId> {
        self.slots.get(index).copied()
    }

    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.slots.iter().position(|c| *c == card)
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.slots.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= HAND_SIZE
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.slots
    }
}

/// Represents a player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique ID for this player
    pub id: PlayerId,

    pub name: PlayerName,

    /// Mirrors the avatar's health
    pub health: i32,

    pub mana: i32,

    pub hand: Hand,

    pub deck: Deck,

    pub avatar: UnitId,

    /// Starts at 1, incremented when the player's turn ends
    pub turn_number: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, health: i32, avatar: UnitId) -> Self {
        Player {
            id,
            name: name.into(),
            health,
            mana: 0,
            hand: Hand::new(),
            deck: Deck::new(),
            avatar,
            turn_number: 1,
        }
    }

    /// Mana granted at the start of this player's turn
    pub fn mana_for_turn(&self) -> i32 {
        self.turn_number as i32 + 1
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        self.mana >= cost
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;

    #[test]
    fn test_hand_compacts() {
        let mut hand = Hand::new();
        for i in 0..4 {
            hand.add(EntityId::new(i)).unwrap();
        }
        assert_eq!(hand.remove_at(1), Some(EntityId::new(1)));
        assert_eq!(
            hand.as_slice(),
            &[EntityId::new(0), EntityId::new(2), EntityId::new(3)]
        );
        assert_eq!(hand.remove(EntityId::new(0)), Some(0));
        assert_eq!(hand.get(0), Some(EntityId::new(2)));
        assert_eq!(hand.remove_at(5), None);
    }

    #[test]
    fn test_hand_full_rejects() {
        let mut hand = Hand::new();
        for i in 0..HAND_SIZE as u32 {
            assert!(hand.add(EntityId::new(i)).is_ok());
        }
        assert!(hand.is_full());
        assert_eq!(hand.add(EntityId::new(99)), Err(EntityId::new(99)));
        assert_eq!(hand.len(), HAND_SIZE);
    }

    #[test]
    fn test_mana_for_turn() {
        let mut player = Player::new(EntityId::new(0), "Human", 20, EntityId::new(2));
        assert_eq!(player.mana_for_turn(), 2);
        player.turn_number += 1;
        assert_eq!(player.mana_for_turn(), 3);
        player.mana = 2;
        assert!(player.can_afford(2));
        assert!(!player.can_afford(3));
    }
}
