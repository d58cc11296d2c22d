//! Draw pile

use crate::core::CardId;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// FIFO queue of cards; the front is the next draw
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<CardId>,
}

impl Deck {
    pub fn new() -> Self {
        Deck {
            cards: VecDeque::new(),
        }
    }

    /// Add a card to the bottom
    pub fn push(&mut self, card: CardId) {
        self.cards.push_back(card);
    }

    /// Take the top card, `None` when the deck is exhausted
    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    pub fn peek(&self) -> Option<CardId> {
        self.cards.front().copied()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter()
    }
}

impl FromIterator<CardId> for Deck {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Deck {
            cards: iter.into_iter().collect(),
        }
    }
}
