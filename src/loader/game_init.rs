//! Game initialization from the catalog decks

use crate::config::STARTING_HAND;
use crate::core::PlayerId;
use crate::game::{GameLogger, GameState, VerbosityLevel};
use crate::loader::{CardCatalog, DeckEntry};
use crate::{DuelError, Result};
use std::sync::Arc;

/// Game builder: deals both decks and opens the first turn
pub struct GameInitializer {
    catalog: Arc<CardCatalog>,
    logger: GameLogger,
}

impl GameInitializer {
    pub fn new(catalog: Arc<CardCatalog>) -> Self {
        GameInitializer {
            catalog,
            logger: GameLogger::new(),
        }
    }

    /// Logger each new game starts with; the deal and the opening turn
    /// already log through it
    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.logger.set_verbosity(verbosity);
        self
    }

    /// Build a ready-to-play game
    ///
    /// Decks are dealt in catalog order and shuffled only when a seed is
    /// given. Each player draws the starting hand, alternating seats, and
    /// the first seat's turn begins.
    pub fn init_game(&self, human_name: &str, opponent_name: &str, seed: Option<u64>) -> Result<GameState> {
        let mut game = GameState::new_two_player(human_name, opponent_name, Arc::clone(&self.catalog))?;
        game.logger = self.logger.clone();
        let (human, opponent) = (game.human_id(), game.opponent_id());

        let decks = self.catalog.decks();
        self.load_deck_into_game(&mut game, human, &decks.human)?;
        self.load_deck_into_game(&mut game, opponent, &decks.opponent)?;

        if let Some(seed) = seed {
            game.seed_rng(seed);
            game.shuffle_deck(human)?;
            game.shuffle_deck(opponent)?;
        }

        for _ in 0..STARTING_HAND {
            game.draw_card(human)?;
            game.draw_card(opponent)?;
        }
        game.start_turn()?;
        Ok(game)
    }

    fn load_deck_into_game(&self, game: &mut GameState, player_id: PlayerId, deck: &[DeckEntry]) -> Result<()> {
        for entry in deck {
            let def = self.catalog.get_card(entry.card.as_str()).ok_or_else(|| {
                DuelError::Catalog(format!("deck card not in catalog: {}", entry.card))
            })?;
            for _ in 0..entry.count {
                let card_id = game.next_id();
                game.cards.insert(card_id, def.instantiate(card_id, player_id));
                game.get_player_mut(player_id)?.deck.push(card_id);
            }
        }
        Ok(())
    }
}
