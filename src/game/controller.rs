//! Player controller trait and game state view
//!
//! A controller drives one seat by producing the same click-equivalent
//! events a client would send. Controllers only see the game through a
//! read-only `GameStateView`.

use crate::board::{Board, Position};
use crate::core::{AbilitySet, Card, CardId, PlayerId, Unit, UnitId};
use crate::game::event::InputEvent;
use crate::game::targeting::UnitTargets;
use crate::game::{GameLogger, GameState};
use std::fmt::Write as FmtWrite;

/// Read-only view of game state for controllers
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    /// Create a new view of the game state from a player's perspective
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// The other seat
    pub fn enemy_id(&self) -> Option<PlayerId> {
        self.game.opponent_of(self.player_id).ok()
    }

    pub fn board(&self) -> &Board {
        &self.game.board
    }

    pub fn logger(&self) -> &GameLogger {
        &self.game.logger
    }

    pub fn is_my_turn(&self) -> bool {
        self.game.turn.current_player == self.player_id
    }

    pub fn is_game_over(&self) -> bool {
        self.game.is_game_over()
    }

    /// Cards in this player's hand, slot order
    pub fn hand(&self) -> &[CardId] {
        self.game
            .get_player(self.player_id)
            .map(|p| p.hand.as_slice())
            .unwrap_or(&[])
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.game.card(id).ok()
    }

    /// Catalog abilities of the unit a card summons
    pub fn card_abilities(&self, id: CardId) -> Option<AbilitySet> {
        let card = self.card(id)?;
        self.game.catalog.abilities(card.name.as_str())
    }

    pub fn mana(&self) -> i32 {
        self.game.get_player(self.player_id).map(|p| p.mana).unwrap_or(0)
    }

    pub fn health(&self) -> i32 {
        self.game.get_player(self.player_id).map(|p| p.health).unwrap_or(0)
    }

    pub fn enemy_health(&self) -> i32 {
        self.enemy_id()
            .and_then(|id| self.game.get_player(id).ok())
            .map(|p| p.health)
            .unwrap_or(0)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.game.unit(id).ok()
    }

    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.game.unit_at(pos)
    }

    /// This player's units in placement order
    pub fn my_units(&self) -> Vec<UnitId> {
        self.game.units_of(self.player_id)
    }

    /// The other seat's units in placement order
    pub fn enemy_units(&self) -> Vec<UnitId> {
        self.enemy_id().map(|id| self.game.units_of(id)).unwrap_or_default()
    }

    pub fn my_avatar(&self) -> Option<&Unit> {
        self.game.avatar(self.player_id).ok()
    }

    pub fn enemy_avatar(&self) -> Option<&Unit> {
        self.enemy_id().and_then(|id| self.game.avatar(id).ok())
    }

    /// Tiles the unit would be offered if selected now
    pub fn unit_targets(&self, id: UnitId) -> UnitTargets {
        self.game.unit_targets(id).unwrap_or_default()
    }

    /// Tiles the card could be played on by this player
    pub fn card_targets(&self, card: CardId) -> Vec<Position> {
        self.game.card_targets(card, self.player_id).unwrap_or_default()
    }

    /// Text picture of the board: `A`/`a` avatars, `U`/`u` units
    /// (upper case is this player), `.` empty
    pub fn render_board(&self) -> String {
        let board = self.board();
        let mut out = String::new();
        for y in 0..board.height() {
            for x in 0..board.width() {
                let glyph = match self.unit_at(Position::new(x, y)) {
                    Some(u) if u.is_avatar && u.owner == self.player_id => 'A',
                    Some(u) if u.is_avatar => 'a',
                    Some(u) if u.owner == self.player_id => 'U',
                    Some(_) => 'u',
                    None => '.',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        for (idx, card) in self.hand().iter().enumerate() {
            if let Some(card) = self.card(*card) {
                let _ = writeln!(out, "{}: {} ({} mana)", idx + 1, card.name, card.mana_cost);
            }
        }
        let _ = writeln!(
            out,
            "health {} mana {} | enemy health {}",
            self.health(),
            self.mana(),
            self.enemy_health()
        );
        out
    }
}

/// A seat driven by input events
///
/// The game loop asks for one event at a time while it is this seat's
/// turn. Returning `None` concedes the game.
pub trait PlayerController {
    fn player_id(&self) -> PlayerId;

    fn next_event(&mut self, view: &GameStateView) -> Option<InputEvent>;

    /// Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
