//! Main game state structure

use crate::board::{Board, HighlightMode, Occupant, Position};
use crate::config::{HUMAN_AVATAR_START, OPPONENT_AVATAR_START, AVATAR_DAMAGE_ATTACK_BONUS};
use crate::core::{
    Ability, Card, CardId, EntityId, EntityStore, Player, PlayerId, PlayerName, Unit, UnitId,
};
use crate::game::render::{RenderCommand, RenderLog, UnitAnimation};
use crate::game::{GameEndReason, GameLogger, TurnContext, VerbosityLevel};
use crate::loader::CardCatalog;
use crate::{DuelError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::cell::RefCell;
use std::sync::Arc;

/// Seconds a notification stays on screen
pub const NOTIFY_SECONDS: u32 = 2;

/// What happened when a player drew
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Card went into the hand at this 0-based slot
    Drawn { card: CardId, slot: usize },
    /// Hand was full; the card is gone
    Burned(CardId),
    /// Deck was empty; the drawing player has lost
    DeckEmpty,
}

/// Complete game state
///
/// Units live in an arena keyed by `UnitId`; the board records which unit
/// stands on which tile and each unit records its tile. Every mutation that
/// touches both goes through a method here so the two never disagree.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,

    /// Units currently on the board (dead units are removed)
    pub units: EntityStore<Unit>,

    /// All dealt cards, wherever they are
    pub cards: EntityStore<Card>,

    /// Seat order: human first, opponent second
    pub players: Vec<Player>,

    /// Current player and selection
    pub turn: TurnContext,

    end_reason: Option<GameEndReason>,

    pub catalog: Arc<CardCatalog>,

    /// Used only for deck shuffling
    pub rng: RefCell<ChaCha12Rng>,

    next_entity_id: u32,

    pub render: RenderLog,

    pub logger: GameLogger,
}

impl GameState {
    /// Create a game with both avatars on the board and empty decks
    pub fn new_two_player(
        human_name: impl Into<PlayerName>,
        opponent_name: impl Into<PlayerName>,
        catalog: Arc<CardCatalog>,
    ) -> Result<Self> {
        let stats = catalog.avatar();
        let p1_id: PlayerId = EntityId::new(0);
        let p2_id: PlayerId = EntityId::new(1);
        let a1_id: UnitId = EntityId::new(2);
        let a2_id: UnitId = EntityId::new(3);

        let mut game = GameState {
            board: Board::new(),
            units: EntityStore::new(),
            cards: EntityStore::new(),
            players: vec![
                Player::new(p1_id, human_name, stats.health, a1_id),
                Player::new(p2_id, opponent_name, stats.health, a2_id),
            ],
            turn: TurnContext::new(p1_id, p2_id),
            end_reason: None,
            catalog,
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(0)),
            next_entity_id: 4,
            render: RenderLog::new(),
            logger: GameLogger::new(),
        };

        let avatar1 = Unit::avatar(a1_id, "Human Avatar", p1_id, stats.attack, stats.health);
        let avatar2 = Unit::avatar(a2_id, "Opponent Avatar", p2_id, stats.attack, stats.health);
        game.add_unit(avatar1, HUMAN_AVATAR_START)?;
        game.add_unit(avatar2, OPPONENT_AVATAR_START)?;
        Ok(game)
    }

    pub fn seed_rng(&mut self, seed: u64) {
        *self.rng.borrow_mut() = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Shuffle a player's deck with the game RNG
    pub fn shuffle_deck(&mut self, player_id: PlayerId) -> Result<()> {
        let mut rng = self.rng.borrow_mut();
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(DuelError::EntityNotFound(player_id.as_u32()))?;
        player.deck.shuffle(&mut *rng);
        Ok(())
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    /// The seat that moves first
    pub fn human_id(&self) -> PlayerId {
        self.players[0].id
    }

    /// The seat driven by the opponent policy
    pub fn opponent_id(&self) -> PlayerId {
        self.players[1].id
    }

    pub fn opponent_of(&self, player: PlayerId) -> Result<PlayerId> {
        self.players
            .iter()
            .find(|p| p.id != player)
            .map(|p| p.id)
            .ok_or(DuelError::EntityNotFound(player.as_u32()))
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit> {
        self.units.get(id)
    }

    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.board.unit_at(pos).and_then(|id| self.units.get(id).ok())
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    /// A player's avatar, if still alive
    pub fn avatar(&self, player: PlayerId) -> Result<&Unit> {
        let avatar = self.get_player(player)?.avatar;
        self.units.get(avatar)
    }

    /// Units owned by `player`, in placement order
    pub fn units_of(&self, player: PlayerId) -> Vec<UnitId> {
        self.board
            .roster()
            .iter()
            .copied()
            .filter(|id| self.units.get(*id).is_ok_and(|u| u.owner == player))
            .collect()
    }

    /// Position of a unit that must be on the board
    pub fn position_of(&self, id: UnitId) -> Result<Position> {
        self.units
            .get(id)?
            .position
            .ok_or_else(|| DuelError::InvalidAction(format!("unit {id} is not on the board")))
    }

    pub fn is_game_over(&self) -> bool {
        self.end_reason.is_some()
    }

    pub fn end_reason(&self) -> Option<&GameEndReason> {
        self.end_reason.as_ref()
    }

    /// Winning player once the game is over
    pub fn winner(&self) -> Option<PlayerId> {
        match self.end_reason {
            Some(GameEndReason::AvatarDestroyed(loser))
            | Some(GameEndReason::DeckExhausted(loser))
            | Some(GameEndReason::Conceded(loser)) => self.opponent_of(loser).ok(),
            Some(GameEndReason::TurnLimit) | None => None,
        }
    }

    /// Mark the game over; the first reason sticks
    pub fn end_game(&mut self, reason: GameEndReason) {
        if self.end_reason.is_some() {
            return;
        }
        self.logger.event(VerbosityLevel::Minimal, "turn", &format!("Game over: {reason}"));
        self.end_reason = Some(reason);
        self.turn.ui_accept = false;
    }

    /// Put a new unit on an empty tile
    pub fn add_unit(&mut self, mut unit: Unit, pos: Position) -> Result<UnitId> {
        let id = unit.id;
        self.board.place_unit(
            pos,
            Occupant {
                unit: id,
                owner: unit.owner,
            },
        )?;
        unit.position = Some(pos);
        let health = unit.health();
        let attack = unit.attack;
        self.units.insert(id, unit);
        self.render.push(RenderCommand::DrawUnit { unit: id, position: pos });
        self.render.push(RenderCommand::SetUnitHealth { unit: id, health });
        self.render.push(RenderCommand::SetUnitAttack { unit: id, attack });
        Ok(id)
    }

    /// Move a unit to an empty tile
    pub fn relocate_unit(&mut self, id: UnitId, to: Position) -> Result<()> {
        let from = self.position_of(id)?;
        self.board.move_unit(from, to)?;
        self.units.get_mut(id)?.position = Some(to);
        self.render.push(RenderCommand::MoveUnitToTile { unit: id, position: to });
        Ok(())
    }

    /// Set a unit's health, handling the avatar mirror, avatar-damage
    /// triggers and death
    pub fn set_unit_health(&mut self, id: UnitId, health: i32) -> Result<()> {
        let (old, new, is_avatar, owner) = {
            let unit = self.units.get_mut(id)?;
            let old = unit.health();
            let new = if unit.is_avatar { health.max(0) } else { health };
            unit.set_health(new);
            (old, new, unit.is_avatar, unit.owner)
        };
        self.render.push(RenderCommand::SetUnitHealth { unit: id, health: new });

        if is_avatar {
            self.get_player_mut(owner)?.health = new;
            self.render.push(RenderCommand::SetPlayerHealth { player: owner, health: new });
            if new < old {
                self.trigger_avatar_damage(owner)?;
            }
        }

        if new <= 0 {
            self.kill_unit(id)?;
        }
        Ok(())
    }

    /// Set a player's health through their avatar
    pub fn set_player_health(&mut self, player: PlayerId, health: i32) -> Result<()> {
        let avatar = self.get_player(player)?.avatar;
        if self.units.contains(avatar) {
            return self.set_unit_health(avatar, health);
        }
        let health = health.max(0);
        self.get_player_mut(player)?.health = health;
        self.render.push(RenderCommand::SetPlayerHealth { player, health });
        if health < 1 {
            self.end_game(GameEndReason::AvatarDestroyed(player));
        }
        Ok(())
    }

    pub fn set_unit_attack(&mut self, id: UnitId, attack: i32) -> Result<()> {
        self.units.get_mut(id)?.attack = attack;
        self.render.push(RenderCommand::SetUnitAttack { unit: id, attack });
        Ok(())
    }

    pub fn set_mana(&mut self, player: PlayerId, mana: i32) -> Result<()> {
        self.get_player_mut(player)?.mana = mana;
        self.render.push(RenderCommand::SetPlayerMana { player, mana });
        Ok(())
    }

    fn trigger_avatar_damage(&mut self, owner: PlayerId) -> Result<()> {
        for id in self.units_of(owner) {
            let unit = self.units.get(id)?;
            if unit.has(Ability::AvatarDamageEffect) {
                let attack = unit.attack + AVATAR_DAMAGE_ATTACK_BONUS;
                log_event!(self, Normal, "combat", "{} is enraged ({} attack)", unit.name, attack);
                self.set_unit_attack(id, attack)?;
            }
        }
        Ok(())
    }

    /// Take a dead unit off the board and fire its death trigger
    fn kill_unit(&mut self, id: UnitId) -> Result<()> {
        let unit = self
            .units
            .remove(id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))?;
        if let Some(pos) = unit.position {
            self.board.remove_unit(pos)?;
        }
        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: id,
            animation: UnitAnimation::Death,
        });
        self.render.push(RenderCommand::DeleteUnit { unit: id });
        log_event!(self, Normal, "combat", "{} dies", unit.name);

        if unit.has(Ability::DrawCardOnDeath) {
            self.draw_card(unit.owner)?;
        }
        if unit.is_avatar {
            self.end_game(GameEndReason::AvatarDestroyed(unit.owner));
        }
        Ok(())
    }

    /// Draw the top card of a player's deck into their hand
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<DrawOutcome> {
        let player = self.get_player_mut(player_id)?;
        let Some(card) = player.deck.draw() else {
            self.logger.event(
                VerbosityLevel::Minimal,
                "card",
                &format!("{} has no cards left to draw", self.get_player(player_id)?.name),
            );
            self.end_game(GameEndReason::DeckExhausted(player_id));
            return Ok(DrawOutcome::DeckEmpty);
        };

        match player.hand.add(card) {
            Ok(slot) => {
                if player_id == self.human_id() {
                    self.render.push(RenderCommand::DrawCard {
                        card,
                        slot: slot + 1,
                        highlighted: false,
                    });
                }
                log_event!(self, Verbose, "card", "player {} draws card {}", player_id, card);
                Ok(DrawOutcome::Drawn { card, slot })
            }
            Err(card) => {
                log_event!(self, Normal, "card", "player {} hand full, card {} burned", player_id, card);
                if player_id == self.human_id() {
                    self.notify("Hand Full");
                }
                Ok(DrawOutcome::Burned(card))
            }
        }
    }

    /// Redraw every card in a player's hand
    ///
    /// Only the human seat's hand is on screen; other seats are a no-op.
    pub fn refresh_hand(&mut self, player_id: PlayerId) -> Result<()> {
        if player_id != self.human_id() {
            return Ok(());
        }
        let hand: Vec<CardId> = self.get_player(player_id)?.hand.as_slice().to_vec();
        for slot in 1..=crate::core::HAND_SIZE {
            self.render.push(RenderCommand::DeleteCard { slot });
        }
        for (idx, card) in hand.into_iter().enumerate() {
            self.render.push(RenderCommand::DrawCard {
                card,
                slot: idx + 1,
                highlighted: false,
            });
        }
        Ok(())
    }

    /// Highlight a set of tiles, emitting commands for the ones that changed
    pub fn highlight_tiles(&mut self, positions: &[Position], mode: HighlightMode) -> Result<()> {
        for position in self.board.set_highlights(positions, mode)? {
            self.render.push(RenderCommand::HighlightTile { position, mode });
        }
        Ok(())
    }

    /// Reset every tile to `HighlightMode::None`
    pub fn clear_highlights(&mut self) {
        for position in self.board.highlight_all(HighlightMode::None) {
            self.render.push(RenderCommand::HighlightTile {
                position,
                mode: HighlightMode::None,
            });
        }
    }

    pub fn notify(&mut self, message: &str) {
        self.render.push(RenderCommand::Notify {
            message: message.to_string(),
            duration_secs: NOTIFY_SECONDS,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AbilitySet;

    fn new_game() -> GameState {
        let catalog = Arc::new(CardCatalog::embedded().unwrap());
        GameState::new_two_player("Human", "Opponent", catalog).unwrap()
    }

    #[test]
    fn test_avatars_placed() {
        let game = new_game();
        let human = game.human_id();
        let opponent = game.opponent_id();
        assert_eq!(game.avatar(human).unwrap().position, Some(Position::new(1, 2)));
        assert_eq!(game.avatar(opponent).unwrap().position, Some(Position::new(7, 2)));
        assert_eq!(game.get_player(human).unwrap().health, 20);
        assert_eq!(game.avatar(opponent).unwrap().attack, 2);
        assert_eq!(game.board.roster().len(), 2);
    }

    #[test]
    fn test_avatar_health_mirrors_player() {
        let mut game = new_game();
        let human = game.human_id();
        let avatar = game.get_player(human).unwrap().avatar;

        game.set_unit_health(avatar, 15).unwrap();
        assert_eq!(game.get_player(human).unwrap().health, 15);

        game.set_player_health(human, 12).unwrap();
        assert_eq!(game.unit(avatar).unwrap().health(), 12);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_avatar_death_ends_game() {
        let mut game = new_game();
        let opponent = game.opponent_id();
        game.set_player_health(opponent, -3).unwrap();
        assert_eq!(game.get_player(opponent).unwrap().health, 0);
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(game.human_id()));
        assert_eq!(game.end_reason(), Some(&GameEndReason::AvatarDestroyed(opponent)));
        assert!(game.board.unit_at(Position::new(7, 2)).is_none());
    }

    #[test]
    fn test_summon_then_kill_round_trip() {
        let mut game = new_game();
        let human = game.human_id();
        let id = game.next_id();
        let unit = Unit::new(id, "Comodo Charger", human, 1, 3, AbilitySet::empty());
        game.add_unit(unit, Position::new(2, 2)).unwrap();
        assert!(game.board.roster().contains(&id));

        game.set_unit_health(id, 0).unwrap();
        assert!(!game.units.contains(id));
        assert!(!game.board.roster().contains(&id));
        assert!(game.board.is_empty_tile(Position::new(2, 2)));
    }

    #[test]
    fn test_avatar_damage_effect() {
        let mut game = new_game();
        let human = game.human_id();
        let id = game.next_id();
        let abilities: AbilitySet = [Ability::Provoke, Ability::AvatarDamageEffect].into_iter().collect();
        game.add_unit(
            Unit::new(id, "Silverguard Knight", human, 1, 5, abilities),
            Position::new(2, 2),
        )
        .unwrap();

        game.set_player_health(human, 18).unwrap();
        assert_eq!(game.unit(id).unwrap().attack, 3);
        // healing does not trigger it
        game.set_player_health(human, 20).unwrap();
        assert_eq!(game.unit(id).unwrap().attack, 3);
    }

    #[test]
    fn test_draw_from_empty_deck_ends_game() {
        let mut game = new_game();
        let human = game.human_id();
        assert_eq!(game.draw_card(human).unwrap(), DrawOutcome::DeckEmpty);
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(game.opponent_id()));
    }

    #[test]
    fn test_relocate_keeps_tile_and_unit_in_sync() {
        let mut game = new_game();
        let avatar = game.get_player(game.human_id()).unwrap().avatar;
        game.relocate_unit(avatar, Position::new(1, 0)).unwrap();
        assert_eq!(game.unit(avatar).unwrap().position, Some(Position::new(1, 0)));
        assert_eq!(game.board.unit_at(Position::new(1, 0)), Some(avatar));
        assert!(game.board.is_empty_tile(Position::new(1, 2)));
        assert!(game.relocate_unit(avatar, Position::new(7, 2)).is_err());
    }
}
