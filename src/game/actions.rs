//! Card resolution: summons and spells

use crate::board::{HighlightMode, Position};
use crate::config::{SPELL_CAST_ATTACK_BONUS, SPELL_CAST_HEALTH_BONUS, SUMMON_HEAL};
use crate::core::{Ability, Card, CardKind, PlayerId, SpellEffect, Unit, UnitId};
use crate::game::event::{CardOutcome, Rejection};
use crate::game::render::{RenderCommand, UnitAnimation};
use crate::game::GameState;
use crate::{DuelError, Result};

impl GameState {
    /// Play the card in 0-based hand `slot` of `player` onto `target`
    ///
    /// The target must carry a highlight and the player must afford the
    /// card; otherwise nothing is spent and a notice is shown. Spells only
    /// cost mana once they resolve against a unit.
    pub fn play_card(&mut self, player: PlayerId, slot: usize, target: Position) -> Result<CardOutcome> {
        let card_id = self
            .get_player(player)?
            .hand
            .get(slot)
            .ok_or(DuelError::InvalidHandPosition(slot + 1))?;
        let card = self.card(card_id)?.clone();

        if self.board.highlight(target)? == HighlightMode::None {
            return Ok(self.reject_card(&card, Rejection::InvalidTile));
        }
        if !self.get_player(player)?.can_afford(card.mana_cost) {
            return Ok(self.reject_card(&card, Rejection::NotEnoughMana));
        }

        match card.kind {
            CardKind::Unit { attack, health } => {
                if !self.board.is_empty_tile(target) {
                    return Ok(self.reject_card(&card, Rejection::TileOccupied));
                }
                self.pay_for_card(player, &card, slot)?;
                let unit = self.summon(&card, player, target, attack, health)?;
                Ok(CardOutcome::Summoned(unit))
            }
            CardKind::Spell(effect) => {
                let Some(target_unit) = self.board.unit_at(target) else {
                    return Ok(self.reject_card(&card, Rejection::NoTarget));
                };
                self.cast_spell(effect, target_unit)?;
                log_event!(self, Normal, "card", "{} cast on {}", card.name, target);
                self.pay_for_card(player, &card, slot)?;
                self.trigger_spell_cast(player)?;
                Ok(CardOutcome::Cast {
                    card: card.id,
                    target,
                })
            }
        }
    }

    fn reject_card(&mut self, card: &Card, reason: Rejection) -> CardOutcome {
        log_event!(self, Normal, "card", "{} rejected: {:?}", card.name, reason);
        if let Some(notice) = reason.notice() {
            self.notify(notice);
        }
        CardOutcome::Rejected(reason)
    }

    fn pay_for_card(&mut self, player: PlayerId, card: &Card, slot: usize) -> Result<()> {
        let mana = self.get_player(player)?.mana - card.mana_cost;
        self.set_mana(player, mana)?;
        self.get_player_mut(player)?.hand.remove_at(slot);
        self.refresh_hand(player)
    }

    /// Create a unit for `card` on an empty tile and fire its summon triggers
    ///
    /// The new unit cannot act until its owner's next turn.
    pub fn summon(&mut self, card: &Card, player: PlayerId, pos: Position, attack: i32, health: i32) -> Result<UnitId> {
        let id = self.next_id();
        let abilities = self.catalog_abilities(&card.name);
        let mut unit = Unit::new(id, card.name.clone(), player, attack, health, abilities);
        unit.exhaust();
        self.add_unit(unit, pos)?;
        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: id,
            animation: UnitAnimation::Channel,
        });
        log_event!(self, Normal, "card", "{} summoned at {}", card.name, pos);

        if abilities.contains(Ability::HealAvatarOnSummon) {
            let avatar = self.avatar(player)?;
            let healed = (avatar.health() + SUMMON_HEAL).min(avatar.starting_health());
            self.set_player_health(player, healed)?;
        }
        if abilities.contains(Ability::DrawCardOnSummon) {
            let seats: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
            for seat in seats {
                if self.is_game_over() {
                    break;
                }
                self.draw_card(seat)?;
            }
        }
        Ok(id)
    }

    /// Apply a spell effect to the unit on the target tile
    pub fn cast_spell(&mut self, effect: SpellEffect, target: UnitId) -> Result<()> {
        let (health, attack, starting) = {
            let unit = self.unit(target)?;
            (unit.health(), unit.attack, unit.starting_health())
        };
        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: target,
            animation: UnitAnimation::Channel,
        });
        match effect {
            SpellEffect::DealDamage { amount } => self.set_unit_health(target, health - amount),
            SpellEffect::Destroy => self.set_unit_health(target, 0),
            SpellEffect::BuffAttack { amount } => self.set_unit_attack(target, attack + amount),
            // capped at starting health, even for a unit buffed past it
            SpellEffect::Heal { amount } => self.set_unit_health(target, (health + amount).min(starting)),
        }
    }

    /// Units of the other side with `SpellCastEffect` grow
    fn trigger_spell_cast(&mut self, caster: PlayerId) -> Result<()> {
        let watchers: Vec<UnitId> = self
            .board
            .roster()
            .iter()
            .copied()
            .filter(|id| {
                self.units
                    .get(*id)
                    .is_ok_and(|u| u.owner != caster && u.has(Ability::SpellCastEffect))
            })
            .collect();
        for id in watchers {
            let (attack, health) = {
                let unit = self.unit(id)?;
                (unit.attack, unit.health())
            };
            log_event!(self, Normal, "card", "unit {} feeds on the spell", id);
            self.set_unit_attack(id, attack + SPELL_CAST_ATTACK_BONUS)?;
            self.set_unit_health(id, health + SPELL_CAST_HEALTH_BONUS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardId, CardName};
    use crate::loader::CardCatalog;
    use std::sync::Arc;

    fn new_game() -> GameState {
        let catalog = Arc::new(CardCatalog::embedded().unwrap());
        GameState::new_two_player("Human", "Opponent", catalog).unwrap()
    }

    fn give(game: &mut GameState, player: PlayerId, name: &str) -> CardId {
        let id = game.next_id();
        let card = game.catalog.get_card(name).unwrap().instantiate(id, player);
        game.cards.insert(id, card);
        game.get_player_mut(player).unwrap().hand.add(id).unwrap();
        id
    }

    fn spawn(game: &mut GameState, owner: PlayerId, name: &str, pos: Position, attack: i32, health: i32) -> UnitId {
        let id = game.next_id();
        let abilities = game.catalog_abilities(&CardName::from(name));
        game.add_unit(Unit::new(id, name, owner, attack, health, abilities), pos)
            .unwrap()
    }

    fn play(game: &mut GameState, player: PlayerId, slot: usize, target: Position) -> CardOutcome {
        let card = game.get_player(player).unwrap().hand.get(slot).unwrap();
        let targets = game.card_targets(card, player).unwrap();
        game.highlight_tiles(&targets, HighlightMode::Move).unwrap();
        let outcome = game.play_card(player, slot, target).unwrap();
        game.clear_highlights();
        outcome
    }

    #[test]
    fn test_summon_spends_mana_and_compacts_hand() {
        let mut game = new_game();
        let human = game.human_id();
        game.set_mana(human, 2).unwrap();
        give(&mut game, human, "Truestrike");
        give(&mut game, human, "Comodo Charger");
        let last = give(&mut game, human, "Azure Herald");

        let outcome = play(&mut game, human, 1, Position::new(2, 2));
        let CardOutcome::Summoned(unit) = outcome else {
            panic!("expected summon, got {outcome:?}");
        };
        let player = game.get_player(human).unwrap();
        assert_eq!(player.mana, 1);
        assert_eq!(player.hand.len(), 2);
        assert_eq!(player.hand.get(1), Some(last));

        let summoned = game.unit(unit).unwrap();
        assert_eq!(summoned.position, Some(Position::new(2, 2)));
        assert_eq!(summoned.attacks_remaining, 0);
        assert_eq!(summoned.moves_remaining, 0);
    }

    #[test]
    fn test_not_enough_mana() {
        let mut game = new_game();
        let human = game.human_id();
        game.set_mana(human, 2).unwrap();
        give(&mut game, human, "Silverguard Knight");
        let outcome = play(&mut game, human, 0, Position::new(2, 2));
        assert_eq!(outcome, CardOutcome::Rejected(Rejection::NotEnoughMana));
        assert_eq!(game.get_player(human).unwrap().mana, 2);
        assert_eq!(game.get_player(human).unwrap().hand.len(), 1);
        assert!(game.render.notifications().any(|n| n == "Not Enough Mana"));
    }

    #[test]
    fn test_unhighlighted_tile() {
        let mut game = new_game();
        let human = game.human_id();
        game.set_mana(human, 5).unwrap();
        give(&mut game, human, "Comodo Charger");
        let outcome = play(&mut game, human, 0, Position::new(5, 0));
        assert_eq!(outcome, CardOutcome::Rejected(Rejection::InvalidTile));
        assert!(game.render.notifications().any(|n| n == "Invalid Tile"));
    }

    #[test]
    fn test_truestrike_and_spell_cast_effect() {
        let mut game = new_game();
        let human = game.human_id();
        let opponent = game.opponent_id();
        // an enforcer watching from the other side
        let enforcer = spawn(&mut game, opponent, "Pureblade Enforcer", Position::new(6, 2), 1, 4);
        game.set_mana(human, 1).unwrap();
        give(&mut game, human, "Truestrike");

        let outcome = play(&mut game, human, 0, Position::new(7, 2));
        assert!(matches!(outcome, CardOutcome::Cast { .. }));
        assert_eq!(game.get_player(opponent).unwrap().health, 18);
        assert_eq!(game.get_player(human).unwrap().mana, 0);
        let enforcer = game.unit(enforcer).unwrap();
        assert_eq!(enforcer.attack, 2);
        assert_eq!(enforcer.health(), 5);
    }

    #[test]
    fn test_heal_capped_at_starting_health() {
        let mut game = new_game();
        let human = game.human_id();
        game.set_player_health(human, 17).unwrap();
        game.set_mana(human, 1).unwrap();
        give(&mut game, human, "Sundrop Elixir");
        play(&mut game, human, 0, Position::new(1, 2));
        assert_eq!(game.get_player(human).unwrap().health, 20);
    }

    #[test]
    fn test_heal_pulls_buffed_unit_back_to_starting_health() {
        let mut game = new_game();
        let human = game.human_id();
        let enforcer = spawn(&mut game, human, "Pureblade Enforcer", Position::new(2, 2), 1, 4);
        game.set_unit_health(enforcer, 6).unwrap();
        game.set_mana(human, 1).unwrap();
        give(&mut game, human, "Sundrop Elixir");

        let outcome = play(&mut game, human, 0, Position::new(2, 2));
        assert!(matches!(outcome, CardOutcome::Cast { .. }), "got {outcome:?}");
        let unit = game.unit(enforcer).unwrap();
        assert_eq!(unit.starting_health(), 4);
        assert_eq!(unit.health(), 4);
    }

    #[test]
    fn test_entropic_decay_kills() {
        let mut game = new_game();
        let human = game.human_id();
        let opponent = game.opponent_id();
        let golem = spawn(&mut game, human, "Hailstone Golem", Position::new(2, 2), 4, 6);
        game.set_mana(opponent, 5).unwrap();
        give(&mut game, opponent, "Entropic Decay");
        play(&mut game, opponent, 0, Position::new(2, 2));
        assert!(!game.units.contains(golem));
        assert_eq!(game.get_player(opponent).unwrap().mana, 0);
    }

    #[test]
    fn test_staff_buffs_avatar() {
        let mut game = new_game();
        let opponent = game.opponent_id();
        game.set_mana(opponent, 2).unwrap();
        give(&mut game, opponent, "Staff of Y'Kir'");
        play(&mut game, opponent, 0, Position::new(7, 2));
        assert_eq!(game.avatar(opponent).unwrap().attack, 4);
    }

    #[test]
    fn test_heal_on_summon() {
        let mut game = new_game();
        let human = game.human_id();
        game.set_player_health(human, 15).unwrap();
        game.set_mana(human, 2).unwrap();
        give(&mut game, human, "Azure Herald");
        play(&mut game, human, 0, Position::new(2, 2));
        assert_eq!(game.get_player(human).unwrap().health, 18);
    }

    #[test]
    fn test_draw_on_summon_for_both_players() {
        let mut game = new_game();
        let human = game.human_id();
        let opponent = game.opponent_id();
        for seat in [human, opponent] {
            for _ in 0..2 {
                let id = game.next_id();
                let card = game.catalog.get_card("Planar Scout").unwrap().instantiate(id, seat);
                game.cards.insert(id, card);
                game.get_player_mut(seat).unwrap().deck.push(id);
            }
        }
        game.set_mana(opponent, 3).unwrap();
        give(&mut game, opponent, "Blaze Hound");
        play(&mut game, opponent, 0, Position::new(6, 2));
        assert_eq!(game.get_player(human).unwrap().hand.len(), 1);
        assert_eq!(game.get_player(opponent).unwrap().hand.len(), 1);
        assert_eq!(game.get_player(human).unwrap().deck.len(), 1);
    }
}
