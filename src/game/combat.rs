//! Unit actions: move, attack, move-and-attack and counterattack

use crate::board::{HighlightMode, Position};
use crate::core::{Ability, UnitId};
use crate::game::event::{ActionOutcome, Rejection};
use crate::game::render::{RenderCommand, UnitAnimation};
use crate::game::GameState;
use crate::Result;

impl GameState {
    /// Resolve a tile click for the selected unit `id`
    ///
    /// Relies on the tile highlights computed when the unit was selected.
    /// An attack spends one attack and one move; a move spends one move;
    /// move-and-attack spends the same as a plain attack.
    pub fn resolve_unit_action(&mut self, id: UnitId, target: Position) -> Result<ActionOutcome> {
        let tile = self.board.tile(target)?;
        let highlight = tile.highlight;
        let occupant = tile.occupant;

        let unit = self.unit(id)?;
        let origin = self.position_of(id)?;
        let owner = unit.owner;
        let ranged = unit.has(Ability::Ranged);
        let attacks_left = unit.attacks_remaining;
        let moves_left = unit.moves_remaining;
        let attacks_per_turn = unit.attacks_per_turn;

        if unit.is_exhausted() {
            log_event!(self, Verbose, "combat", "{} has no actions left", unit.name);
            return Ok(ActionOutcome::Rejected(Rejection::Exhausted));
        }

        match occupant {
            Some(enemy) if enemy.owner != owner => {
                if highlight != HighlightMode::Attack || attacks_left == 0 {
                    return Ok(ActionOutcome::Rejected(Rejection::NotAllowed));
                }
                if origin.is_adjacent(target) || ranged {
                    self.units.get_mut(id)?.spend_attack();
                    let countered = self.attack(id, enemy.unit)?;
                    Ok(ActionOutcome::Attacked { target, countered })
                } else if attacks_per_turn == 2 || moves_left > 0 {
                    let Some(step) = self.approach_tile(id, target)? else {
                        return Ok(ActionOutcome::Rejected(Rejection::NoApproach));
                    };
                    self.units.get_mut(id)?.spend_attack();
                    self.relocate_unit(id, step)?;
                    let countered = self.attack(id, enemy.unit)?;
                    Ok(ActionOutcome::MovedAndAttacked {
                        to: step,
                        target,
                        countered,
                    })
                } else {
                    Ok(ActionOutcome::Rejected(Rejection::NotAllowed))
                }
            }
            Some(_) => Ok(ActionOutcome::Rejected(Rejection::NotAllowed)),
            None => {
                if highlight != HighlightMode::Move || moves_left == 0 {
                    return Ok(ActionOutcome::Rejected(Rejection::NotAllowed));
                }
                self.units.get_mut(id)?.spend_move();
                self.render.push(RenderCommand::PlayUnitAnimation {
                    unit: id,
                    animation: UnitAnimation::Move,
                });
                self.relocate_unit(id, target)?;
                log_event!(self, Normal, "combat", "unit {} moves {} -> {}", id, origin, target);
                Ok(ActionOutcome::Moved { from: origin, to: target })
            }
        }
    }

    /// Deal the attacker's damage to the defender, then let a surviving
    /// defender strike back unless it was shot from range
    ///
    /// Returns whether a counterattack happened.
    pub fn attack(&mut self, attacker: UnitId, defender: UnitId) -> Result<bool> {
        let (a_pos, a_attack, ranged) = {
            let a = self.unit(attacker)?;
            (self.position_of(attacker)?, a.attack, a.has(Ability::Ranged))
        };
        let (d_pos, d_health) = {
            let d = self.unit(defender)?;
            (self.position_of(defender)?, d.health())
        };
        let adjacent = a_pos.is_adjacent(d_pos);

        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: attacker,
            animation: UnitAnimation::Attack,
        });
        if ranged && !adjacent {
            self.render.push(RenderCommand::PlayProjectileAnimation { from: a_pos, to: d_pos });
        }
        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: defender,
            animation: UnitAnimation::Hit,
        });
        log_event!(
            self,
            Normal,
            "combat",
            "unit {} at {} attacks unit {} at {} for {}",
            attacker,
            a_pos,
            defender,
            d_pos,
            a_attack
        );
        self.set_unit_health(defender, d_health - a_attack)?;

        if self.is_game_over() || !self.units.contains(defender) {
            return Ok(false);
        }
        if ranged && !adjacent {
            return Ok(false);
        }
        self.counterattack(defender, attacker)?;
        Ok(true)
    }

    /// One retaliatory strike; never chains
    fn counterattack(&mut self, defender: UnitId, attacker: UnitId) -> Result<()> {
        let d_attack = self.unit(defender)?.attack;
        let a_health = self.unit(attacker)?.health();
        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: defender,
            animation: UnitAnimation::Attack,
        });
        self.render.push(RenderCommand::PlayUnitAnimation {
            unit: attacker,
            animation: UnitAnimation::Hit,
        });
        log_event!(self, Normal, "combat", "unit {} counterattacks for {}", defender, d_attack);
        self.set_unit_health(attacker, a_health - d_attack)
    }
}
