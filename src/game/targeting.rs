//! Legal targets for a selected unit or card
//!
//! These are pure queries. The turn controller turns them into highlights,
//! and the opponent policy reads them directly.

use crate::board::{Occupant, Position, MOVE_RANGE};
use crate::core::{Ability, AbilitySet, CardId, CardKind, CardName, PlayerId, SpellTarget, UnitId};
use crate::game::{GameState, VerbosityLevel};
use crate::Result;

/// Tiles a selected unit may act on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitTargets {
    /// Enemy-occupied tiles to highlight as ATTACK
    pub attacks: Vec<Position>,
    /// Empty tiles to highlight as MOVE
    pub moves: Vec<Position>,
}

impl UnitTargets {
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty() && self.moves.is_empty()
    }
}

fn board_order(a: &Position, b: &Position) -> std::cmp::Ordering {
    (a.x, a.y).cmp(&(b.x, b.y))
}

impl GameState {
    /// Catalog abilities for a unit name; a miss is logged and yields none
    pub fn catalog_abilities(&self, name: &CardName) -> AbilitySet {
        match self.catalog.abilities(name.as_str()) {
            Some(abilities) => abilities,
            None => {
                self.logger.event(
                    VerbosityLevel::Normal,
                    "catalog",
                    &format!("no catalog entry for {name}, using no abilities"),
                );
                AbilitySet::empty()
            }
        }
    }

    fn occupant_of(&self, id: UnitId) -> Result<(Occupant, Position)> {
        let unit = self.unit(id)?;
        let pos = self.position_of(id)?;
        Ok((
            Occupant {
                unit: id,
                owner: unit.owner,
            },
            pos,
        ))
    }

    /// Adjacent tiles holding enemy units with provoke
    pub fn provoking_enemies(&self, id: UnitId) -> Result<Vec<Position>> {
        let (mover, origin) = self.occupant_of(id)?;
        Ok(self
            .board
            .adjacent_positions(origin)
            .filter(|p| {
                self.unit_at(*p)
                    .is_some_and(|u| u.owner != mover.owner && u.has(Ability::Provoke))
            })
            .collect())
    }

    /// Highlight plan for a selected unit
    ///
    /// Attack targets: provoking neighbours if any, else every enemy for a
    /// ranged unit, else adjacent enemies plus enemies next to any tile the
    /// unit could first walk to. Moves are suppressed while provoked.
    pub fn unit_targets(&self, id: UnitId) -> Result<UnitTargets> {
        let unit = self.unit(id)?;
        let (mover, origin) = self.occupant_of(id)?;
        let provokers = self.provoking_enemies(id)?;
        let is_enemy = |p: &Position| self.board.occupant(*p).is_some_and(|o| o.owner != mover.owner);

        let mut attacks = Vec::new();
        if unit.attacks_remaining > 0 {
            if !provokers.is_empty() {
                attacks = provokers.clone();
            } else if unit.has(Ability::Ranged) {
                attacks = self.board.tiles_with_units(|o| o.owner != mover.owner);
            } else {
                attacks.extend(self.board.adjacent_positions(origin).filter(|p| is_enemy(p)));
                if unit.attacks_per_turn == 2 || unit.moves_remaining > 0 {
                    for (tile, _) in self.board.reachable_tiles(mover, origin, MOVE_RANGE) {
                        for p in self.board.adjacent_positions(tile) {
                            if is_enemy(&p) && !attacks.contains(&p) {
                                attacks.push(p);
                            }
                        }
                    }
                }
                attacks.sort_by(board_order);
            }
        }

        let mut moves = Vec::new();
        if unit.moves_remaining > 0 && provokers.is_empty() {
            if unit.has(Ability::Flying) {
                moves = self.board.empty_tiles();
            } else {
                moves = self
                    .board
                    .reachable_tiles(mover, origin, MOVE_RANGE)
                    .into_iter()
                    .map(|(p, _)| p)
                    .collect();
                moves.sort_by(board_order);
            }
        }

        Ok(UnitTargets { attacks, moves })
    }

    /// Tile a unit steps to before attacking `target` from range
    ///
    /// Nearest reachable tile adjacent to the target; fewest steps first,
    /// then board order.
    pub fn approach_tile(&self, id: UnitId, target: Position) -> Result<Option<Position>> {
        let (mover, origin) = self.occupant_of(id)?;
        Ok(self
            .board
            .reachable_tiles(mover, origin, MOVE_RANGE)
            .into_iter()
            .filter(|(p, _)| p.is_adjacent(target))
            .min_by_key(|(p, steps)| (*steps, p.x, p.y))
            .map(|(p, _)| p))
    }

    /// Tiles a card may be played on by `player`
    pub fn card_targets(&self, card_id: CardId, player: PlayerId) -> Result<Vec<Position>> {
        let card = self.card(card_id)?;
        match card.kind {
            CardKind::Unit { .. } => {
                if self.catalog_abilities(&card.name).contains(Ability::SummonAnywhere) {
                    Ok(self.board.empty_tiles())
                } else {
                    Ok(self.board.empty_tiles_adjacent_to(player))
                }
            }
            CardKind::Spell(effect) => {
                let is_avatar = |id: UnitId| self.units.get(id).is_ok_and(|u| u.is_avatar);
                let targets = match effect.target() {
                    SpellTarget::EnemyUnit => self.board.tiles_with_units(|o| o.owner != player),
                    SpellTarget::EnemyNonAvatar => self
                        .board
                        .tiles_with_units(|o| o.owner != player && !is_avatar(o.unit)),
                    SpellTarget::FriendlyUnit => self.board.tiles_of_player(player),
                    SpellTarget::FriendlyAvatar => self
                        .avatar(player)
                        .ok()
                        .and_then(|a| a.position)
                        .into_iter()
                        .collect(),
                };
                Ok(targets)
            }
        }
    }
}
