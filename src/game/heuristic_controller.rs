//! Heuristic opponent policy
//!
//! Decisions are pure functions of a `GameStateView` returning an
//! `OpponentAction`; the game loop applies each action through the normal
//! event path. A turn has three phases: spells, summons, then one pass over
//! the units that were on the board before summoning (plus a second pass for
//! units that attack twice).

use crate::board::Position;
use crate::core::{Ability, CardId, PlayerId, SpellEffect, Unit, UnitId};
use crate::game::controller::GameStateView;

/// Enemy health above which a removal spell is worth spending
pub const REMOVAL_HEALTH_THRESHOLD: i32 = 5;

/// Missing health that justifies a healing spell
pub const HEAL_DEFICIT_THRESHOLD: i32 = 3;

/// Avatar health below which the avatar avoids trades
pub const AVATAR_CAUTION_HEALTH: i32 = 10;

/// Candidate tiles tried when retreating
pub const RETREAT_ATTEMPTS: usize = 6;

/// Two-step retreat offsets
const RETREAT_OFFSETS: [(i32, i32); 8] = [
    (0, 2),
    (0, -2),
    (2, 0),
    (-2, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// One decision, applied through the turn controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentAction {
    Move { unit: UnitId, to: Position },
    Attack { unit: UnitId, target: Position },
    /// A move, then an attack from the new tile
    MoveAndAttack { unit: UnitId, to: Position, target: Position },
    Summon { card: CardId, tile: Position },
    CastSpell { card: CardId, tile: Position },
    /// Hold the spell; ends the spell phase
    PassSpell { card: CardId },
}

/// Enemy pressure around a tile, by compass direction
///
/// Orthogonal enemies weigh 2 in their direction; diagonal ones weigh 1 in
/// each of their two directions. North is towards y = 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Threat {
    pub north: i32,
    pub south: i32,
    pub east: i32,
    pub west: i32,
}

impl Threat {
    pub fn around(origin: Position, enemies: &[Position]) -> Self {
        let mut threat = Threat::default();
        for enemy in enemies {
            let dx = (enemy.x - origin.x).signum();
            let dy = (enemy.y - origin.y).signum();
            let weight = if dx == 0 || dy == 0 { 2 } else { 1 };
            match dx {
                1 => threat.east += weight,
                -1 => threat.west += weight,
                _ => {}
            }
            match dy {
                1 => threat.south += weight,
                -1 => threat.north += weight,
                _ => {}
            }
        }
        threat
    }

    /// How much a step of (dx, dy) moves away from the pressure
    pub fn safety(&self, dx: i32, dy: i32) -> i32 {
        dx * (self.west - self.east) + dy * (self.north - self.south)
    }
}

/// Tile in `tiles` nearest to `target` by Manhattan distance; first wins ties
pub fn closest_tile(tiles: &[Position], target: Position) -> Option<Position> {
    tiles.iter().copied().min_by_key(|t| t.manhattan(target))
}

/// Tile in `tiles` farthest from `target` by Manhattan distance; first wins ties
pub fn farthest_tile(tiles: &[Position], target: Position) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;
    for tile in tiles {
        let distance = tile.manhattan(target);
        if best.map_or(true, |(_, d)| distance > d) {
            best = Some((*tile, distance));
        }
    }
    best.map(|(t, _)| t)
}

/// Integer centroid of a set of positions
pub fn centroid(positions: &[Position]) -> Option<Position> {
    if positions.is_empty() {
        return None;
    }
    let n = positions.len() as i32;
    let (sx, sy) = positions
        .iter()
        .fold((0, 0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Position::new(sx / n, sy / n))
}

/// Best two-step retreat from `origin` among `legal` destinations
///
/// Offsets are ranked by how far they lead from the surrounding enemies;
/// only the best few are tried and a step must actually reduce pressure.
/// `None` means stay put.
pub fn retreat_tile(origin: Position, enemies: &[Position], legal: &[Position]) -> Option<Position> {
    let threat = Threat::around(origin, enemies);
    let mut ranked: Vec<(i32, i32, i32)> = RETREAT_OFFSETS
        .iter()
        .map(|&(dx, dy)| (threat.safety(dx, dy), dx, dy))
        .collect();
    // stable: offset order breaks ties
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked
        .into_iter()
        .take(RETREAT_ATTEMPTS)
        .filter(|(safety, _, _)| *safety > 0)
        .map(|(_, dx, dy)| origin.offset(dx, dy))
        .find(|tile| legal.contains(tile))
}

/// Heuristic controller for an automated seat
#[derive(Debug, Clone)]
pub struct HeuristicController {
    player_id: PlayerId,
}

impl HeuristicController {
    pub fn new(player_id: PlayerId) -> Self {
        HeuristicController { player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn affordable(&self, view: &GameStateView, card: CardId) -> bool {
        view.card(card).is_some_and(|c| c.mana_cost <= view.mana())
    }

    /// Next spell to cast, or a pass when a removal spell has no target
    ///
    /// Attack buffs go on the avatar first. Removal prefers a ranged enemy
    /// (highest health first), then the healthiest enemy above the
    /// threshold. Damage spells are spent only on kills; heals only on a
    /// sizeable deficit.
    pub fn plan_spell(&self, view: &GameStateView) -> Option<OpponentAction> {
        let spells: Vec<(CardId, SpellEffect)> = view
            .hand()
            .iter()
            .filter(|c| self.affordable(view, **c))
            .filter_map(|c| view.card(*c).and_then(|card| card.spell_effect()).map(|e| (*c, e)))
            .collect();

        if let Some((card, _)) = spells
            .iter()
            .find(|(_, e)| matches!(e, SpellEffect::BuffAttack { .. }))
        {
            let tile = view.my_avatar().and_then(|a| a.position)?;
            return Some(OpponentAction::CastSpell { card: *card, tile });
        }

        for (card, effect) in &spells {
            let targets = self.spell_candidates(view, *card);
            let choice = match effect {
                SpellEffect::Destroy => {
                    let choice = best_by_health(&targets, |u| u.has(Ability::Ranged)).or_else(|| {
                        best_by_health(&targets, |u| u.health() > REMOVAL_HEALTH_THRESHOLD)
                    });
                    if choice.is_none() {
                        return Some(OpponentAction::PassSpell { card: *card });
                    }
                    choice
                }
                SpellEffect::DealDamage { amount } => {
                    best_by_health(&targets, |u| u.health() <= *amount && u.has(Ability::Ranged))
                        .or_else(|| best_by_health(&targets, |u| u.health() <= *amount))
                }
                SpellEffect::Heal { .. } => targets
                    .iter()
                    .map(|u| (u, u.starting_health() - u.health()))
                    .filter(|(_, deficit)| *deficit >= HEAL_DEFICIT_THRESHOLD)
                    .max_by_key(|(u, deficit)| (*deficit, u.is_avatar))
                    .map(|(u, _)| *u),
                SpellEffect::BuffAttack { .. } => None,
            };
            if let Some(tile) = choice.and_then(|u| u.position) {
                return Some(OpponentAction::CastSpell { card: *card, tile });
            }
        }
        None
    }

    fn spell_candidates<'v>(&self, view: &'v GameStateView, card: CardId) -> Vec<&'v Unit> {
        view.card_targets(card)
            .into_iter()
            .filter_map(|p| view.unit_at(p))
            .collect()
    }

    /// Next unit card to summon: the priciest affordable one that has a tile
    ///
    /// Ranged and flying units keep their distance from the enemy's centre of
    /// mass; everything else lands as close to the enemy avatar as it can.
    pub fn plan_summon(&self, view: &GameStateView) -> Option<OpponentAction> {
        let mut candidates: Vec<(CardId, i32)> = view
            .hand()
            .iter()
            .filter(|c| self.affordable(view, **c))
            .filter_map(|c| view.card(*c).filter(|card| card.is_unit()).map(|card| (*c, card.mana_cost)))
            .collect();
        // stable: hand order breaks ties
        candidates.sort_by(|a, b| b.1.cmp(&a.1));

        let enemy_positions: Vec<Position> = view
            .enemy_units()
            .into_iter()
            .filter_map(|id| view.unit(id).and_then(|u| u.position))
            .collect();
        let enemy_avatar = view.enemy_avatar().and_then(|a| a.position);

        for (card, _) in candidates {
            let tiles = view.card_targets(card);
            if tiles.is_empty() {
                continue;
            }
            let tile = if self.keeps_distance(view, card) {
                centroid(&enemy_positions).and_then(|c| farthest_tile(&tiles, c))
            } else {
                enemy_avatar.and_then(|a| closest_tile(&tiles, a))
            };
            if let Some(tile) = tile {
                return Some(OpponentAction::Summon { card, tile });
            }
        }
        None
    }

    fn keeps_distance(&self, view: &GameStateView, card: CardId) -> bool {
        view.card_abilities(card)
            .is_some_and(|a| a.contains(Ability::Ranged) || a.contains(Ability::Flying))
    }

    /// Move and attack choice for one unit
    pub fn plan_unit(&self, view: &GameStateView, id: UnitId) -> Option<OpponentAction> {
        let unit = view.unit(id)?;
        let origin = unit.position?;
        if unit.is_exhausted() {
            return None;
        }
        let enemy_avatar = view.enemy_avatar()?;
        let avatar_tile = enemy_avatar.position?;
        let targets = view.unit_targets(id);
        let threats = &targets.attacks;
        let moves = &targets.moves;
        let toward = |pos: Position| closest_tile(moves, pos);
        let away = |from: &[Position]| retreat_tile(origin, from, moves);

        let (first, second) = match threats.len() {
            0 if unit.is_avatar => (away(&[avatar_tile]), None),
            0 if unit.has(Ability::Provoke) => {
                let nearest = view
                    .enemy_units()
                    .into_iter()
                    .filter_map(|e| view.unit(e).and_then(|u| u.position))
                    .min_by_key(|p| p.manhattan(origin))
                    .unwrap_or(avatar_tile);
                (toward(nearest), None)
            }
            0 if unit.has(Ability::Flying) => {
                let prey = view
                    .enemy_units()
                    .into_iter()
                    .filter_map(|e| view.unit(e))
                    .find(|u| u.has(Ability::Ranged))
                    .and_then(|u| u.position)
                    .unwrap_or(avatar_tile);
                (toward(prey), Some(prey))
            }
            0 => (toward(avatar_tile), None),
            1 => {
                let tile = threats[0];
                let enemy = view.unit_at(tile)?;
                self.single_threat(unit, enemy, tile, avatar_tile, &toward, &away)
            }
            _ => self.many_threats(view, unit, threats, avatar_tile, &toward, &away),
        };

        let is_enemy = |p: Position| view.unit_at(p).is_some_and(|u| u.owner != unit.owner);
        let action = compose(id, origin, first, second, is_enemy);
        #[cfg(feature = "verbose-logging")]
        if let Some(action) = action {
            view.logger().event(
                crate::game::VerbosityLevel::Verbose,
                "policy",
                &format!("{} at {}: {:?}", unit.name, origin, action),
            );
        }
        action
    }

    fn single_threat(
        &self,
        unit: &Unit,
        enemy: &Unit,
        tile: Position,
        avatar_tile: Position,
        toward: &dyn Fn(Position) -> Option<Position>,
        away: &dyn Fn(&[Position]) -> Option<Position>,
    ) -> (Option<Position>, Option<Position>) {
        if unit.has(Ability::Ranged) {
            return (away(&[tile]), Some(avatar_tile));
        }
        if unit.has(Ability::Flying) {
            if enemy.has(Ability::Ranged) || enemy.is_avatar || enemy.has(Ability::Provoke) {
                return (Some(tile), None);
            }
            return (toward(avatar_tile), Some(avatar_tile));
        }
        if unit.has(Ability::Provoke) {
            return (Some(tile), None);
        }
        if unit.is_avatar {
            let easy = enemy.health() <= unit.attack || enemy.attack * 2 < unit.health();
            let first = if !easy {
                away(&[tile])
            } else if enemy.has(Ability::Provoke) || unit.health() >= AVATAR_CAUTION_HEALTH {
                Some(tile)
            } else {
                away(&[tile])
            };
            return (first, None);
        }

        let healthy = unit.health() * 2 >= unit.starting_health();
        let first = if enemy.has(Ability::Provoke) || enemy.has(Ability::Ranged) {
            Some(tile)
        } else if enemy.health() <= unit.attack {
            Some(tile)
        } else if enemy.attack * 2 <= unit.health() && healthy {
            Some(tile)
        } else if enemy.attack >= unit.health() && unit.attack < enemy.health() {
            away(&[tile])
        } else {
            Some(tile)
        };
        (first, None)
    }

    fn many_threats(
        &self,
        view: &GameStateView,
        unit: &Unit,
        threats: &[Position],
        avatar_tile: Position,
        toward: &dyn Fn(Position) -> Option<Position>,
        away: &dyn Fn(&[Position]) -> Option<Position>,
    ) -> (Option<Position>, Option<Position>) {
        if unit.is_avatar {
            return (away(threats), None);
        }
        let mut strongest: Option<(Position, i32)> = None;
        let mut killable = None;
        let mut ranged = None;
        let mut provoker = None;
        let mut has_avatar = false;
        for tile in threats {
            let Some(enemy) = view.unit_at(*tile) else {
                continue;
            };
            if strongest.map_or(true, |(_, attack)| enemy.attack > attack) {
                strongest = Some((*tile, enemy.attack));
            }
            if enemy.health() <= unit.attack {
                killable = Some(*tile);
            }
            if enemy.has(Ability::Ranged) {
                ranged = Some(*tile);
            } else if enemy.has(Ability::Provoke) {
                provoker = Some(*tile);
            } else if enemy.is_avatar {
                has_avatar = true;
            }
        }

        if unit.has(Ability::Flying) {
            if has_avatar {
                return (Some(avatar_tile), None);
            }
            return (toward(avatar_tile), Some(avatar_tile));
        }

        let target = ranged
            .or(has_avatar.then_some(avatar_tile))
            .or(provoker)
            .or(killable.filter(|_| !unit.has(Ability::Ranged)))
            .or(strongest.map(|(t, _)| t));

        if unit.has(Ability::Ranged) {
            (away(threats), target)
        } else {
            (target, None)
        }
    }
}

/// Unit with the most health among those matching `pred`; first wins ties
fn best_by_health<'u>(units: &[&'u Unit], pred: impl Fn(&Unit) -> bool) -> Option<&'u Unit> {
    let mut best: Option<&Unit> = None;
    for unit in units.iter().copied().filter(|u| pred(*u)) {
        if best.map_or(true, |b| unit.health() > b.health()) {
            best = Some(unit);
        }
    }
    best
}

/// Turn a first and optional second click into an action
///
/// A first click on the unit's own tile means "stay". A first click on an
/// enemy is an attack and ends the unit's plan.
fn compose(
    unit: UnitId,
    origin: Position,
    first: Option<Position>,
    second: Option<Position>,
    is_enemy: impl Fn(Position) -> bool,
) -> Option<OpponentAction> {
    match (first.filter(|p| *p != origin), second) {
        (Some(target), _) if is_enemy(target) => Some(OpponentAction::Attack { unit, target }),
        (Some(to), Some(target)) => Some(OpponentAction::MoveAndAttack { unit, to, target }),
        (Some(to), None) => Some(OpponentAction::Move { unit, to }),
        (None, Some(target)) => Some(OpponentAction::Attack { unit, target }),
        (None, None) => None,
    }
}
