//! Ability tags and spell effects
//!
//! The ability vocabulary is closed: ten tags, stored as a bitset on each
//! unit. Spells resolve through a fixed effect table keyed by `SpellEffect`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ability tags a unit can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Attacks any enemy on the board; only countered when adjacent
    Ranged,
    /// Moves to any empty tile
    Flying,
    /// Adjacent enemies must attack this unit before doing anything else
    Provoke,
    /// Two attacks per turn
    AttackTwice,
    /// Summoned onto any empty tile instead of next to a friendly unit
    SummonAnywhere,
    /// Gains attack whenever its owner's avatar takes damage
    AvatarDamageEffect,
    /// Heals its owner's avatar when summoned
    HealAvatarOnSummon,
    /// Both players draw when this unit is summoned
    DrawCardOnSummon,
    /// Owner draws when this unit dies
    DrawCardOnDeath,
    /// Grows whenever the opposing player casts a spell
    SpellCastEffect,
}

impl Ability {
    pub const ALL: [Ability; 10] = [
        Ability::Ranged,
        Ability::Flying,
        Ability::Provoke,
        Ability::AttackTwice,
        Ability::SummonAnywhere,
        Ability::AvatarDamageEffect,
        Ability::HealAvatarOnSummon,
        Ability::DrawCardOnSummon,
        Ability::DrawCardOnDeath,
        Ability::SpellCastEffect,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ability::Ranged => "ranged",
            Ability::Flying => "flying",
            Ability::Provoke => "provoke",
            Ability::AttackTwice => "attack twice",
            Ability::SummonAnywhere => "summon anywhere",
            Ability::AvatarDamageEffect => "avatar damage effect",
            Ability::HealAvatarOnSummon => "heal avatar on summon",
            Ability::DrawCardOnSummon => "draw card on summon",
            Ability::DrawCardOnDeath => "draw card on death",
            Ability::SpellCastEffect => "spell cast effect",
        };
        f.write_str(name)
    }
}

/// Set of ability tags
///
/// Serialized as a list of tag names so catalog files stay readable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Ability>", into = "Vec<Ability>")]
pub struct AbilitySet(u16);

impl AbilitySet {
    pub fn empty() -> Self {
        AbilitySet(0)
    }

    pub fn contains(&self, ability: Ability) -> bool {
        self.0 & ability.bit() != 0
    }

    pub fn insert(&mut self, ability: Ability) {
        self.0 |= ability.bit();
    }

    pub fn remove(&mut self, ability: Ability) {
        self.0 &= !ability.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        Ability::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

impl FromIterator<Ability> for AbilitySet {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        let mut set = AbilitySet::empty();
        for ability in iter {
            set.insert(ability);
        }
        set
    }
}

impl From<Vec<Ability>> for AbilitySet {
    fn from(abilities: Vec<Ability>) -> Self {
        abilities.into_iter().collect()
    }
}

impl From<AbilitySet> for Vec<Ability> {
    fn from(set: AbilitySet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for AbilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ability in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{ability}")?;
            first = false;
        }
        Ok(())
    }
}

/// Which units a spell may target, relative to the caster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellTarget {
    /// Any enemy unit, avatar included
    EnemyUnit,
    /// Enemy units other than the avatar
    EnemyNonAvatar,
    /// Any friendly unit, avatar included
    FriendlyUnit,
    /// The caster's own avatar
    FriendlyAvatar,
}

/// Fixed spell effect table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellEffect {
    /// Reduce the target's health
    DealDamage { amount: i32 },
    /// Set the target's health to 0
    Destroy,
    /// Add to the target's attack
    BuffAttack { amount: i32 },
    /// Restore health, capped at the target's starting health
    Heal { amount: i32 },
}

impl SpellEffect {
    pub fn target(&self) -> SpellTarget {
        match self {
            SpellEffect::DealDamage { .. } => SpellTarget::EnemyUnit,
            SpellEffect::Destroy => SpellTarget::EnemyNonAvatar,
            SpellEffect::BuffAttack { .. } => SpellTarget::FriendlyAvatar,
            SpellEffect::Heal { .. } => SpellTarget::FriendlyUnit,
        }
    }
}
