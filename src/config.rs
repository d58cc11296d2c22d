//! Rule constants and session configuration

use crate::board::Position;
use crate::game::VerbosityLevel;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where each avatar starts
pub const HUMAN_AVATAR_START: Position = Position::new(1, 2);
pub const OPPONENT_AVATAR_START: Position = Position::new(7, 2);

/// Avatar stats and player health cap
pub const AVATAR_HEALTH: i32 = 20;
pub const AVATAR_ATTACK: i32 = 2;

/// Cards dealt to each player before the first turn
pub const STARTING_HAND: usize = 3;

/// Health restored to the avatar by `HealAvatarOnSummon`
pub const SUMMON_HEAL: i32 = 3;

/// Attack gained by `AvatarDamageEffect` units when their avatar is hit
pub const AVATAR_DAMAGE_ATTACK_BONUS: i32 = 2;

/// Stats gained by `SpellCastEffect` units when the other side casts
pub const SPELL_CAST_ATTACK_BONUS: i32 = 1;
pub const SPELL_CAST_HEALTH_BONUS: i32 = 1;

/// Session options, loadable from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub verbosity: VerbosityLevel,

    /// Shuffle seed; decks are dealt in catalog order when absent
    pub seed: Option<u64>,

    /// Turn limit for self-play
    pub max_turns: u32,

    /// Alternative catalog file; the embedded catalog is used when absent
    pub catalog: Option<PathBuf>,

    /// Record outbound render commands
    pub record_render: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            verbosity: VerbosityLevel::Normal,
            seed: None,
            max_turns: 200,
            catalog: None,
            record_render: true,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "seed": 9, "verbosity": "Verbose" }"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.verbosity, VerbosityLevel::Verbose);
        assert_eq!(config.max_turns, 200);
        assert!(config.catalog.is_none());
    }
}
