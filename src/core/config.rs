//! Combat configuration with documented constants
//!
//! All tunable values are collected here with explanations of their purpose.
//! Values are ADDITIVE where possible and integer-valued throughout so
//! results are portable across platforms.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::ConfigError;

/// Tunables for the combat rules and action pipeline
///
/// These defaults reproduce the classic feel: short attack cooldowns, cheap
/// defensive reactions, and a small but real reward for blocking in close.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Seconds an entity must wait between combat moves (advance/retreat)
    ///
    /// Set by the action handlers after a successful move, never by the
    /// session itself.
    pub move_cooldown_secs: u32,

    /// Stamina a defender pays to turn an incoming blow with shield or parry
    pub defense_stamina_cost: i32,

    /// Base static defense against ranged and thrown attacks
    ///
    /// Size and range penalties are added on top. Melee defense is an
    /// opposed dodge roll instead and does not use this value.
    pub ranged_base_defense: i32,

    /// Defense bonus a target gains beyond SHORT band against missiles
    pub long_range_penalty: i32,

    /// One-shot attack bonus granted to a defender who blocks or parries in
    /// melee, usable on their next swing against that attacker
    pub riposte_bonus: i32,

    /// Extra seconds added to the attacker's attack cooldown when their
    /// melee swing is blocked or parried
    pub block_cooldown_penalty_secs: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            move_cooldown_secs: 3,
            defense_stamina_cost: 2,
            ranged_base_defense: 5,
            long_range_penalty: 2,
            riposte_bonus: 2,
            block_cooldown_penalty_secs: 1,
        }
    }
}

impl CombatConfig {
    /// Parse a config from TOML text. Missing fields fall back to defaults.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
