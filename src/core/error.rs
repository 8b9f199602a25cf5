use thiserror::Error;

use crate::combat::range::RangeBand;
use crate::equip::WieldLocation;

/// Combat action failures surfaced to the acting entity.
///
/// These are expected, user-facing conditions: the pipeline converts them to
/// private messages and leaves all combat state untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatError {
    #[error("You are not in combat.")]
    NotInCombat,

    #[error("They are fighting someone else, somewhere else.")]
    DifferentSession,

    #[error("You cannot attack another player here.")]
    PvpForbidden,

    #[error("You can't do that for {remaining} more seconds.")]
    OnCooldown { remaining: u64 },

    #[error("You are too exhausted.")]
    Exhausted { needed: i32, available: i32 },

    #[error("They are out of reach of your weapon.")]
    OutOfRange { reach: RangeBand },

    #[error("You can't attack that.")]
    InvalidTarget,

    #[error("They are already fighting.")]
    AlreadyInCombat,
}

/// Structural errors from the trait model. These indicate programmer error
/// and propagate to the host for logging rather than being narrated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraitError {
    #[error("Invalid trait bounds: min {min} > max {max}")]
    InvalidBounds { min: i32, max: i32 },

    #[error("Trait '{0}' already exists")]
    Duplicate(String),
}

/// Structural errors from the equipment slot model.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipError {
    #[error("Slot occupied: {0:?}")]
    SlotOccupied(WieldLocation),
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CombatError>;
