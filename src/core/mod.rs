pub mod config;
pub mod error;
pub mod types;

pub use config::CombatConfig;
pub use error::{CombatError, ConfigError, EquipError, Result, TraitError};
pub use types::{EntityId, LocationId, SessionId};
