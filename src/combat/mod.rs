//! Tactical combat subsystem
//!
//! Range-band combat over a shared 1-D line: sessions bind participants,
//! rules hold every formula, the engine drives the staged attack pipeline.

pub mod dice;
pub mod engine;
pub mod narrate;
pub mod range;
pub mod rules;
pub mod session;

pub use dice::{Dice, FixedDice, RngDice};
pub use engine::{AttackOutcome, Combats};
pub use range::{RangeBand, MAX_RANGE};
pub use rules::{CombatRules, ATTACK_COOLDOWN, MOVE_COOLDOWN};
pub use session::CombatSession;
