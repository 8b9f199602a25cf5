//! Character trait model
//!
//! A `Trait` is a bounded numeric attribute with base/modifier/current
//! semantics. Three kinds exist: static stats (strength), counters
//! (encumbrance, reputation) and refillable gauges (health, stamina).
//! Setters clamp rather than reject; the derived `actual` value is what the
//! rest of the engine reads.

pub mod container;

pub use container::TraitContainer;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::TraitError;

/// The three trait kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitKind {
    /// Base + modifier; no current value (strength, level)
    Static,
    /// Current + modifier, clamped to an optional range (carry weight)
    Counter,
    /// Refillable pool whose actual value is `current` (health, stamina)
    Gauge,
}

/// Upper bound of a counter or gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TraitMax {
    /// No upper bound
    #[default]
    Unbounded,
    /// Fixed numeric bound
    Value(i32),
    /// Tracks `base + modifier`; buffs to a full gauge flow into `current`
    Base,
}

/// A single named attribute. Mutate only through the setters; they keep
/// `current` inside `[min, effective max]` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trait {
    kind: TraitKind,
    base: i32,
    modifier: i32,
    current: i32,
    min: Option<i32>,
    max: TraitMax,
    /// Open per-trait metadata (descriptions, tags, host bookkeeping)
    pub extra: AHashMap<String, serde_json::Value>,
}

impl Trait {
    /// Construct a trait with kind defaults: gauges get `min = 0` and
    /// `max = Base`, counters and statics are unbounded.
    pub fn new(kind: TraitKind, base: i32) -> Self {
        let (min, max) = match kind {
            TraitKind::Gauge => (Some(0), TraitMax::Base),
            _ => (None, TraitMax::Unbounded),
        };
        let mut t = Self {
            kind,
            base,
            modifier: 0,
            current: base,
            min,
            max,
            extra: AHashMap::new(),
        };
        t.current = t.clamp(t.current);
        t
    }

    /// Construct with explicit bounds. Fails when `min > max` with both
    /// numeric; out-of-range values are otherwise clamped, not rejected.
    pub fn with_bounds(
        kind: TraitKind,
        base: i32,
        min: Option<i32>,
        max: TraitMax,
    ) -> Result<Self, TraitError> {
        if let (Some(lo), TraitMax::Value(hi)) = (min, max) {
            if lo > hi {
                return Err(TraitError::InvalidBounds { min: lo, max: hi });
            }
        }
        let mut t = Self::new(kind, base);
        t.min = min;
        t.max = max;
        t.current = t.clamp(t.current);
        Ok(t)
    }

    /// Attach a modifier at construction time.
    pub fn with_mod(mut self, modifier: i32) -> Self {
        self.set_mod(modifier);
        self
    }

    pub fn kind(&self) -> TraitKind {
        self.kind
    }

    /// The value the engine reads: `base + mod` for statics, clamped
    /// `current + mod` for counters, clamped `current` for gauges.
    pub fn actual(&self) -> i32 {
        match self.kind {
            TraitKind::Static => self.base + self.modifier,
            TraitKind::Counter => self.clamp(self.current + self.modifier),
            TraitKind::Gauge => self.clamp(self.current),
        }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    /// Set the baseline. A base-tracking max takes the new value as-is (the
    /// base *is* the ceiling); fixed bounds clamp it. `current` re-clamps
    /// either way since the effective ceiling may have moved.
    pub fn set_base(&mut self, value: i32) {
        self.base = if self.max == TraitMax::Base {
            value
        } else {
            self.clamp(value)
        };
        self.current = self.clamp(self.current);
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Set the additive modifier.
    ///
    /// Gauge semantics: raising the modifier pushes the gain into `current`
    /// (a buff on a full gauge fills the new headroom); lowering it never
    /// drains `current` beyond the re-clamp.
    pub fn set_mod(&mut self, value: i32) {
        let delta = value - self.modifier;
        self.modifier = value;
        if self.kind == TraitKind::Gauge {
            if delta > 0 {
                self.current = self.clamp(self.current + delta);
            } else {
                self.current = self.clamp(self.current);
            }
        }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    /// Set the present value, clamped to `[min, effective max]`.
    pub fn set_current(&mut self, value: i32) {
        self.current = self.clamp(value);
    }

    pub fn min(&self) -> Option<i32> {
        self.min
    }

    /// The effective upper bound, resolving a base-tracking max.
    pub fn effective_max(&self) -> Option<i32> {
        match self.max {
            TraitMax::Unbounded => None,
            TraitMax::Value(v) => Some(v),
            TraitMax::Base => Some(self.base + self.modifier),
        }
    }

    /// Refill: `current = base + mod`, clamped.
    pub fn fill(&mut self) {
        self.current = self.clamp(self.base + self.modifier);
    }

    /// Clear the modifier. Gauges may need re-clamping afterwards.
    pub fn reset_mod(&mut self) {
        self.set_mod(0);
    }

    /// Reset `current` back to the baseline.
    pub fn reset_current(&mut self) {
        self.current = self.clamp(self.base);
    }

    /// Fullness as a percentage in `[0.0, 100.0]`. Returns `100.0` when the
    /// upper bound is missing or zero.
    pub fn percent(&self) -> f32 {
        match self.effective_max() {
            Some(max) if max != 0 => {
                let pct = self.actual() as f32 * 100.0 / max as f32;
                pct.clamp(0.0, 100.0)
            }
            _ => 100.0,
        }
    }

    fn clamp(&self, value: i32) -> i32 {
        let mut value = value;
        if let Some(max) = self.effective_max() {
            if value > max {
                value = max;
            }
        }
        if let Some(min) = self.min {
            if value < min {
                value = min;
            }
        }
        value
    }
}

// Comparisons and arithmetic operate on `actual`, so traits read naturally
// in roll formulas. Two traits with equal actual values compare equal even
// across kinds.

impl PartialEq for Trait {
    fn eq(&self, other: &Self) -> bool {
        self.actual() == other.actual()
    }
}

impl PartialEq<i32> for Trait {
    fn eq(&self, other: &i32) -> bool {
        self.actual() == *other
    }
}

impl PartialOrd for Trait {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.actual().partial_cmp(&other.actual())
    }
}

impl PartialOrd<i32> for Trait {
    fn partial_cmp(&self, other: &i32) -> Option<std::cmp::Ordering> {
        self.actual().partial_cmp(other)
    }
}

impl std::ops::Add<i32> for &Trait {
    type Output = i32;
    fn add(self, rhs: i32) -> i32 {
        self.actual() + rhs
    }
}

impl std::ops::Sub<i32> for &Trait {
    type Output = i32;
    fn sub(self, rhs: i32) -> i32 {
        self.actual() - rhs
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TraitKind::Gauge => write!(
                f,
                "{:4} / {:4} ({:+3})",
                self.actual(),
                self.effective_max().unwrap_or(self.base),
                self.modifier
            ),
            _ => write!(f, "{:4} ({:+3})", self.actual(), self.modifier),
        }
    }
}
