//! Injected randomness
//!
//! Rolls go through the `Dice` trait so the rules stay deterministic under
//! test: play uses a seeded ChaCha stream, scripted encounters and tests use
//! a fixed queue.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of die rolls and uniform integers
pub trait Dice {
    /// One die: uniform in `[1, sides]`.
    fn die(&mut self, sides: i32) -> i32;

    /// Uniform integer in `[lo, hi]` inclusive.
    fn between(&mut self, lo: i32, hi: i32) -> i32;
}

/// Real dice over any `rand` generator
#[derive(Debug, Clone)]
pub struct RngDice<R: Rng> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<ChaCha8Rng> {
    /// Seeded stream, reproducible across runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn die(&mut self, sides: i32) -> i32 {
        self.rng.gen_range(1..=sides.max(1))
    }

    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

/// Scripted dice: pops pre-loaded values, clamping each into the requested
/// range. An exhausted queue yields the low end.
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    rolls: VecDeque<i32>,
}

impl FixedDice {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    pub fn push(&mut self, roll: i32) {
        self.rolls.push_back(roll);
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for FixedDice {
    fn die(&mut self, sides: i32) -> i32 {
        self.rolls
            .pop_front()
            .map(|r| r.clamp(1, sides.max(1)))
            .unwrap_or(1)
    }

    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        self.rolls
            .pop_front()
            .map(|r| r.clamp(lo, hi.max(lo)))
            .unwrap_or(lo)
    }
}
