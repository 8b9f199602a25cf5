//! Property tests for the trait model's clamp and buff-flow invariants

use proptest::prelude::*;

use iron_reach::traits::{Trait, TraitKind, TraitMax};

fn in_bounds(t: &Trait) {
    let actual = t.actual();
    if let Some(min) = t.min() {
        assert!(actual >= min, "actual {actual} under min {min}");
    }
    if let Some(max) = t.effective_max() {
        // a debuff can drag a base-tracked ceiling under the floor; the
        // floor wins in that degenerate corner
        let max = t.min().map_or(max, |min| max.max(min));
        assert!(actual <= max, "actual {actual} over max {max}");
    }
}

proptest! {
    /// Whatever sequence of setter calls runs, a bounded trait's actual
    /// value stays inside its bounds.
    #[test]
    fn gauge_actual_stays_in_bounds(
        base in 0i32..100,
        ops in prop::collection::vec((0u8..4, -150i32..150), 0..24),
    ) {
        let mut gauge = Trait::new(TraitKind::Gauge, base);
        for (op, value) in ops {
            match op {
                0 => gauge.set_current(value),
                1 => gauge.set_mod(value.clamp(-50, 50)),
                2 => gauge.set_base(value.clamp(0, 100)),
                _ => gauge.fill(),
            }
            in_bounds(&gauge);
        }
    }

    /// Buffing a full gauge lifts current by exactly the delta; removing
    /// the buff only ever re-clamps.
    #[test]
    fn full_gauge_buff_flows_into_current(base in 1i32..100, delta in 1i32..50) {
        let mut gauge = Trait::new(TraitKind::Gauge, base);
        gauge.fill();
        let before = gauge.current();
        gauge.set_mod(delta);
        prop_assert_eq!(gauge.current(), before + delta);

        gauge.set_mod(0);
        prop_assert!(gauge.current() <= before.max(gauge.effective_max().unwrap_or(i32::MAX)));
        in_bounds(&gauge);
    }

    /// Filling twice is the same as filling once.
    #[test]
    fn fill_is_idempotent(base in 0i32..100, spent in 0i32..100) {
        let mut gauge = Trait::new(TraitKind::Gauge, base);
        gauge.set_current(base - spent);
        gauge.fill();
        let once = gauge.clone();
        gauge.fill();
        prop_assert_eq!(&gauge, &once);
    }

    /// Counters honor explicit bounds under arbitrary writes.
    #[test]
    fn counter_respects_explicit_bounds(
        value in -200i32..200,
        modifier in -50i32..50,
    ) {
        let mut counter =
            Trait::with_bounds(TraitKind::Counter, 0, Some(0), TraitMax::Value(100)).unwrap();
        counter.set_current(value);
        counter.set_mod(modifier);
        in_bounds(&counter);
    }
}
