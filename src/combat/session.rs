//! The stateful combat arena
//!
//! A session binds two or more entities to positions on a shared 1-D line.
//! The session owns the positions table; entities hold only a non-owning
//! `SessionId` handle that is nulled on removal, so there is no ownership
//! cycle to break. A session with one participant left is finished, and
//! finished is absorbing.

use ahash::AHashMap;

use crate::combat::range::{RangeBand, MAX_RANGE};
use crate::core::error::{CombatError, Result};
use crate::core::types::{EntityId, SessionId};
use crate::entity::{Combatant, EntityStore};

use super::narrate;

/// Participants and their positions, plus the one-shot riposte bonuses
/// granted by blocks and parries.
#[derive(Debug, Clone)]
pub struct CombatSession {
    id: SessionId,
    positions: AHashMap<EntityId, i32>,
    /// (beneficiary, opponent) → bonus on the beneficiary's next roll
    /// against that opponent
    next_attack_bonus: AHashMap<(EntityId, EntityId), i32>,
}

impl CombatSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            positions: AHashMap::new(),
            next_attack_bonus: AHashMap::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn positions(&self) -> &AHashMap<EntityId, i32> {
        &self.positions
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn position_of(&self, id: EntityId) -> Option<i32> {
        self.positions.get(&id).copied()
    }

    /// Finished when one or zero participants remain.
    pub fn finished(&self) -> bool {
        self.positions.len() <= 1
    }

    /// Insert a participant at `position` and point its back-reference here.
    pub fn add(&mut self, entity: &mut dyn Combatant, position: i32) -> Result<()> {
        if self.positions.contains_key(&entity.id()) {
            return Err(CombatError::AlreadyInCombat);
        }
        self.positions
            .insert(entity.id(), position.clamp(0, MAX_RANGE));
        entity.set_combat(Some(self.id));
        Ok(())
    }

    /// Drop a participant. The back-reference is cleared only if it still
    /// points at this session. Ends the session when ≤1 remain.
    pub fn remove(&mut self, world: &mut dyn EntityStore, id: EntityId) {
        if self.positions.remove(&id).is_none() {
            return;
        }
        self.next_attack_bonus
            .retain(|(to, versus), _| *to != id && *versus != id);
        if let Some(entity) = world.get_mut(id) {
            if entity.combat() == Some(self.id) {
                entity.set_combat(None);
            }
        }
        if self.finished() {
            self.end(world);
        }
    }

    /// Tear the session down: clear every surviving back-reference and tell
    /// player participants how it went. Idempotent.
    pub fn end(&mut self, world: &mut dyn EntityStore) {
        let survivors: Vec<EntityId> = self.positions.keys().copied().collect();
        let lone_victor = survivors.len() == 1;
        for id in survivors {
            if let Some(entity) = world.get_mut(id) {
                if entity.combat() == Some(self.id) {
                    entity.set_combat(None);
                }
                if entity.is_player() {
                    if lone_victor {
                        entity.send(&narrate::victory());
                    } else {
                        entity.send(&narrate::combat_over());
                    }
                }
            }
        }
        self.positions.clear();
        self.next_attack_bonus.clear();
        tracing::debug!(session = ?self.id, "combat session ended");
    }

    /// Absorb another session's state during a merge. Participants are
    /// disjoint by invariant, so no dedup is needed; back-reference
    /// retargeting is the engine's job.
    pub(crate) fn absorb(&mut self, other: &mut CombatSession) {
        self.positions.extend(other.positions.drain());
        self.next_attack_bonus
            .extend(other.next_attack_bonus.drain());
    }

    /// Used by the engine when it already owns the back-reference dance.
    pub(crate) fn insert_position(&mut self, id: EntityId, position: i32) {
        self.positions.insert(id, position.clamp(0, MAX_RANGE));
    }

    pub fn distance(&self, a: EntityId, b: EntityId) -> Option<i32> {
        let pa = self.position_of(a)?;
        let pb = self.position_of(b)?;
        Some((pa - pb).abs())
    }

    /// The band covering the distance between two participants.
    pub fn get_range(&self, a: EntityId, b: EntityId) -> Option<RangeBand> {
        self.distance(a, b).map(RangeBand::for_distance)
    }

    /// True when `b` is within `band` of `a`.
    pub fn in_range(&self, a: EntityId, b: EntityId, band: RangeBand) -> bool {
        match self.distance(a, b) {
            Some(d) => d <= band.value(),
            None => false,
        }
    }

    /// True when any other participant is within `band` of `a`.
    pub fn any_in_range(&self, a: EntityId, band: RangeBand) -> bool {
        let Some(pos) = self.position_of(a) else {
            return false;
        };
        self.positions
            .iter()
            .any(|(&id, &p)| id != a && (p - pos).abs() <= band.value())
    }

    /// Step `mover` one position toward `target`. Returns false when they
    /// already stand together.
    pub fn approach(&mut self, mover: EntityId, target: EntityId) -> bool {
        let (Some(start), Some(end)) = (self.position_of(mover), self.position_of(target))
        else {
            return false;
        };
        if start == end {
            return false;
        }
        let step = if start < end { 1 } else { -1 };
        self.positions.insert(mover, (start + step).clamp(0, MAX_RANGE));
        true
    }

    /// Step `mover` one position away from `target`. Returns false when the
    /// distance is already at MAX_RANGE or the line's end blocks the step.
    pub fn retreat(&mut self, mover: EntityId, target: EntityId) -> bool {
        let (Some(start), Some(end)) = (self.position_of(mover), self.position_of(target))
        else {
            return false;
        };
        if (start - end).abs() >= MAX_RANGE {
            return false;
        }
        let step = if start < end { -1 } else { 1 };
        let next = (start + step).clamp(0, MAX_RANGE);
        if next == start {
            return false;
        }
        self.positions.insert(mover, next);
        true
    }

    /// Grant `to` a one-shot bonus on their next attack against `versus`.
    pub fn grant_attack_bonus(&mut self, to: EntityId, versus: EntityId, amount: i32) {
        self.next_attack_bonus.insert((to, versus), amount);
    }

    /// Consume the one-shot bonus, if any.
    pub fn take_attack_bonus(&mut self, roller: EntityId, versus: EntityId) -> i32 {
        self.next_attack_bonus
            .remove(&(roller, versus))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LocationId;
    use crate::entity::{Fighter, Roster};

    fn arena() -> (Roster, EntityId, EntityId, CombatSession) {
        let mut roster = Roster::new();
        let a = roster.spawn(Fighter::new("ash", LocationId(1)));
        let b = roster.spawn(Fighter::new("bram", LocationId(1)));
        let mut session = CombatSession::new(SessionId::new());
        session
            .add(roster.get_mut(a).unwrap(), 1)
            .unwrap();
        session
            .add(roster.get_mut(b).unwrap(), 1)
            .unwrap();
        (roster, a, b, session)
    }

    #[test]
    fn test_add_sets_back_reference() {
        let (roster, a, b, session) = arena();
        assert_eq!(roster.fighter(a).unwrap().combat(), Some(session.id()));
        assert_eq!(roster.fighter(b).unwrap().combat(), Some(session.id()));
        assert!(session.contains(a) && session.contains(b));
    }

    #[test]
    fn test_double_add_rejected() {
        let (mut roster, a, _, mut session) = arena();
        let err = session.add(roster.get_mut(a).unwrap(), 1);
        assert_eq!(err.unwrap_err(), CombatError::AlreadyInCombat);
    }

    #[test]
    fn test_remove_clears_back_reference_and_ends() {
        let (mut roster, a, b, mut session) = arena();
        session.remove(&mut roster, a);
        assert_eq!(roster.fighter(a).unwrap().combat(), None);
        // one participant left: finished, survivor released too
        assert!(session.finished());
        assert_eq!(roster.fighter(b).unwrap().combat(), None);
        assert!(session.positions().is_empty());
    }

    #[test]
    fn test_remove_leaves_foreign_back_reference_alone() {
        let (mut roster, a, b, mut session) = arena();
        let other = SessionId::new();
        roster.get_mut(a).unwrap().set_combat(Some(other));
        session.remove(&mut roster, a);
        assert_eq!(roster.fighter(a).unwrap().combat(), Some(other));
        let _ = b;
    }

    #[test]
    fn test_end_is_idempotent() {
        let (mut roster, _, _, mut session) = arena();
        session.end(&mut roster);
        assert!(session.positions().is_empty());
        session.end(&mut roster);
        assert!(session.positions().is_empty());
    }

    #[test]
    fn test_range_is_symmetric() {
        let (_, a, b, mut session) = arena();
        session.insert_position(a, 1);
        session.insert_position(b, 4);
        assert_eq!(session.get_range(a, b), session.get_range(b, a));
        assert_eq!(session.get_range(a, b), Some(RangeBand::Short));
    }

    #[test]
    fn test_approach_stops_when_co_located() {
        let (_, a, b, mut session) = arena();
        session.insert_position(a, 3);
        session.insert_position(b, 1);
        assert!(session.approach(a, b));
        assert_eq!(session.position_of(a), Some(2));
        assert!(session.approach(a, b));
        assert_eq!(session.position_of(a), Some(1));
        assert!(!session.approach(a, b));
    }

    #[test]
    fn test_retreat_walks_to_the_line_end() {
        let (_, a, b, mut session) = arena();
        // both open at melee: five steps out, then the clamp stops play
        for expected in 2..=MAX_RANGE {
            assert!(session.retreat(a, b));
            assert_eq!(session.position_of(a), Some(expected));
        }
        assert_eq!(session.distance(a, b), Some(5));
        assert_eq!(session.get_range(a, b), Some(RangeBand::Ranged));
        assert!(!session.retreat(a, b));
        assert!(!session.retreat(a, b));
    }

    #[test]
    fn test_retreat_false_at_max_distance() {
        let (_, a, b, mut session) = arena();
        session.insert_position(a, 0);
        session.insert_position(b, 6);
        assert!(!session.retreat(a, b));
    }

    #[test]
    fn test_any_in_range_excludes_self() {
        let (_, a, b, mut session) = arena();
        session.insert_position(a, 1);
        session.insert_position(b, 6);
        assert!(!session.any_in_range(a, RangeBand::Reach));
        assert!(session.any_in_range(a, RangeBand::Ranged));
    }

    #[test]
    fn test_attack_bonus_is_one_shot() {
        let (_, a, b, mut session) = arena();
        session.grant_attack_bonus(a, b, 2);
        assert_eq!(session.take_attack_bonus(a, b), 2);
        assert_eq!(session.take_attack_bonus(a, b), 0);
    }

    #[test]
    fn test_attack_bonus_is_per_opponent() {
        let (_, a, b, mut session) = arena();
        session.grant_attack_bonus(a, b, 2);
        assert_eq!(session.take_attack_bonus(b, a), 0);
        assert_eq!(session.take_attack_bonus(a, b), 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn approach_never_increases_distance(
                pa in 0..=MAX_RANGE, pb in 0..=MAX_RANGE
            ) {
                let (_, a, b, mut session) = arena();
                session.insert_position(a, pa);
                session.insert_position(b, pb);
                let before = session.distance(a, b).unwrap();
                session.approach(a, b);
                let after = session.distance(a, b).unwrap();
                prop_assert!(after <= before);
            }

            #[test]
            fn retreat_never_decreases_distance(
                pa in 0..=MAX_RANGE, pb in 0..=MAX_RANGE
            ) {
                let (_, a, b, mut session) = arena();
                session.insert_position(a, pa);
                session.insert_position(b, pb);
                let before = session.distance(a, b).unwrap();
                session.retreat(a, b);
                let after = session.distance(a, b).unwrap();
                prop_assert!(after >= before);
            }

            #[test]
            fn positions_stay_on_the_line(
                pa in 0..=MAX_RANGE, pb in 0..=MAX_RANGE, moves in 0usize..20
            ) {
                let (_, a, b, mut session) = arena();
                session.insert_position(a, pa);
                session.insert_position(b, pb);
                for i in 0..moves {
                    if i % 2 == 0 {
                        session.retreat(a, b);
                    } else {
                        session.approach(a, b);
                    }
                    let pos = session.position_of(a).unwrap();
                    prop_assert!((0..=MAX_RANGE).contains(&pos));
                }
            }
        }
    }
}
