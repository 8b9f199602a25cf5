//! Reference entity store
//!
//! An id-keyed registry of `Fighter`s standing in for the game server: room
//! broadcast, PvP flags and a toy exit table. Deterministic by default: the
//! exit picker runs on a seeded stream.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::{EntityId, LocationId};

use super::{Combatant, EntityStore, Fighter};

/// All fighters the demo world knows about
pub struct Roster {
    fighters: AHashMap<EntityId, Fighter>,
    pvp: AHashMap<LocationId, bool>,
    exits: AHashMap<LocationId, Vec<LocationId>>,
    rng: ChaCha8Rng,
}

impl Roster {
    pub fn new() -> Self {
        Self::seeded(0)
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            fighters: AHashMap::new(),
            pvp: AHashMap::new(),
            exits: AHashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Register a fighter, returning its id.
    pub fn spawn(&mut self, fighter: Fighter) -> EntityId {
        let id = fighter.id();
        self.fighters.insert(id, fighter);
        id
    }

    pub fn fighter(&self, id: EntityId) -> Option<&Fighter> {
        self.fighters.get(&id)
    }

    pub fn fighter_mut(&mut self, id: EntityId) -> Option<&mut Fighter> {
        self.fighters.get_mut(&id)
    }

    /// Flip the room's PvP flag. Rooms default to PvP-forbidden.
    pub fn allow_pvp(&mut self, location: LocationId, allowed: bool) {
        self.pvp.insert(location, allowed);
    }

    /// Wire a one-way exit between rooms.
    pub fn add_exit(&mut self, from: LocationId, to: LocationId) {
        self.exits.entry(from).or_default().push(to);
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for Roster {
    fn get(&self, id: EntityId) -> Option<&dyn Combatant> {
        self.fighters.get(&id).map(|f| f as &dyn Combatant)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn Combatant> {
        self.fighters.get_mut(&id).map(|f| f as &mut dyn Combatant)
    }

    fn broadcast(&mut self, location: LocationId, msg: &str, exclude: &[EntityId]) {
        for fighter in self.fighters.values_mut() {
            if fighter.location() == location && !exclude.contains(&fighter.id()) {
                fighter.send(msg);
            }
        }
    }

    fn pvp_allowed(&self, location: LocationId) -> bool {
        self.pvp.get(&location).copied().unwrap_or(false)
    }

    fn traverse_random_exit(&mut self, entity: EntityId) -> bool {
        let Some(here) = self.fighters.get(&entity).map(|f| f.location()) else {
            return false;
        };
        let Some(&destination) = self
            .exits
            .get(&here)
            .and_then(|exits| exits.choose(&mut self.rng))
        else {
            return false;
        };
        if let Some(fighter) = self.fighters.get_mut(&entity) {
            fighter.set_location(destination);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_scopes_to_location_and_excludes() {
        let mut roster = Roster::new();
        let a = roster.spawn(Fighter::new("ash", LocationId(1)));
        let b = roster.spawn(Fighter::new("bram", LocationId(1)));
        let far = roster.spawn(Fighter::new("wren", LocationId(2)));

        roster.broadcast(LocationId(1), "steel rings", &[a]);
        assert!(roster.fighter(a).unwrap().outbox().is_empty());
        assert_eq!(roster.fighter(b).unwrap().outbox().len(), 1);
        assert!(roster.fighter(far).unwrap().outbox().is_empty());
    }

    #[test]
    fn test_pvp_defaults_to_forbidden() {
        let mut roster = Roster::new();
        assert!(!roster.pvp_allowed(LocationId(1)));
        roster.allow_pvp(LocationId(1), true);
        assert!(roster.pvp_allowed(LocationId(1)));
    }

    #[test]
    fn test_traverse_needs_an_exit() {
        let mut roster = Roster::new();
        let a = roster.spawn(Fighter::new("ash", LocationId(1)));
        assert!(!roster.traverse_random_exit(a));
        roster.add_exit(LocationId(1), LocationId(2));
        assert!(roster.traverse_random_exit(a));
        assert_eq!(roster.fighter(a).unwrap().location(), LocationId(2));
    }
}
