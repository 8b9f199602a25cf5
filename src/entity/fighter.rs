//! Reference combatant
//!
//! A self-contained `Combatant` used by the demo binary and the test suite.
//! Real game servers implement the capability on their own character types;
//! nothing in `combat::` depends on `Fighter`.

use crate::cooldowns::Cooldowns;
use crate::core::types::{EntityId, LocationId, SessionId};
use crate::equip::EquipmentSlots;
use crate::traits::{Trait, TraitContainer, TraitKind};

use super::{trait_keys, Aggression, Combatant, Size};

/// A minimal fighting character with an outbox for received narration
#[derive(Debug, Clone)]
pub struct Fighter {
    id: EntityId,
    name: String,
    location: LocationId,
    is_player: bool,
    size: Size,
    aggression: Aggression,
    traits: TraitContainer,
    equipment: EquipmentSlots,
    cooldowns: Cooldowns,
    combat: Option<SessionId>,
    alive: bool,
    outbox: Vec<String>,
}

impl Fighter {
    /// A fresh NPC fighter: ability scores of 1, ten points each of health
    /// and stamina, bare hands.
    pub fn new(name: &str, location: LocationId) -> Self {
        let mut traits = TraitContainer::new();
        for key in [trait_keys::STRENGTH, trait_keys::CUNNING, trait_keys::WILL] {
            let _ = traits.add(key, Trait::new(TraitKind::Static, 1));
        }
        let _ = traits.add(trait_keys::HEALTH, Trait::new(TraitKind::Gauge, 10));
        let _ = traits.add(trait_keys::STAMINA, Trait::new(TraitKind::Gauge, 10));
        Self {
            id: EntityId::new(),
            name: name.to_string(),
            location,
            is_player: false,
            size: Size::Medium,
            aggression: Aggression::Neutral,
            traits,
            equipment: EquipmentSlots::new(),
            cooldowns: Cooldowns::new(),
            combat: None,
            alive: true,
            outbox: Vec::new(),
        }
    }

    /// Same, flagged as a player character for PvP policy.
    pub fn player(name: &str, location: LocationId) -> Self {
        let mut fighter = Self::new(name, location);
        fighter.is_player = true;
        fighter
    }

    /// Upsert a static ability score.
    pub fn set_stat(&mut self, key: &str, value: i32) {
        match self.traits.get_mut(key) {
            Some(t) => t.set_base(value),
            None => {
                let _ = self.traits.add(key, Trait::new(TraitKind::Static, value));
            }
        }
    }

    /// Upsert a gauge at full with the given capacity.
    pub fn set_gauge(&mut self, key: &str, capacity: i32) {
        self.traits.remove(key);
        let _ = self.traits.add(key, Trait::new(TraitKind::Gauge, capacity));
    }

    pub fn set_aggression(&mut self, aggression: Aggression) {
        self.aggression = aggression;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_location(&mut self, location: LocationId) {
        self.location = location;
    }

    /// Empty the stamina gauge (exhaustion fixtures).
    pub fn drain_stamina(&mut self) {
        if let Some(stamina) = self.traits.get_mut(trait_keys::STAMINA) {
            stamina.set_current(0);
        }
    }

    pub fn hp(&self) -> i32 {
        self.stat(trait_keys::HEALTH)
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Narration delivered to this fighter, oldest first.
    pub fn outbox(&self) -> &[String] {
        &self.outbox
    }

    pub fn clear_outbox(&mut self) {
        self.outbox.clear();
    }
}

impl Combatant for Fighter {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> LocationId {
        self.location
    }

    fn is_player(&self) -> bool {
        self.is_player
    }

    fn attackable(&self) -> bool {
        self.alive
    }

    fn size(&self) -> Size {
        self.size
    }

    fn aggression(&self) -> Aggression {
        self.aggression
    }

    fn traits(&self) -> &TraitContainer {
        &self.traits
    }

    fn traits_mut(&mut self) -> &mut TraitContainer {
        &mut self.traits
    }

    fn equipment(&self) -> &EquipmentSlots {
        &self.equipment
    }

    fn equipment_mut(&mut self) -> &mut EquipmentSlots {
        &mut self.equipment
    }

    fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    fn cooldowns_mut(&mut self) -> &mut Cooldowns {
        &mut self.cooldowns
    }

    fn combat(&self) -> Option<SessionId> {
        self.combat
    }

    fn set_combat(&mut self, session: Option<SessionId>) {
        self.combat = session;
    }

    fn send(&mut self, msg: &str) {
        self.outbox.push(msg.to_string());
    }

    fn at_damage(&mut self, amount: i32, _attacker: EntityId) {
        if let Some(health) = self.traits.get_mut(trait_keys::HEALTH) {
            health.set_current(health.current() - amount);
            if health.actual() <= 0 {
                self.alive = false;
                self.outbox.push("You collapse!".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_fighter_baseline() {
        let fighter = Fighter::new("ash", LocationId(1));
        assert_eq!(fighter.hp(), 10);
        assert_eq!(fighter.stamina(), 10);
        assert_eq!(fighter.stat(trait_keys::STRENGTH), 1);
        assert!(fighter.alive());
        assert!(!fighter.is_player());
    }

    #[test]
    fn test_damage_hook_clamps_and_kills() {
        let mut fighter = Fighter::new("ash", LocationId(1));
        fighter.at_damage(4, EntityId::new());
        assert_eq!(fighter.hp(), 6);
        fighter.at_damage(100, EntityId::new());
        assert_eq!(fighter.hp(), 0);
        assert!(!fighter.alive());
        assert!(!fighter.attackable());
    }

    #[test]
    fn test_armor_total_sums_worn_gear() {
        use crate::item::Item;
        let mut fighter = Fighter::new("ash", LocationId(1));
        assert_eq!(fighter.armor_total(), 0);
        fighter.equipment_mut().equip(Item::leather_armor()).unwrap();
        fighter.equipment_mut().equip(Item::helmet()).unwrap();
        fighter.equipment_mut().equip(Item::shield()).unwrap();
        assert_eq!(fighter.armor_total(), 4);
    }

    #[test]
    fn test_spend_stamina_clamps_at_floor() {
        let mut fighter = Fighter::new("ash", LocationId(1));
        fighter.spend_stamina(7);
        assert_eq!(fighter.stamina(), 3);
        fighter.spend_stamina(7);
        assert_eq!(fighter.stamina(), 0);
    }
}
