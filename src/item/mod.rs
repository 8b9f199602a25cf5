//! Item read-model for combat
//!
//! Items live on the host's side of the boundary; combat reads a fixed set
//! of fields from them. Preset constructors cover the common arsenal so the
//! demo world and the tests have something to swing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::combat::range::RangeBand;
use crate::equip::WieldLocation;

/// How an item deals damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackType {
    Melee,
    Ranged,
    Thrown,
    Magic,
}

/// Hit-location placeholder for strike-zone rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyZone {
    Head,
    Torso,
    Legs,
}

/// Unique identifier for items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// The slice of an item combat cares about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub attack_type: AttackType,
    pub attack_range: RangeBand,
    pub min_damage: i32,
    pub max_damage: i32,
    pub stamina_cost: i32,
    pub cooldown_secs: u32,
    pub can_parry: bool,
    /// Mitigation contributed while worn (armor, helmets, shields)
    pub armor: i32,
    /// Where this item sits when equipped
    pub inventory_use_slot: WieldLocation,
}

impl Item {
    fn weapon(name: &str, attack_type: AttackType, attack_range: RangeBand) -> Self {
        Self {
            id: ItemId::new(),
            name: name.to_string(),
            attack_type,
            attack_range,
            min_damage: 1,
            max_damage: 4,
            stamina_cost: 2,
            cooldown_secs: 2,
            can_parry: false,
            armor: 0,
            inventory_use_slot: WieldLocation::WeaponHand,
        }
    }

    /// Common weapon: sword. Parries.
    pub fn sword() -> Self {
        Self {
            max_damage: 6,
            stamina_cost: 3,
            can_parry: true,
            ..Self::weapon("sword", AttackType::Melee, RangeBand::Melee)
        }
    }

    /// Common weapon: dagger. Light, quick, throwable in a pinch.
    pub fn dagger() -> Self {
        Self {
            max_damage: 3,
            cooldown_secs: 1,
            can_parry: true,
            ..Self::weapon("dagger", AttackType::Melee, RangeBand::Melee)
        }
    }

    /// Common weapon: spear. Strikes from the reach band, two hands.
    pub fn spear() -> Self {
        Self {
            max_damage: 5,
            stamina_cost: 3,
            inventory_use_slot: WieldLocation::TwoHands,
            ..Self::weapon("spear", AttackType::Melee, RangeBand::Reach)
        }
    }

    /// Common weapon: shortbow. Two hands, long flight, slow to draw.
    pub fn shortbow() -> Self {
        Self {
            max_damage: 5,
            stamina_cost: 2,
            cooldown_secs: 3,
            inventory_use_slot: WieldLocation::TwoHands,
            ..Self::weapon("shortbow", AttackType::Ranged, RangeBand::Ranged)
        }
    }

    /// Common weapon: javelin. Thrown out to the medium band.
    pub fn javelin() -> Self {
        Self {
            max_damage: 5,
            stamina_cost: 3,
            cooldown_secs: 3,
            ..Self::weapon("javelin", AttackType::Thrown, RangeBand::Medium)
        }
    }

    /// Shield: blocks, adds a point of mitigation.
    pub fn shield() -> Self {
        Self {
            id: ItemId::new(),
            name: "shield".to_string(),
            attack_type: AttackType::Melee,
            attack_range: RangeBand::Melee,
            min_damage: 0,
            max_damage: 0,
            stamina_cost: 0,
            cooldown_secs: 0,
            can_parry: false,
            armor: 1,
            inventory_use_slot: WieldLocation::ShieldHand,
        }
    }

    /// Leather armor for the body.
    pub fn leather_armor() -> Self {
        Self {
            armor: 2,
            inventory_use_slot: WieldLocation::Body,
            ..Self::shield()
        }
        .named("leather armor")
    }

    /// A plain helmet.
    pub fn helmet() -> Self {
        Self {
            armor: 1,
            inventory_use_slot: WieldLocation::Head,
            ..Self::shield()
        }
        .named("helmet")
    }

    fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

/// Flattened view of "what is swinging" for one attack. Derived from the
/// wielded weapon, or from one of the bare-handed fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackProfile {
    pub name: String,
    pub attack_type: AttackType,
    pub reach: RangeBand,
    pub min_damage: i32,
    pub max_damage: i32,
    pub stamina_cost: i32,
    pub cooldown_secs: u32,
}

impl AttackProfile {
    /// Implicit fists for weaponless melee.
    pub fn fists() -> Self {
        Self {
            name: "fists".to_string(),
            attack_type: AttackType::Melee,
            reach: RangeBand::Melee,
            min_damage: 1,
            max_damage: 2,
            stamina_cost: 2,
            cooldown_secs: 2,
        }
    }

    /// Fallback when hurling something not made for it.
    pub fn improvised_thrown() -> Self {
        Self {
            name: "improvised missile".to_string(),
            attack_type: AttackType::Thrown,
            reach: RangeBand::Short,
            min_damage: 1,
            max_damage: 2,
            stamina_cost: 4,
            cooldown_secs: 4,
        }
    }

    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            attack_type: item.attack_type,
            reach: item.attack_range,
            min_damage: item.min_damage,
            max_damage: item.max_damage,
            stamina_cost: item.stamina_cost,
            cooldown_secs: item.cooldown_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sword_is_a_parrying_melee_weapon() {
        let sword = Item::sword();
        assert_eq!(sword.attack_type, AttackType::Melee);
        assert!(sword.can_parry);
        assert_eq!(sword.inventory_use_slot, WieldLocation::WeaponHand);
    }

    #[test]
    fn test_spear_needs_both_hands() {
        assert_eq!(Item::spear().inventory_use_slot, WieldLocation::TwoHands);
    }

    #[test]
    fn test_fists_fallback_stats() {
        let fists = AttackProfile::fists();
        assert_eq!(
            (fists.min_damage, fists.max_damage, fists.stamina_cost, fists.cooldown_secs),
            (1, 2, 2, 2)
        );
    }

    #[test]
    fn test_improvised_thrown_fallback_stats() {
        let fallback = AttackProfile::improvised_thrown();
        assert_eq!(
            (
                fallback.min_damage,
                fallback.max_damage,
                fallback.stamina_cost,
                fallback.cooldown_secs
            ),
            (1, 2, 4, 4)
        );
    }

    #[test]
    fn test_profile_from_item_copies_stats() {
        let javelin = Item::javelin();
        let profile = AttackProfile::from_item(&javelin);
        assert_eq!(profile.attack_type, AttackType::Thrown);
        assert_eq!(profile.reach, RangeBand::Medium);
        assert_eq!(profile.max_damage, javelin.max_damage);
    }
}
