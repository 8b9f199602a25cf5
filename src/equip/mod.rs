//! Slot-based equipment
//!
//! Which items occupy which wield locations. Items are moved in and out by
//! value, so an item can never be in two slots at once. A two-handed weapon
//! claims both hands; equipping into either hand while one is held fails.

use serde::{Deserialize, Serialize};

use crate::core::error::EquipError;
use crate::item::{Item, ItemId};

/// Wield (or wear) locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WieldLocation {
    /// Carried, not worn
    Backpack,
    WeaponHand,
    ShieldHand,
    TwoHands,
    /// Body armor
    Body,
    /// Helmets
    Head,
}

impl WieldLocation {
    /// The five wearable slots, in display order. The backpack is storage,
    /// not a wear slot.
    pub const WEAR_SLOTS: [WieldLocation; 5] = [
        WieldLocation::WeaponHand,
        WieldLocation::ShieldHand,
        WieldLocation::TwoHands,
        WieldLocation::Body,
        WieldLocation::Head,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WieldLocation::Backpack => "backpack",
            WieldLocation::WeaponHand => "weapon hand",
            WieldLocation::ShieldHand => "shield hand",
            WieldLocation::TwoHands => "both hands",
            WieldLocation::Body => "body",
            WieldLocation::Head => "head",
        }
    }
}

/// One entity's worn and carried items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentSlots {
    weapon_hand: Option<Item>,
    shield_hand: Option<Item>,
    two_hands: Option<Item>,
    body: Option<Item>,
    head: Option<Item>,
    backpack: Vec<Item>,
}

impl EquipmentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip an item into its declared slot. Hands conflict with a held
    /// two-hander and vice versa; an occupied slot fails.
    pub fn equip(&mut self, item: Item) -> Result<(), EquipError> {
        let slot = item.inventory_use_slot;
        let occupied = |loc: WieldLocation| EquipError::SlotOccupied(loc);
        match slot {
            WieldLocation::Backpack => {
                self.backpack.push(item);
                return Ok(());
            }
            WieldLocation::WeaponHand => {
                if self.two_hands.is_some() {
                    return Err(occupied(WieldLocation::TwoHands));
                }
                if self.weapon_hand.is_some() {
                    return Err(occupied(slot));
                }
                self.weapon_hand = Some(item);
            }
            WieldLocation::ShieldHand => {
                if self.two_hands.is_some() {
                    return Err(occupied(WieldLocation::TwoHands));
                }
                if self.shield_hand.is_some() {
                    return Err(occupied(slot));
                }
                self.shield_hand = Some(item);
            }
            WieldLocation::TwoHands => {
                if self.weapon_hand.is_some() {
                    return Err(occupied(WieldLocation::WeaponHand));
                }
                if self.shield_hand.is_some() {
                    return Err(occupied(WieldLocation::ShieldHand));
                }
                if self.two_hands.is_some() {
                    return Err(occupied(slot));
                }
                self.two_hands = Some(item);
            }
            WieldLocation::Body => {
                if self.body.is_some() {
                    return Err(occupied(slot));
                }
                self.body = Some(item);
            }
            WieldLocation::Head => {
                if self.head.is_some() {
                    return Err(occupied(slot));
                }
                self.head = Some(item);
            }
        }
        Ok(())
    }

    /// Move an equipped item back into the backpack. Returns false if the
    /// item was not worn.
    pub fn unequip(&mut self, id: ItemId) -> bool {
        for slot in WieldLocation::WEAR_SLOTS {
            let held = self.slot_mut(slot);
            if held.as_ref().map(|i| i.id) == Some(id) {
                if let Some(item) = held.take() {
                    self.backpack.push(item);
                }
                return true;
            }
        }
        false
    }

    /// The wielded weapon: a two-hander wins over the weapon hand.
    pub fn weapon(&self) -> Option<&Item> {
        self.two_hands.as_ref().or(self.weapon_hand.as_ref())
    }

    pub fn shield(&self) -> Option<&Item> {
        self.shield_hand.as_ref()
    }

    pub fn armor(&self) -> Option<&Item> {
        self.body.as_ref()
    }

    pub fn helmet(&self) -> Option<&Item> {
        self.head.as_ref()
    }

    pub fn backpack(&self) -> &[Item] {
        &self.backpack
    }

    /// Yield every wear slot with its occupant, empty slots included.
    pub fn iter(&self) -> impl Iterator<Item = (WieldLocation, Option<&Item>)> {
        WieldLocation::WEAR_SLOTS
            .into_iter()
            .map(move |slot| (slot, self.slot(slot)))
    }

    fn slot(&self, slot: WieldLocation) -> Option<&Item> {
        match slot {
            WieldLocation::WeaponHand => self.weapon_hand.as_ref(),
            WieldLocation::ShieldHand => self.shield_hand.as_ref(),
            WieldLocation::TwoHands => self.two_hands.as_ref(),
            WieldLocation::Body => self.body.as_ref(),
            WieldLocation::Head => self.head.as_ref(),
            WieldLocation::Backpack => None,
        }
    }

    fn slot_mut(&mut self, slot: WieldLocation) -> &mut Option<Item> {
        match slot {
            WieldLocation::WeaponHand => &mut self.weapon_hand,
            WieldLocation::ShieldHand => &mut self.shield_hand,
            WieldLocation::TwoHands => &mut self.two_hands,
            WieldLocation::Body => &mut self.body,
            WieldLocation::Head => &mut self.head,
            WieldLocation::Backpack => unreachable!("backpack is not a wear slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equip_routes_by_declared_slot() {
        let mut equip = EquipmentSlots::new();
        equip.equip(Item::sword()).unwrap();
        equip.equip(Item::shield()).unwrap();
        equip.equip(Item::leather_armor()).unwrap();
        equip.equip(Item::helmet()).unwrap();
        assert_eq!(equip.weapon().unwrap().name, "sword");
        assert_eq!(equip.shield().unwrap().name, "shield");
        assert_eq!(equip.armor().unwrap().name, "leather armor");
        assert_eq!(equip.helmet().unwrap().name, "helmet");
    }

    #[test]
    fn test_two_hander_blocks_both_hands() {
        let mut equip = EquipmentSlots::new();
        equip.equip(Item::spear()).unwrap();
        assert_eq!(
            equip.equip(Item::sword()).unwrap_err(),
            EquipError::SlotOccupied(WieldLocation::TwoHands)
        );
        assert_eq!(
            equip.equip(Item::shield()).unwrap_err(),
            EquipError::SlotOccupied(WieldLocation::TwoHands)
        );
    }

    #[test]
    fn test_held_hand_blocks_two_hander() {
        let mut equip = EquipmentSlots::new();
        equip.equip(Item::shield()).unwrap();
        assert_eq!(
            equip.equip(Item::spear()).unwrap_err(),
            EquipError::SlotOccupied(WieldLocation::ShieldHand)
        );
    }

    #[test]
    fn test_occupied_slot_rejected() {
        let mut equip = EquipmentSlots::new();
        equip.equip(Item::sword()).unwrap();
        assert_eq!(
            equip.equip(Item::dagger()).unwrap_err(),
            EquipError::SlotOccupied(WieldLocation::WeaponHand)
        );
    }

    #[test]
    fn test_unequip_returns_item_to_backpack() {
        let mut equip = EquipmentSlots::new();
        let sword = Item::sword();
        let id = sword.id;
        equip.equip(sword).unwrap();
        assert!(equip.unequip(id));
        assert!(equip.weapon().is_none());
        assert_eq!(equip.backpack().len(), 1);
        // a second unequip finds nothing
        assert!(!equip.unequip(id));
    }

    #[test]
    fn test_two_hander_wins_weapon_accessor() {
        let mut equip = EquipmentSlots::new();
        equip.equip(Item::spear()).unwrap();
        assert_eq!(equip.weapon().unwrap().name, "spear");
    }

    #[test]
    fn test_iteration_includes_empty_slots() {
        let mut equip = EquipmentSlots::new();
        equip.equip(Item::sword()).unwrap();
        let slots: Vec<_> = equip.iter().collect();
        assert_eq!(slots.len(), WieldLocation::WEAR_SLOTS.len());
        let empties = slots.iter().filter(|(_, item)| item.is_none()).count();
        assert_eq!(empties, 4);
    }
}
