//! Entity capability seams
//!
//! The game server owns its characters; combat only needs a narrow view of
//! them. `Combatant` is that view: identity, stats, equipment, cooldowns,
//! messaging and the damage hook. `EntityStore` is the host-side lookup the
//! engine uses to reach participants it was not handed directly (merges,
//! session endings, room broadcasts).

pub mod fighter;
pub mod roster;

pub use fighter::Fighter;
pub use roster::Roster;

use serde::{Deserialize, Serialize};

use crate::cooldowns::Cooldowns;
use crate::core::types::{EntityId, LocationId, SessionId};
use crate::equip::EquipmentSlots;
use crate::traits::TraitContainer;

/// Well-known trait container keys
pub mod trait_keys {
    pub const STRENGTH: &str = "STRENGTH";
    pub const CUNNING: &str = "CUNNING";
    pub const WILL: &str = "WILL";
    pub const HEALTH: &str = "HEALTH";
    pub const STAMINA: &str = "STAMINA";
}

/// Combat stance. Read from the entity; how it gets set is the host's
/// business (a `stance` command, AI, morale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Aggression {
    /// Bigger swings, worse dodges, 1.5x stamina costs
    Aggressive,
    #[default]
    Neutral,
    /// Smaller swings, better dodges, half stamina costs
    Defensive,
}

impl Aggression {
    /// Roll bias when attacking; inverted when dodging.
    pub fn attack_bias(self) -> i32 {
        match self {
            Aggression::Aggressive => 1,
            Aggression::Neutral => 0,
            Aggression::Defensive => -1,
        }
    }
}

/// Body size category, used by static ranged defense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

impl Size {
    /// Defense adjustment: small targets are harder to hit, large ones
    /// easier.
    pub fn defense_bonus(self) -> i32 {
        match self {
            Size::Small => 1,
            Size::Medium => 0,
            Size::Large => -1,
        }
    }
}

/// The entity capability combat consumes
pub trait Combatant {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
    fn location(&self) -> LocationId;
    fn is_player(&self) -> bool;

    /// Can this entity be attacked at all right now?
    fn attackable(&self) -> bool;

    fn size(&self) -> Size {
        Size::Medium
    }

    fn aggression(&self) -> Aggression {
        Aggression::Neutral
    }

    fn traits(&self) -> &TraitContainer;
    fn traits_mut(&mut self) -> &mut TraitContainer;

    fn equipment(&self) -> &EquipmentSlots;
    fn equipment_mut(&mut self) -> &mut EquipmentSlots;

    fn cooldowns(&self) -> &Cooldowns;
    fn cooldowns_mut(&mut self) -> &mut Cooldowns;

    /// Non-owning handle to the current combat session. Readers must
    /// tolerate a transiently stale handle and treat it as "not in combat".
    fn combat(&self) -> Option<SessionId>;
    fn set_combat(&mut self, session: Option<SessionId>);

    /// Deliver a narrated line to this entity.
    fn send(&mut self, msg: &str);

    /// Apply damage that survived mitigation. Death handling (and any
    /// resulting removal from combat) is the entity's own responsibility.
    fn at_damage(&mut self, amount: i32, attacker: EntityId);

    // Derived helpers over the trait block

    /// Read a stat's actual value; missing traits read as zero.
    fn stat(&self, key: &str) -> i32 {
        self.traits().get(key).map(|t| t.actual()).unwrap_or(0)
    }

    fn stamina(&self) -> i32 {
        self.stat(trait_keys::STAMINA)
    }

    /// Burn stamina, clamped at the gauge floor.
    fn spend_stamina(&mut self, amount: i32) {
        if let Some(stamina) = self.traits_mut().get_mut(trait_keys::STAMINA) {
            stamina.set_current(stamina.current() - amount);
        }
    }

    /// Total mitigation from worn gear: body, head and shield.
    fn armor_total(&self) -> i32 {
        let equipment = self.equipment();
        [equipment.armor(), equipment.helmet(), equipment.shield()]
            .into_iter()
            .flatten()
            .map(|item| item.armor)
            .sum()
    }
}

/// Host-side lookup and room services for the engine
pub trait EntityStore {
    fn get(&self, id: EntityId) -> Option<&dyn Combatant>;
    fn get_mut(&mut self, id: EntityId) -> Option<&mut dyn Combatant>;

    /// Deliver a narrated line to everyone at `location` except `exclude`.
    fn broadcast(&mut self, location: LocationId, msg: &str, exclude: &[EntityId]);

    /// Read-only room capability: may players fight players here?
    fn pvp_allowed(&self, location: LocationId) -> bool;

    /// Move the entity through a random exit of its location. Returns false
    /// when there is nowhere to run.
    fn traverse_random_exit(&mut self, entity: EntityId) -> bool;
}
