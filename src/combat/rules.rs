//! Combat rules: the stateless policy layer
//!
//! Every formula lives here (validation order, stamina costs, roll math,
//! static defenses) so the combat "feel" can be swapped without touching
//! session state. Ties go to the attacker; the engine resolves
//! `attack >= defense` as a hit.

use crate::combat::dice::Dice;
use crate::combat::range::RangeBand;
use crate::combat::session::CombatSession;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::SessionId;
use crate::entity::{trait_keys, Aggression, Combatant};
use crate::item::{AttackProfile, AttackType, BodyZone};

/// Cooldown key gating attacks
pub const ATTACK_COOLDOWN: &str = "attack";
/// Cooldown key gating advance/retreat
pub const MOVE_COOLDOWN: &str = "combat_move";

/// Stateless policy. Holds only configuration; all state stays in the
/// session and on the entities.
#[derive(Debug, Clone, Default)]
pub struct CombatRules {
    config: CombatConfig,
}

impl CombatRules {
    pub fn new(config: CombatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Check that attacker and target share a live session.
    pub fn validate_session(
        &self,
        attacker: &dyn Combatant,
        target: &dyn Combatant,
    ) -> Result<SessionId> {
        let mine = attacker.combat().ok_or(CombatError::NotInCombat)?;
        let theirs = target.combat().ok_or(CombatError::DifferentSession)?;
        if mine != theirs {
            return Err(CombatError::DifferentSession);
        }
        Ok(mine)
    }

    /// Preconditions for a swing, in order: target attackable, PvP policy,
    /// attack cooldown, stamina, weapon reach. No state changes here.
    pub fn validate_attack(
        &self,
        attacker: &dyn Combatant,
        target: &dyn Combatant,
        profile: &AttackProfile,
        stamina_cost: i32,
        distance: i32,
        pvp_allowed: bool,
    ) -> Result<()> {
        if !target.attackable() {
            return Err(CombatError::InvalidTarget);
        }
        if target.is_player() && !pvp_allowed {
            return Err(CombatError::PvpForbidden);
        }
        if !attacker.cooldowns().ready(ATTACK_COOLDOWN) {
            return Err(CombatError::OnCooldown {
                remaining: attacker.cooldowns().time_left_secs(ATTACK_COOLDOWN),
            });
        }
        if attacker.stamina() < stamina_cost {
            return Err(CombatError::Exhausted {
                needed: stamina_cost,
                available: attacker.stamina(),
            });
        }
        if distance > profile.reach.value() {
            return Err(CombatError::OutOfRange {
                reach: profile.reach,
            });
        }
        Ok(())
    }

    /// Stamina a swing costs after the stance modifier: aggressive rounds
    /// 1.5x up, defensive halves down.
    pub fn attack_stamina_cost(&self, aggression: Aggression, base_cost: i32) -> i32 {
        match aggression {
            Aggression::Aggressive => (base_cost * 3 + 1) / 2,
            Aggression::Neutral => base_cost,
            Aggression::Defensive => base_cost / 2,
        }
    }

    /// Stamina a block or parry costs the defender. Flat for now; the
    /// signature keeps attack type and defender in view for later policy.
    pub fn defense_stamina_cost(
        &self,
        _attack_type: AttackType,
        _defender: &dyn Combatant,
    ) -> i32 {
        self.config.defense_stamina_cost
    }

    /// 2d6 + stat + stance bias + any one-shot bonus against this opponent.
    /// The stance bias inverts when dodging: pressing the attack leaves you
    /// easier to catch.
    pub fn roll(
        &self,
        dice: &mut dyn Dice,
        roller: &dyn Combatant,
        stat: &str,
        is_dodge: bool,
        versus_bonus: i32,
    ) -> i32 {
        let bias = if is_dodge {
            -roller.aggression().attack_bias()
        } else {
            roller.aggression().attack_bias()
        };
        dice.die(6) + dice.die(6) + roller.stat(stat) + bias + versus_bonus
    }

    /// Static defense against missiles: base, adjusted for target size and
    /// for shots beyond the SHORT band.
    pub fn static_defense(&self, target: &dyn Combatant, distance: i32) -> i32 {
        let range_penalty = if distance <= RangeBand::Short.value() {
            0
        } else {
            self.config.long_range_penalty
        };
        self.config.ranged_base_defense + target.size().defense_bonus() + range_penalty
    }

    /// Hit-roll stat for an attack type.
    pub fn attack_stat(&self, attack_type: AttackType) -> &'static str {
        match attack_type {
            AttackType::Melee => trait_keys::STRENGTH,
            AttackType::Ranged | AttackType::Thrown => trait_keys::CUNNING,
            AttackType::Magic => trait_keys::WILL,
        }
    }

    /// Damage stat for an attack type: thrown weapons ride on cunning.
    pub fn damage_stat(&self, attack_type: AttackType) -> &'static str {
        match attack_type {
            AttackType::Thrown => trait_keys::CUNNING,
            AttackType::Magic => trait_keys::WILL,
            _ => trait_keys::STRENGTH,
        }
    }

    /// Stance scaling on raw damage: defensive `⌊raw/2⌋`, aggressive
    /// `⌊raw*1.5⌋`.
    pub fn scale_damage(&self, aggression: Aggression, raw: i32) -> i32 {
        match aggression {
            Aggression::Aggressive => raw * 3 / 2,
            Aggression::Neutral => raw,
            Aggression::Defensive => raw / 2,
        }
    }

    /// Pure function of the positions table.
    pub fn is_combat_finished(&self, session: &CombatSession) -> bool {
        session.positions().len() <= 1
    }

    /// Where a new participant stands. Everyone opens at MELEE for now; the
    /// contract is only that the result lies in `[1, MAX_RANGE]`.
    pub fn get_initial_position(&self, _entity: &dyn Combatant) -> i32 {
        RangeBand::Melee.value()
    }

    /// Does a strike aimed at one zone land against a defense of another?
    /// Equality for now; reserved for hit-location rules.
    pub fn strike_zone(&self, attack: BodyZone, defense: BodyZone) -> bool {
        attack == defense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::FixedDice;
    use crate::entity::{Fighter, Size};
    use crate::core::types::LocationId;

    fn fighter(name: &str) -> Fighter {
        Fighter::new(name, LocationId(1))
    }

    #[test]
    fn test_attack_cost_rounds_against_the_attacker() {
        let rules = CombatRules::default();
        assert_eq!(rules.attack_stamina_cost(Aggression::Aggressive, 2), 3);
        assert_eq!(rules.attack_stamina_cost(Aggression::Aggressive, 3), 5);
        assert_eq!(rules.attack_stamina_cost(Aggression::Neutral, 3), 3);
        assert_eq!(rules.attack_stamina_cost(Aggression::Defensive, 3), 1);
        assert_eq!(rules.attack_stamina_cost(Aggression::Defensive, 2), 1);
    }

    #[test]
    fn test_roll_adds_stat_and_bias() {
        let rules = CombatRules::default();
        let mut who = fighter("brand");
        who.set_stat(trait_keys::STRENGTH, 3);
        who.set_aggression(Aggression::Aggressive);

        let mut dice = FixedDice::new([2, 3]);
        let roll = rules.roll(&mut dice, &who, trait_keys::STRENGTH, false, 0);
        assert_eq!(roll, 2 + 3 + 3 + 1);
    }

    #[test]
    fn test_dodge_inverts_stance_bias() {
        let rules = CombatRules::default();
        let mut who = fighter("brand");
        who.set_aggression(Aggression::Aggressive);

        let mut dice = FixedDice::new([3, 3]);
        let dodge = rules.roll(&mut dice, &who, trait_keys::CUNNING, true, 0);
        assert_eq!(dodge, 3 + 3 + 0 - 1);
    }

    #[test]
    fn test_versus_bonus_lands_on_the_roll() {
        let rules = CombatRules::default();
        let who = fighter("brand");
        let mut dice = FixedDice::new([1, 1]);
        assert_eq!(rules.roll(&mut dice, &who, trait_keys::STRENGTH, false, 2), 4);
    }

    #[test]
    fn test_static_defense_range_penalty() {
        let rules = CombatRules::default();
        let who = fighter("tally");
        assert_eq!(rules.static_defense(&who, RangeBand::Short.value()), 5);
        assert_eq!(rules.static_defense(&who, RangeBand::Short.value() + 1), 7);
    }

    #[test]
    fn test_static_defense_size_adjustment() {
        let rules = CombatRules::default();
        let mut small = fighter("wisp");
        small.set_size(Size::Small);
        let mut large = fighter("hulk");
        large.set_size(Size::Large);
        assert_eq!(rules.static_defense(&small, 1), 6);
        assert_eq!(rules.static_defense(&large, 1), 4);
    }

    #[test]
    fn test_damage_scaling_floors() {
        let rules = CombatRules::default();
        assert_eq!(rules.scale_damage(Aggression::Defensive, 5), 2);
        assert_eq!(rules.scale_damage(Aggression::Aggressive, 5), 7);
        assert_eq!(rules.scale_damage(Aggression::Neutral, 5), 5);
    }

    #[test]
    fn test_strike_zone_placeholder_is_equality() {
        let rules = CombatRules::default();
        assert!(rules.strike_zone(BodyZone::Torso, BodyZone::Torso));
        assert!(!rules.strike_zone(BodyZone::Head, BodyZone::Legs));
    }

    #[test]
    fn test_initial_position_in_contract_range() {
        let rules = CombatRules::default();
        let who = fighter("brand");
        let pos = rules.get_initial_position(&who);
        assert!((1..=crate::combat::range::MAX_RANGE).contains(&pos));
    }
}
