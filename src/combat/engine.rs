//! Combat engine: session table and the action pipeline
//!
//! The engine owns every live session and resolves the combat verbs:
//! attacks, advance/retreat, flee. Each attack runs the staged pipeline:
//! validate, commit stamina and cooldown, block/parry, opposed rolls, damage,
//! armor, apply. Validation failures cost nothing and produce only a private
//! message; once validation passes, pipeline stages run as one logical unit.

use ahash::AHashMap;

use crate::combat::dice::{Dice, RngDice};
use crate::combat::narrate;
use crate::combat::range::RangeBand;
use crate::combat::rules::{CombatRules, ATTACK_COOLDOWN, MOVE_COOLDOWN};
use crate::combat::session::CombatSession;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{EntityId, SessionId};
use crate::entity::{trait_keys, Combatant, EntityStore};
use crate::item::{AttackProfile, AttackType};

/// How one attack resolved. Narration is already delivered when this is
/// returned; the value is for hosts and tests that want structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// A precondition failed; nothing changed
    Invalid(CombatError),
    /// A shield caught the blow
    Blocked,
    /// A parrying weapon turned the blow
    Parried,
    /// The swing went wide
    Miss { attack: i32, defense: i32 },
    /// Armor soaked the whole hit
    Absorbed { raw: i32 },
    /// Damage went through
    Hit { damage: i32 },
}

/// The session table plus injected policy and dice
pub struct Combats {
    sessions: AHashMap<SessionId, CombatSession>,
    rules: CombatRules,
    dice: Box<dyn Dice>,
}

impl Combats {
    pub fn new(config: CombatConfig, dice: Box<dyn Dice>) -> Self {
        Self {
            sessions: AHashMap::new(),
            rules: CombatRules::new(config),
            dice,
        }
    }

    /// Default config over a seeded dice stream.
    pub fn seeded(seed: u64) -> Self {
        Self::new(CombatConfig::default(), Box::new(RngDice::seeded(seed)))
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn session(&self, id: SessionId) -> Option<&CombatSession> {
        self.sessions.get(&id)
    }

    /// Resolve an entity's back-reference to a live session. A stale handle
    /// reads as "not in combat".
    pub fn session_for(&self, entity: &dyn Combatant) -> Option<&CombatSession> {
        entity.combat().and_then(|sid| self.sessions.get(&sid))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Find or build the session binding `a` and `b`: reuse either side's
    /// session, merge when they differ, create fresh when neither fights.
    pub fn get_or_create(
        &mut self,
        world: &mut dyn EntityStore,
        a: EntityId,
        b: EntityId,
    ) -> Result<SessionId> {
        let sa = self.live_session(world, a)?;
        let sb = self.live_session(world, b)?;
        match (sa, sb) {
            (Some(x), Some(y)) if x == y => Ok(x),
            (Some(x), Some(y)) => Ok(self.merge(world, x, y)),
            (Some(s), None) => {
                self.join(world, s, b)?;
                Ok(s)
            }
            (None, Some(s)) => {
                self.join(world, s, a)?;
                Ok(s)
            }
            (None, None) => {
                let sid = SessionId::new();
                self.sessions.insert(sid, CombatSession::new(sid));
                self.join(world, sid, a)?;
                self.join(world, sid, b)?;
                tracing::debug!(session = ?sid, "combat session created");
                Ok(sid)
            }
        }
    }

    /// Remove an entity from its session, ending the session if it empties.
    /// Hosts call this when a participant dies or disconnects.
    pub fn leave(&mut self, world: &mut dyn EntityStore, entity: EntityId) {
        let Some(sid) = world.get(entity).and_then(|e| e.combat()) else {
            return;
        };
        if let Some(session) = self.sessions.get_mut(&sid) {
            session.remove(world, entity);
        }
        self.reap(sid);
    }

    // ------------------------------------------------------------------
    // Attack actions
    // ------------------------------------------------------------------

    pub fn attack_melee(
        &mut self,
        world: &mut dyn EntityStore,
        attacker: EntityId,
        target: EntityId,
    ) -> AttackOutcome {
        self.resolve_attack(world, attacker, target, AttackType::Melee)
    }

    pub fn attack_ranged(
        &mut self,
        world: &mut dyn EntityStore,
        attacker: EntityId,
        target: EntityId,
    ) -> AttackOutcome {
        self.resolve_attack(world, attacker, target, AttackType::Ranged)
    }

    pub fn attack_thrown(
        &mut self,
        world: &mut dyn EntityStore,
        attacker: EntityId,
        target: EntityId,
    ) -> AttackOutcome {
        self.resolve_attack(world, attacker, target, AttackType::Thrown)
    }

    fn resolve_attack(
        &mut self,
        world: &mut dyn EntityStore,
        attacker_id: EntityId,
        target_id: EntityId,
        kind: AttackType,
    ) -> AttackOutcome {
        let invalid = AttackOutcome::Invalid(CombatError::InvalidTarget);

        let Some(attacker) = world.get(attacker_id) else {
            return invalid;
        };
        let attacker_name = attacker.name().to_string();
        let location = attacker.location();
        let aggression = attacker.aggression();

        let profile = match self.select_profile(attacker, kind) {
            Ok(profile) => profile,
            Err(msg) => {
                if let Some(a) = world.get_mut(attacker_id) {
                    a.send(&msg);
                }
                return invalid;
            }
        };

        let Some(target) = world.get(target_id) else {
            if let Some(a) = world.get_mut(attacker_id) {
                a.send("They are not here.");
            }
            return invalid;
        };
        let target_name = target.name().to_string();
        let pvp_allowed = world.pvp_allowed(target.location());

        let cost = self.rules.attack_stamina_cost(aggression, profile.stamina_cost);
        let distance = self.pair_distance(attacker, target);

        // Stage 1: every precondition, before any state change.
        if let Err(err) =
            self.rules
                .validate_attack(attacker, target, &profile, cost, distance, pvp_allowed)
        {
            if let Some(a) = world.get_mut(attacker_id) {
                a.send(&err.to_string());
            }
            return AttackOutcome::Invalid(err);
        }

        // Validation passed: bind the pair into a session (first blood
        // creates it, cross-session attacks merge).
        let sid = match self.get_or_create(world, attacker_id, target_id) {
            Ok(sid) => sid,
            Err(err) => {
                if let Some(a) = world.get_mut(attacker_id) {
                    a.send(&err.to_string());
                }
                return AttackOutcome::Invalid(err);
            }
        };

        // Stage 2: the swing is committed. Stamina and cooldown are spent
        // whatever happens next.
        if let Some(a) = world.get_mut(attacker_id) {
            a.spend_stamina(cost);
            a.cooldowns_mut().add(ATTACK_COOLDOWN, profile.cooldown_secs);
        }

        // Stage 3: shield block or weapon parry.
        let (blocked, parried, defense_cost, defender_stamina) = {
            let Some(t) = world.get(target_id) else {
                return invalid;
            };
            let blocked = t.equipment().shield().is_some();
            let parried = !blocked
                && t.equipment().weapon().map_or(false, |w| w.can_parry);
            (
                blocked,
                parried,
                self.rules.defense_stamina_cost(kind, t),
                t.stamina(),
            )
        };
        if (blocked || parried) && defender_stamina >= defense_cost {
            if let Some(t) = world.get_mut(target_id) {
                t.spend_stamina(defense_cost);
            }
            // Turning a blow in close is punished and rewarded: the
            // attacker recovers slower, the defender gets a riposte window.
            if distance <= RangeBand::Melee.value() {
                let penalty = self.rules.config().block_cooldown_penalty_secs;
                let riposte = self.rules.config().riposte_bonus;
                if let Some(a) = world.get_mut(attacker_id) {
                    a.cooldowns_mut().extend(ATTACK_COOLDOWN, penalty);
                }
                if let Some(session) = self.sessions.get_mut(&sid) {
                    session.grant_attack_bonus(target_id, attacker_id, riposte);
                }
            }
            let msg = if blocked {
                narrate::blocked(&target_name, &profile.name)
            } else {
                narrate::parried(&target_name, &profile.name)
            };
            world.broadcast(location, &msg, &[]);
            return if blocked {
                AttackOutcome::Blocked
            } else {
                AttackOutcome::Parried
            };
        }

        // Stages 4–5: opposed rolls. Melee is dodged; missiles face a
        // static defense. Ties go to the attacker.
        let versus = self
            .sessions
            .get_mut(&sid)
            .map_or(0, |s| s.take_attack_bonus(attacker_id, target_id));
        let (attack_roll, defense_roll) = {
            let Some(a) = world.get(attacker_id) else {
                return invalid;
            };
            let Some(t) = world.get(target_id) else {
                return invalid;
            };
            let attack_stat = self.rules.attack_stat(kind);
            let attack_roll =
                self.rules
                    .roll(self.dice.as_mut(), a, attack_stat, false, versus);
            let defense_roll = match kind {
                AttackType::Melee => {
                    self.rules
                        .roll(self.dice.as_mut(), t, trait_keys::CUNNING, true, 0)
                }
                _ => self.rules.static_defense(t, distance),
            };
            (attack_roll, defense_roll)
        };
        if attack_roll < defense_roll {
            if let Some(a) = world.get_mut(attacker_id) {
                a.send(&narrate::miss_attacker(&target_name));
            }
            if let Some(t) = world.get_mut(target_id) {
                t.send(&narrate::miss_target(&attacker_name));
            }
            return AttackOutcome::Miss {
                attack: attack_roll,
                defense: defense_roll,
            };
        }

        // Stage 6: damage, scaled by stance.
        let stat_bonus = match world.get(attacker_id) {
            Some(a) => a.stat(self.rules.damage_stat(kind)),
            None => return invalid,
        };
        let raw = self.dice.between(profile.min_damage, profile.max_damage) + stat_bonus;
        let raw = self.rules.scale_damage(aggression, raw);

        // Stage 7: armor mitigation.
        let mitigation = world.get(target_id).map_or(0, |t| t.armor_total());
        let damage = raw - mitigation;
        if damage <= 0 {
            world.broadcast(location, &narrate::absorbed(&target_name, &profile.name), &[]);
            return AttackOutcome::Absorbed { raw };
        }

        // Stage 8: the hit lands; death is the entity's own affair.
        if let Some(t) = world.get_mut(target_id) {
            t.at_damage(damage, attacker_id);
        }
        world.broadcast(
            location,
            &narrate::hit(&target_name, &profile.name, damage),
            &[],
        );
        AttackOutcome::Hit { damage }
    }

    // ------------------------------------------------------------------
    // Movement actions
    // ------------------------------------------------------------------

    /// Step toward an opponent. Sets the move cooldown on success.
    pub fn advance(
        &mut self,
        world: &mut dyn EntityStore,
        mover: EntityId,
        target: EntityId,
    ) -> bool {
        self.combat_move(world, mover, target, true)
    }

    /// Step away from an opponent. Sets the move cooldown on success.
    pub fn retreat(
        &mut self,
        world: &mut dyn EntityStore,
        mover: EntityId,
        target: EntityId,
    ) -> bool {
        self.combat_move(world, mover, target, false)
    }

    fn combat_move(
        &mut self,
        world: &mut dyn EntityStore,
        mover_id: EntityId,
        target_id: EntityId,
        toward: bool,
    ) -> bool {
        let Some(mover) = world.get(mover_id) else {
            return false;
        };
        let location = mover.location();
        let Some(target) = world.get(target_id) else {
            if let Some(m) = world.get_mut(mover_id) {
                m.send("They are not here.");
            }
            return false;
        };
        let target_name = target.name().to_string();

        let checked = self.rules.validate_session(mover, target).and_then(|sid| {
            if !self.sessions.contains_key(&sid) {
                return Err(CombatError::NotInCombat);
            }
            if !mover.cooldowns().ready(MOVE_COOLDOWN) {
                return Err(CombatError::OnCooldown {
                    remaining: mover.cooldowns().time_left_secs(MOVE_COOLDOWN),
                });
            }
            Ok(sid)
        });
        let sid = match checked {
            Ok(sid) => sid,
            Err(err) => {
                if let Some(m) = world.get_mut(mover_id) {
                    m.send(&err.to_string());
                }
                return false;
            }
        };

        let Some(session) = self.sessions.get_mut(&sid) else {
            return false;
        };
        let moved = if toward {
            session.approach(mover_id, target_id)
        } else {
            session.retreat(mover_id, target_id)
        };
        if !moved {
            let msg = if toward {
                narrate::no_closer(&target_name)
            } else {
                narrate::no_further(&target_name)
            };
            if let Some(m) = world.get_mut(mover_id) {
                m.send(&msg);
            }
            return false;
        }

        let cooldown = self.rules.config().move_cooldown_secs;
        if let Some(m) = world.get_mut(mover_id) {
            m.cooldowns_mut().add(MOVE_COOLDOWN, cooldown);
        }
        let msg = if toward {
            narrate::advance(&target_name)
        } else {
            narrate::retreat(&target_name)
        };
        world.broadcast(location, &msg, &[]);
        true
    }

    /// Run from the fight through a random exit. Removing the runner may
    /// finish the session, which then ends and releases the survivor.
    pub fn flee(&mut self, world: &mut dyn EntityStore, entity_id: EntityId) -> bool {
        let Some(entity) = world.get(entity_id) else {
            return false;
        };
        let name = entity.name().to_string();
        let location = entity.location();
        let sid = entity
            .combat()
            .filter(|sid| self.sessions.contains_key(sid));
        let Some(sid) = sid else {
            if let Some(e) = world.get_mut(entity_id) {
                e.send(&CombatError::NotInCombat.to_string());
            }
            return false;
        };
        if !entity.cooldowns().ready(MOVE_COOLDOWN) {
            let remaining = entity.cooldowns().time_left_secs(MOVE_COOLDOWN);
            if let Some(e) = world.get_mut(entity_id) {
                e.send(&CombatError::OnCooldown { remaining }.to_string());
            }
            return false;
        }

        if !world.traverse_random_exit(entity_id) {
            if let Some(e) = world.get_mut(entity_id) {
                e.send(&narrate::no_escape());
            }
            return false;
        }

        if let Some(e) = world.get_mut(entity_id) {
            e.send("You flee the fight!");
        }
        world.broadcast(location, &narrate::flee(&name), &[entity_id]);
        if let Some(session) = self.sessions.get_mut(&sid) {
            session.remove(world, entity_id);
        }
        self.reap(sid);
        true
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The entity's session handle, filtered against the live table.
    fn live_session(
        &self,
        world: &dyn EntityStore,
        id: EntityId,
    ) -> Result<Option<SessionId>> {
        let entity = world.get(id).ok_or(CombatError::InvalidTarget)?;
        Ok(entity
            .combat()
            .filter(|sid| self.sessions.contains_key(sid)))
    }

    fn join(&mut self, world: &mut dyn EntityStore, sid: SessionId, id: EntityId) -> Result<()> {
        let position = {
            let entity = world.get(id).ok_or(CombatError::InvalidTarget)?;
            self.rules.get_initial_position(entity)
        };
        let entity = world.get_mut(id).ok_or(CombatError::InvalidTarget)?;
        let session = self
            .sessions
            .get_mut(&sid)
            .ok_or(CombatError::NotInCombat)?;
        session.add(entity, position)
    }

    /// Fold `from` into `into`, retargeting every back-reference. The
    /// emptied session is dropped.
    fn merge(&mut self, world: &mut dyn EntityStore, into: SessionId, from: SessionId) -> SessionId {
        let Some(mut other) = self.sessions.remove(&from) else {
            return into;
        };
        let movers: Vec<EntityId> = other.positions().keys().copied().collect();
        for id in &movers {
            if let Some(entity) = world.get_mut(*id) {
                entity.set_combat(Some(into));
            }
        }
        if let Some(session) = self.sessions.get_mut(&into) {
            session.absorb(&mut other);
        }
        tracing::debug!(?from, ?into, moved = movers.len(), "combat sessions merged");
        into
    }

    /// Distance between two entities: their session positions when they
    /// share one, otherwise the spacing they would open at.
    fn pair_distance(&self, a: &dyn Combatant, b: &dyn Combatant) -> i32 {
        if let (Some(sa), Some(sb)) = (a.combat(), b.combat()) {
            if sa == sb {
                if let Some(distance) = self
                    .sessions
                    .get(&sa)
                    .and_then(|s| s.distance(a.id(), b.id()))
                {
                    return distance;
                }
            }
        }
        (self.rules.get_initial_position(a) - self.rules.get_initial_position(b)).abs()
    }

    /// What swings for this attack type: the wielded weapon when it fits,
    /// otherwise the bare-handed fallback.
    fn select_profile(
        &self,
        attacker: &dyn Combatant,
        kind: AttackType,
    ) -> std::result::Result<AttackProfile, String> {
        let weapon = attacker
            .equipment()
            .weapon()
            .filter(|w| w.attack_type == kind);
        match (kind, weapon) {
            (_, Some(weapon)) => Ok(AttackProfile::from_item(weapon)),
            (AttackType::Melee, None) => Ok(AttackProfile::fists()),
            (AttackType::Thrown, None) => Ok(AttackProfile::improvised_thrown()),
            (AttackType::Ranged, None) | (AttackType::Magic, None) => {
                Err(narrate::nothing_to_shoot())
            }
        }
    }

    /// Drop a finished session from the table; finished is absorbing.
    fn reap(&mut self, sid: SessionId) {
        if self.sessions.get(&sid).is_some_and(|s| s.finished()) {
            self.sessions.remove(&sid);
            tracing::debug!(session = ?sid, "combat session reaped");
        }
    }
}
