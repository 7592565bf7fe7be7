//! Vitals and combat surface of a creature
//!
//! Health and mana are clamped into `[0, max]` at every mutation. Reaching
//! zero health runs the death transition exactly once.

use crate::combat::damage::{DamageReport, DamageType, Immunities};
use crate::core::types::CreatureId;
use crate::entity::conditions::ConditionType;
use crate::entity::creature::Creature;
use crate::entity::kind::CreatureBehavior;

fn clamped(current: i32, delta: i32, max: i32) -> i32 {
    (i64::from(current) + i64::from(delta)).clamp(0, i64::from(max)) as i32
}

impl Creature {
    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.health_max
    }

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn max_mana(&self) -> i32 {
        self.mana_max
    }

    /// Change maximum health, pulling current health down if needed
    pub fn set_max_health(&mut self, health_max: i32) {
        self.health_max = health_max.max(1);
        self.health = self.health.min(self.health_max);
    }

    pub fn set_max_mana(&mut self, mana_max: i32) {
        self.mana_max = mana_max.max(0);
        self.mana = self.mana.min(self.mana_max);
    }

    /// Apply a health delta; returns the change actually applied
    ///
    /// Dead creatures stay at zero.
    pub fn change_health(&mut self, delta: i32) -> i32 {
        if self.dead {
            return 0;
        }
        let before = self.health;
        self.health = clamped(before, delta, self.health_max);
        if self.health == 0 && !self.dead {
            self.die();
        }
        self.health - before
    }

    /// Apply a mana delta; returns the change actually applied
    pub fn change_mana(&mut self, delta: i32) -> i32 {
        let before = self.mana;
        self.mana = clamped(before, delta, self.mana_max);
        self.mana - before
    }

    /// Combat entry point for health damage
    ///
    /// Immune damage is a no-op reporting zero. With an active mana
    /// shield, mana absorbs the damage before health does.
    pub fn drain_health(
        &mut self,
        attacker: Option<CreatureId>,
        damage_type: DamageType,
        amount: i32,
    ) -> DamageReport {
        if amount <= 0 || self.is_immune(damage_type) {
            return DamageReport::default();
        }
        if attacker.is_some() {
            self.last_attacker = attacker;
        }

        let mut remaining = amount;
        let mut report = DamageReport::default();
        if self.has_condition(ConditionType::ManaShield) && self.mana > 0 {
            report.mana = -self.change_mana(-remaining);
            remaining -= report.mana;
        }

        let was_dead = self.dead;
        if remaining > 0 {
            report.health = -self.change_health(-remaining);
        }
        report.killed = !was_dead && self.dead;

        tracing::trace!(
            "{} drained {:?} from {}: {} health, {} mana",
            attacker.map_or_else(|| "environment".to_string(), |a| a.to_string()),
            damage_type,
            self.id,
            report.health,
            report.mana
        );
        report
    }

    /// Combat entry point for mana loss; returns mana actually lost
    pub fn drain_mana(&mut self, attacker: Option<CreatureId>, amount: i32) -> i32 {
        if amount <= 0 || self.is_immune(DamageType::ManaDrain) {
            return 0;
        }
        if attacker.is_some() {
            self.last_attacker = attacker;
        }
        -self.change_mana(-amount)
    }

    /// Death transition; runs its effects at most once
    ///
    /// Drops every condition, forwards the last attacker to the kind hook
    /// as kill credit and marks the creature removed.
    pub fn die(&mut self) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.health = 0;
        self.conditions.clear();

        let killer = self.last_attacker;
        self.kind.on_death(killer);
        tracing::info!(
            "{} ({}) died{}",
            self.name(),
            self.id,
            killer.map(|k| format!(", killed by {k}")).unwrap_or_default()
        );
        self.mark_removed();
    }

    pub fn last_attacker(&self) -> Option<CreatureId> {
        self.last_attacker
    }

    pub fn is_immune(&self, damage_type: DamageType) -> bool {
        self.immunities.contains(damage_type)
    }

    pub fn immunities(&self) -> Immunities {
        self.immunities
    }

    pub fn set_immunities(&mut self, immunities: Immunities) {
        self.immunities = immunities;
    }

    /// Raw combat target; callers resolve liveness through the world
    pub fn attacked_creature(&self) -> Option<CreatureId> {
        self.attacked_creature
    }

    /// Replace the combat target; `None` clears it
    pub fn set_attacked_creature(&mut self, target: Option<CreatureId>) {
        self.attacked_creature = target;
    }
}
