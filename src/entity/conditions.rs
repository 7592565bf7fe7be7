//! Timed status effects ("conditions") and the per-creature condition engine
//!
//! At most one condition per type is active. Adding a second one of the
//! same type ends the first (running its cleanup) before installing the
//! new one. Execution follows insertion order so effects that read state
//! written by earlier conditions in the same tick are reproducible.

use crate::combat::damage::DamageType;
use crate::core::types::{CreatureId, Tick};
use crate::entity::appearance::LightInfo;
use crate::entity::creature::Creature;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionType {
    Poison,
    Fire,
    Energy,
    Haste,
    Paralyze,
    Regeneration,
    Light,
    ManaShield,
    InFight,
}

/// What a condition does while it is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionEffect {
    /// Periodic damage of one type, subject to immunities
    Damage {
        damage_type: DamageType,
        amount: i32,
        interval: Tick,
    },
    /// Periodic heal
    Regeneration {
        health: i32,
        mana: i32,
        interval: Tick,
    },
    /// Added on top of normal speed while active
    Speed { delta: i32 },
    /// Overrides creature light while active
    Light(LightInfo),
    /// No effect of its own; other systems query its presence
    Flag,
}

impl ConditionEffect {
    fn interval(&self) -> Option<Tick> {
        match self {
            ConditionEffect::Damage { interval, .. } | ConditionEffect::Regeneration { interval, .. } => {
                Some(*interval)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    kind: ConditionType,
    remaining: Tick,
    effect: ConditionEffect,
    source: Option<CreatureId>,
    since_pulse: Tick,
}

impl Condition {
    pub fn new(kind: ConditionType, duration: Tick, effect: ConditionEffect) -> Self {
        Self {
            kind,
            remaining: duration,
            effect,
            source: None,
            since_pulse: 0,
        }
    }

    fn damage(kind: ConditionType, damage_type: DamageType, duration: Tick, amount: i32, interval: Tick) -> Self {
        Self::new(
            kind,
            duration,
            ConditionEffect::Damage {
                damage_type,
                amount: amount.max(0),
                interval: interval.max(1),
            },
        )
    }

    pub fn poison(duration: Tick, amount: i32, interval: Tick) -> Self {
        Self::damage(ConditionType::Poison, DamageType::Poison, duration, amount, interval)
    }

    pub fn fire(duration: Tick, amount: i32, interval: Tick) -> Self {
        Self::damage(ConditionType::Fire, DamageType::Fire, duration, amount, interval)
    }

    pub fn energy(duration: Tick, amount: i32, interval: Tick) -> Self {
        Self::damage(ConditionType::Energy, DamageType::Energy, duration, amount, interval)
    }

    pub fn haste(duration: Tick, bonus: i32) -> Self {
        Self::new(ConditionType::Haste, duration, ConditionEffect::Speed { delta: bonus.saturating_abs() })
    }

    pub fn paralyze(duration: Tick, penalty: i32) -> Self {
        Self::new(ConditionType::Paralyze, duration, ConditionEffect::Speed { delta: -penalty.saturating_abs() })
    }

    pub fn regeneration(duration: Tick, health: i32, mana: i32, interval: Tick) -> Self {
        Self::new(
            ConditionType::Regeneration,
            duration,
            ConditionEffect::Regeneration {
                health: health.max(0),
                mana: mana.max(0),
                interval: interval.max(1),
            },
        )
    }

    pub fn light(duration: Tick, light: LightInfo) -> Self {
        Self::new(ConditionType::Light, duration, ConditionEffect::Light(light))
    }

    pub fn mana_shield(duration: Tick) -> Self {
        Self::new(ConditionType::ManaShield, duration, ConditionEffect::Flag)
    }

    pub fn in_fight(duration: Tick) -> Self {
        Self::new(ConditionType::InFight, duration, ConditionEffect::Flag)
    }

    /// Creature credited with this condition's damage
    pub fn with_source(mut self, source: CreatureId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> ConditionType {
        self.kind
    }

    pub fn remaining(&self) -> Tick {
        self.remaining
    }

    pub fn effect(&self) -> ConditionEffect {
        self.effect
    }

    pub fn source(&self) -> Option<CreatureId> {
        self.source
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Advance by `elapsed` ticks, never past expiry
    ///
    /// Returns how many periodic pulses fell due.
    fn advance(&mut self, elapsed: Tick) -> u64 {
        let step = elapsed.min(self.remaining);
        self.remaining -= step;
        match self.effect.interval() {
            Some(interval) => {
                self.since_pulse += step;
                let pulses = self.since_pulse / interval;
                self.since_pulse %= interval;
                pulses
            }
            None => 0,
        }
    }

    /// Must run after the condition is installed
    fn on_start(&self, creature: &mut Creature) {
        match self.effect {
            ConditionEffect::Speed { .. } => creature.set_normal_speed(),
            ConditionEffect::Light(light) => creature.set_creature_light(light),
            _ => {}
        }
    }

    /// Must run after the condition is uninstalled
    fn on_end(&self, creature: &mut Creature) {
        match self.effect {
            ConditionEffect::Speed { .. } => creature.set_normal_speed(),
            ConditionEffect::Light(_) => creature.set_normal_creature_light(),
            _ => {}
        }
    }
}

/// Active conditions of one creature, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ConditionList {
    conditions: Vec<Condition>,
}

impl ConditionList {
    pub fn new() -> Self {
        Self { conditions: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, kind: ConditionType) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.kind == kind)
    }

    pub fn contains(&self, kind: ConditionType) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// Sum of speed deltas of all active conditions
    pub fn speed_delta(&self) -> i32 {
        self.conditions
            .iter()
            .map(|c| match c.effect {
                ConditionEffect::Speed { delta } => delta,
                _ => 0,
            })
            .fold(0i32, i32::saturating_add)
    }

    fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    fn remove(&mut self, kind: ConditionType) -> Option<Condition> {
        let index = self.conditions.iter().position(|c| c.kind == kind)?;
        Some(self.conditions.remove(index))
    }

    fn get_index_mut(&mut self, index: usize) -> Option<&mut Condition> {
        self.conditions.get_mut(index)
    }

    fn drain_expired(&mut self) -> Vec<Condition> {
        let (expired, active) = std::mem::take(&mut self.conditions)
            .into_iter()
            .partition(Condition::is_expired);
        self.conditions = active;
        expired
    }

    pub(crate) fn clear(&mut self) {
        self.conditions.clear();
    }
}

impl Creature {
    /// Install a condition, replacing any active one of the same type
    ///
    /// A replacement is appended, so it runs after every condition that
    /// was already active.
    ///
    /// Rejected (returns false) when the duration is zero, the creature is
    /// dead, or the condition deals damage the creature is immune to.
    pub fn add_condition(&mut self, condition: Condition) -> bool {
        if condition.is_expired() || self.dead {
            return false;
        }
        if let ConditionEffect::Damage { damage_type, .. } = condition.effect {
            if self.is_immune(damage_type) {
                tracing::debug!("{} is immune to {:?}, condition rejected", self.id, condition.kind);
                return false;
            }
        }

        if let Some(previous) = self.conditions.remove(condition.kind) {
            tracing::debug!("{} replacing {:?} condition", self.id, previous.kind);
            previous.on_end(self);
        }

        tracing::debug!(
            "{} gains {:?} for {} ticks",
            self.id,
            condition.kind,
            condition.remaining
        );
        let installed = condition.clone();
        self.conditions.push(condition);
        installed.on_start(self);
        true
    }

    /// End and delete the condition of `kind`; no-op if absent
    pub fn remove_condition(&mut self, kind: ConditionType) -> bool {
        match self.conditions.remove(kind) {
            Some(condition) => {
                tracing::debug!("{} loses {:?}", self.id, kind);
                condition.on_end(self);
                true
            }
            None => false,
        }
    }

    /// Advance every active condition by `elapsed` ticks
    ///
    /// Periodic effects fire for each interval boundary crossed up to the
    /// condition's natural expiry. Expired conditions are removed after
    /// their final pulse. Processing stops if the creature dies.
    pub fn execute_conditions(&mut self, elapsed: Tick) {
        if elapsed == 0 || self.dead {
            return;
        }

        let mut index = 0;
        while !self.dead {
            let Some(condition) = self.conditions.get_index_mut(index) else {
                break;
            };
            let pulses = condition.advance(elapsed);
            let effect = condition.effect;
            let source = condition.source;

            for _ in 0..pulses {
                if self.dead {
                    break;
                }
                self.apply_pulse(effect, source);
            }
            index += 1;
        }

        if self.dead {
            return;
        }
        for condition in self.conditions.drain_expired() {
            tracing::debug!("{} {:?} condition expired", self.id, condition.kind);
            condition.on_end(self);
        }
    }

    fn apply_pulse(&mut self, effect: ConditionEffect, source: Option<CreatureId>) {
        match effect {
            ConditionEffect::Damage { damage_type, amount, .. } => {
                self.drain_health(source, damage_type, amount);
            }
            ConditionEffect::Regeneration { health, mana, .. } => {
                self.change_health(health);
                self.change_mana(mana);
            }
            ConditionEffect::Speed { .. } | ConditionEffect::Light(_) | ConditionEffect::Flag => {}
        }
    }

    pub fn condition(&self, kind: ConditionType) -> Option<&Condition> {
        self.conditions.get(kind)
    }

    pub fn has_condition(&self, kind: ConditionType) -> bool {
        self.conditions.contains(kind)
    }

    pub fn conditions(&self) -> &ConditionList {
        &self.conditions
    }
}
