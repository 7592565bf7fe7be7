//! World - owns every creature and resolves the associations between them
//!
//! Creatures refer to each other only by `CreatureId`. Any lookup through
//! a target, master or summon id goes through the registry here, so a
//! reference to a removed creature degrades to "none".

use crate::combat::constants::IN_FIGHT_TICKS;
use crate::combat::damage::{DamageReport, DamageType};
use crate::core::error::{CreatureError, Result};
use crate::core::types::{CreatureId, Direction, Position, Tick};
use crate::entity::appearance::Outfit;
use crate::entity::conditions::Condition;
use crate::entity::creature::{Creature, CreatureTemplate};
use crate::entity::identity::{CreatureKind, IdAllocator};
use crate::entity::kind::CreatureBehavior;
use crate::entity::observer::{SpeakClass, WorldEvent};
use ahash::AHashMap;

/// Per-kind bookkeeping filled by each kind's registry hooks
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    /// Online players keyed by lowercase name
    pub(crate) players: AHashMap<String, CreatureId>,
    pub(crate) monsters: Vec<CreatureId>,
    pub(crate) npcs: Vec<CreatureId>,
}

impl KindRegistry {
    pub fn player_by_name(&self, name: &str) -> Option<CreatureId> {
        self.players.get(&name.to_lowercase()).copied()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn monsters(&self) -> &[CreatureId] {
        &self.monsters
    }

    pub fn npcs(&self) -> &[CreatureId] {
        &self.npcs
    }
}

/// A creature that died during a tick or an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub creature: CreatureId,
    pub killer: Option<CreatureId>,
}

/// What happened during one `World::tick`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub thinks: usize,
    pub deaths: Vec<Death>,
}

/// The game world containing all live creatures
pub struct World {
    pub current_tick: Tick,
    creatures: AHashMap<CreatureId, Creature>,
    /// Spawn order; every per-creature pass iterates this
    order: Vec<CreatureId>,
    next_think: AHashMap<CreatureId, Tick>,
    ids: IdAllocator,
    registry: KindRegistry,
}

impl World {
    pub fn new() -> Self {
        Self::with_allocator(IdAllocator::new())
    }

    pub fn with_allocator(ids: IdAllocator) -> Self {
        Self {
            current_tick: 0,
            creatures: AHashMap::new(),
            order: Vec::new(),
            next_think: AHashMap::new(),
            ids,
            registry: KindRegistry::default(),
        }
    }

    // === LIFECYCLE ===

    pub fn spawn(&mut self, template: CreatureTemplate) -> Result<CreatureId> {
        let kind = template.kind.kind();
        let id = self.ids.allocate(kind)?;
        let mut creature = Creature::new(id, template);
        creature.kind.add_to_registry(id, &mut self.registry);

        tracing::debug!("Spawned {:?} {} ({})", kind, creature.name(), id);
        self.creatures.insert(id, creature);
        self.order.push(id);
        self.next_think.insert(id, self.current_tick);

        self.broadcast(&WorldEvent::CreatureAppear {
            creature: id,
            is_login: kind == CreatureKind::Player,
        });
        Ok(id)
    }

    /// Remove a creature from the world and hand it back
    ///
    /// The creature is dropped from its master's summon list. Its own
    /// summons are left in place; their master id simply stops resolving.
    pub fn despawn(&mut self, id: CreatureId) -> Result<Creature> {
        let mut creature = self
            .creatures
            .remove(&id)
            .ok_or(CreatureError::CreatureNotFound(id))?;
        creature.mark_removed();
        creature.kind.remove_from_registry(id, &mut self.registry);
        if let Some(master) = creature.master().and_then(|m| self.creatures.get_mut(&m)) {
            master.remove_summon(id);
        }
        self.order.retain(|&c| c != id);
        self.next_think.remove(&id);

        tracing::debug!("Despawned {} ({})", creature.name(), id);
        self.broadcast(&WorldEvent::CreatureDisappear {
            creature: id,
            stack_pos: 0,
            is_logout: creature.kind() == CreatureKind::Player,
        });
        Ok(creature)
    }

    /// Live creature lookup
    pub fn get(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id).filter(|c| !c.is_removed())
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id).filter(|c| !c.is_removed())
    }

    fn live_mut(&mut self, id: CreatureId) -> Result<&mut Creature> {
        match self.creatures.get_mut(&id) {
            Some(c) if c.is_removed() => Err(CreatureError::CreatureRemoved(id)),
            Some(c) => Ok(c),
            None => Err(CreatureError::CreatureNotFound(id)),
        }
    }

    fn live(&self, id: CreatureId) -> Result<&Creature> {
        match self.creatures.get(&id) {
            Some(c) if c.is_removed() => Err(CreatureError::CreatureRemoved(id)),
            Some(c) => Ok(c),
            None => Err(CreatureError::CreatureNotFound(id)),
        }
    }

    pub fn is_alive(&self, id: CreatureId) -> bool {
        self.get(id).is_some()
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Live creatures in spawn order
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.order.iter().filter_map(move |id| self.get(*id))
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    // === COMBAT ===

    /// Current target of `id`, if both are still live
    pub fn attacked_creature(&self, id: CreatureId) -> Option<CreatureId> {
        self.get(id)?
            .attacked_creature()
            .filter(|target| self.is_alive(*target))
    }

    pub fn set_attacked_creature(&mut self, id: CreatureId, target: Option<CreatureId>) -> Result<()> {
        self.live_mut(id)?.set_attacked_creature(target);
        Ok(())
    }

    /// Apply damage to `target`, reaping it if the hit is lethal
    pub fn attack(
        &mut self,
        attacker: Option<CreatureId>,
        target: CreatureId,
        damage_type: DamageType,
        amount: i32,
    ) -> Result<DamageReport> {
        let victim = self.live_mut(target)?;
        if !victim.is_attackable() {
            return Err(CreatureError::NotAttackable(target));
        }

        let report = victim.drain_health(attacker, damage_type, amount);
        if !report.is_none() && !report.killed {
            victim.add_condition(Condition::in_fight(IN_FIGHT_TICKS));
        }
        if let Some(attacker) = attacker {
            if !report.is_none() {
                if let Some(source) = self.get_mut(attacker) {
                    source.add_condition(Condition::in_fight(IN_FIGHT_TICKS));
                }
            }
        }

        if report.killed {
            self.despawn(target)?;
        }
        Ok(report)
    }

    pub fn drain_mana(&mut self, attacker: Option<CreatureId>, target: CreatureId, amount: i32) -> Result<i32> {
        let victim = self.live_mut(target)?;
        if !victim.is_attackable() {
            return Err(CreatureError::NotAttackable(target));
        }
        Ok(victim.drain_mana(attacker, amount))
    }

    // === OWNERSHIP ===

    /// Master of `id`, if both are still live
    pub fn master_of(&self, id: CreatureId) -> Option<CreatureId> {
        self.get(id)?.master().filter(|master| self.is_alive(*master))
    }

    /// Live summons of `id`, in binding order
    pub fn summons_of(&self, id: CreatureId) -> Vec<CreatureId> {
        self.get(id)
            .map(|c| c.summons().iter().copied().filter(|s| self.is_alive(*s)).collect())
            .unwrap_or_default()
    }

    /// Make `summon` controlled by `master`, updating both sides
    ///
    /// A summon already bound elsewhere is released from its previous
    /// master first.
    pub fn bind(&mut self, master: CreatureId, summon: CreatureId) -> Result<()> {
        if master == summon {
            return Err(CreatureError::SelfBinding(master));
        }
        let master_position = self.live(master)?.position();
        let previous = self.live(summon)?.master();

        let mut ancestor = Some(master);
        while let Some(current) = ancestor {
            if current == summon {
                return Err(CreatureError::BindingCycle { master, summon });
            }
            ancestor = self.creatures.get(&current).and_then(|c| c.master());
        }

        if let Some(old) = previous.filter(|&old| old != master) {
            if let Some(old_master) = self.creatures.get_mut(&old) {
                old_master.remove_summon(summon);
            }
        }

        let bound = self.live_mut(summon)?;
        bound.set_master(Some(master));
        bound.set_master_position(master_position);
        self.live_mut(master)?.add_summon(summon);

        tracing::debug!("Bound {} as summon of {}", summon, master);
        Ok(())
    }

    /// Release `summon` from `master`, updating both sides
    ///
    /// Works on a summon that died but has not been reaped yet.
    pub fn unbind(&mut self, master: CreatureId, summon: CreatureId) -> Result<()> {
        let listed = self.live(master)?.has_summon(summon);
        let points_back = self.creatures.get(&summon).and_then(|c| c.master()) == Some(master);
        if !listed && !points_back {
            return Err(CreatureError::NotBound { master, summon });
        }

        self.live_mut(master)?.remove_summon(summon);
        if let Some(released) = self.creatures.get_mut(&summon) {
            if released.master() == Some(master) {
                released.set_master(None);
            }
        }

        tracing::debug!("Unbound {} from {}", summon, master);
        Ok(())
    }

    // === MOVEMENT & EVENTS ===

    pub fn move_creature(&mut self, id: CreatureId, to: Position, direction: Direction) -> Result<()> {
        let now = self.current_tick;
        let creature = self.live_mut(id)?;
        let from = creature.position();
        creature.move_to(to, direction, now);

        self.broadcast(&WorldEvent::CreatureMove {
            creature: id,
            old_pos: from,
            new_pos: to,
            old_stack_pos: 1,
            teleport: from.distance(&to).map_or(true, |d| d > 1),
        });
        Ok(())
    }

    pub fn turn_creature(&mut self, id: CreatureId, direction: Direction) -> Result<()> {
        self.live_mut(id)?.turn(direction);
        self.broadcast(&WorldEvent::CreatureTurn { creature: id, stack_pos: 1 });
        Ok(())
    }

    pub fn say(&mut self, id: CreatureId, class: SpeakClass, text: impl Into<String>) -> Result<()> {
        self.live(id)?;
        self.broadcast(&WorldEvent::CreatureSay {
            creature: id,
            class,
            text: text.into(),
        });
        Ok(())
    }

    pub fn change_outfit(&mut self, id: CreatureId, outfit: Outfit) -> Result<()> {
        self.live_mut(id)?.set_outfit(outfit);
        self.broadcast(&WorldEvent::CreatureChangeOutfit { creature: id, outfit });
        Ok(())
    }

    /// Deliver an event to every live creature in spawn order
    ///
    /// Hook failures are logged and counted; they never stop the loop.
    pub fn broadcast(&mut self, event: &WorldEvent) -> usize {
        let mut failures = 0;
        for id in &self.order {
            let Some(creature) = self.creatures.get_mut(id).filter(|c| !c.is_removed()) else {
                continue;
            };
            if let Err(e) = creature.notify(event) {
                tracing::warn!("Observer {} failed on {:?}: {}", id, event, e);
                failures += 1;
            }
        }
        failures
    }

    // === TICK ===

    /// Advance the world by `elapsed` ticks
    ///
    /// Runs conditions, then due thinks, for every creature in spawn
    /// order, then reaps creatures that died along the way.
    pub fn tick(&mut self, elapsed: Tick) -> TickReport {
        self.current_tick += elapsed;
        let now = self.current_tick;
        let mut report = TickReport {
            tick: now,
            ..TickReport::default()
        };

        let mut stale = Vec::new();
        for id in self.order.clone() {
            let Some(creature) = self.creatures.get_mut(&id) else {
                continue;
            };
            if !creature.is_removed() {
                creature.execute_conditions(elapsed);
            }
            if creature.is_dead() {
                report.deaths.push(Death {
                    creature: id,
                    killer: creature.last_attacker(),
                });
                continue;
            }
            if creature.is_removed() {
                stale.push(id);
                continue;
            }

            let due = self.next_think.get(&id).copied().unwrap_or(now);
            if now >= due {
                let interval = creature.on_think();
                self.next_think.insert(id, now + interval);
                report.thinks += 1;
            }
        }

        for id in report.deaths.iter().map(|d| d.creature).chain(stale) {
            if let Err(e) = self.despawn(id) {
                tracing::warn!("Failed to reap {}: {}", id, e);
            }
        }
        report
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::kind::MonsterState;

    fn world_with_pair() -> (World, CreatureId, CreatureId) {
        let mut world = World::new();
        let player = world.spawn(CreatureTemplate::player("Knight")).unwrap();
        let rat = world
            .spawn(CreatureTemplate::monster(MonsterState::new("Rat")).with_vitals(30, 0))
            .unwrap();
        (world, player, rat)
    }

    #[test]
    fn test_spawn_registers_kind() {
        let (world, player, rat) = world_with_pair();
        assert_eq!(world.registry().player_by_name("knight"), Some(player));
        assert_eq!(world.registry().monsters(), &[rat]);
        assert_eq!(world.creature_count(), 2);
    }

    #[test]
    fn test_despawn_unregisters() {
        let (mut world, player, _) = world_with_pair();
        let removed = world.despawn(player).unwrap();
        assert!(removed.is_removed());
        assert_eq!(world.registry().player_count(), 0);
        assert!(!world.is_alive(player));
        assert!(matches!(world.despawn(player), Err(CreatureError::CreatureNotFound(_))));
    }

    #[test]
    fn test_spawn_is_seen_by_monsters() {
        let mut world = World::new();
        let rat = world.spawn(CreatureTemplate::monster(MonsterState::new("Rat"))).unwrap();
        let player = world.spawn(CreatureTemplate::player("Knight")).unwrap();
        let seen = &world.get(rat).unwrap().as_monster().unwrap().players_in_view;
        assert_eq!(seen, &vec![player]);
    }

    #[test]
    fn test_self_binding_rejected() {
        let (mut world, player, _) = world_with_pair();
        assert!(matches!(world.bind(player, player), Err(CreatureError::SelfBinding(_))));
    }

    #[test]
    fn test_binding_cycle_rejected() {
        let (mut world, player, rat) = world_with_pair();
        world.bind(player, rat).unwrap();
        assert!(matches!(
            world.bind(rat, player),
            Err(CreatureError::BindingCycle { .. })
        ));
    }

    #[test]
    fn test_rebinding_moves_summon() {
        let (mut world, player, rat) = world_with_pair();
        let other = world.spawn(CreatureTemplate::player("Druid")).unwrap();

        world.bind(player, rat).unwrap();
        world.bind(other, rat).unwrap();

        assert!(world.summons_of(player).is_empty());
        assert_eq!(world.summons_of(other), vec![rat]);
        assert_eq!(world.master_of(rat), Some(other));
    }

    #[test]
    fn test_unbind_unbound_is_error() {
        let (mut world, player, rat) = world_with_pair();
        assert!(matches!(world.unbind(player, rat), Err(CreatureError::NotBound { .. })));
    }

    #[test]
    fn test_attack_non_attackable() {
        let mut world = World::new();
        let npc = world.spawn(CreatureTemplate::npc("Sam")).unwrap();
        assert!(matches!(
            world.attack(None, npc, DamageType::Physical, 10),
            Err(CreatureError::NotAttackable(_))
        ));
    }

    #[test]
    fn test_lethal_attack_reaps() {
        let (mut world, player, rat) = world_with_pair();
        world.set_attacked_creature(player, Some(rat)).unwrap();

        let report = world.attack(Some(player), rat, DamageType::Physical, 100).unwrap();
        assert!(report.killed);
        assert!(!world.is_alive(rat));
        assert_eq!(world.attacked_creature(player), None);
        assert!(world.registry().monsters().is_empty());
    }

    #[test]
    fn test_attack_flags_in_fight() {
        let (mut world, player, rat) = world_with_pair();
        world.attack(Some(player), rat, DamageType::Physical, 5).unwrap();
        use crate::entity::conditions::ConditionType;
        assert!(world.get(player).unwrap().has_condition(ConditionType::InFight));
        assert!(world.get(rat).unwrap().has_condition(ConditionType::InFight));
    }

    #[test]
    fn test_tick_schedules_thinks() {
        let (mut world, _, _) = world_with_pair();
        // Both think on the first tick; player again after 300, rat after 500
        assert_eq!(world.tick(1).thinks, 2);
        assert_eq!(world.tick(299).thinks, 0);
        assert_eq!(world.tick(1).thinks, 1);
        assert_eq!(world.tick(200).thinks, 1);
    }

    #[test]
    fn test_broadcast_counts_failures() {
        let mut world = World::new();
        world.spawn(CreatureTemplate::npc("Sam")).unwrap();
        world.spawn(CreatureTemplate::npc("Ann")).unwrap();
        let player = world.spawn(CreatureTemplate::player("Knight")).unwrap();

        let failures = world.broadcast(&WorldEvent::CreatureSay {
            creature: player,
            class: SpeakClass::Say,
            text: " ".into(),
        });
        assert_eq!(failures, 2);
    }
}
