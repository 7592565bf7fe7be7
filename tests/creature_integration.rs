//! Creature runtime integration tests
//!
//! End-to-end checks of the creature contracts through the public API:
//! vitals, conditions, ownership, timing and identity.

use creature_core::combat::{experience_for_level, DamageType};
use creature_core::entity::{
    Condition, ConditionType, CreatureKind, CreatureTemplate, MonsterState, SpeakClass,
    UniformTerrain, WorldEvent,
};
use creature_core::{CreatureError, CreatureId, Direction, Position, World};
use std::collections::HashSet;

fn spawn_rat(world: &mut World, health: i32) -> CreatureId {
    world
        .spawn(CreatureTemplate::monster(MonsterState::new("Rat")).with_vitals(health, 0))
        .unwrap()
}

#[test]
fn test_experience_curve_reference_levels() {
    assert_eq!(experience_for_level(1), Some(-1));
    assert_eq!(experience_for_level(8), Some(4199));
    assert_eq!(experience_for_level(50), Some(1_847_299));
    assert_eq!(experience_for_level(100), Some(15_694_799));
}

#[test]
fn test_death_happens_exactly_once() {
    let mut world = World::new();
    let player = world.spawn(CreatureTemplate::player("Knight")).unwrap();
    let rat = spawn_rat(&mut world, 25);

    let rat_creature = world.get_mut(rat).unwrap();
    rat_creature.drain_health(Some(player), DamageType::Physical, 25);
    assert!(rat_creature.is_dead());
    assert_eq!(rat_creature.health(), 0);

    // Further damage and explicit die calls are no-ops on kill credit
    rat_creature.drain_health(None, DamageType::Fire, 10);
    rat_creature.die();
    assert_eq!(rat_creature.as_monster().unwrap().killer, Some(player));

    // Dead creatures are reaped on the next tick
    let report = world.tick(1);
    assert_eq!(report.deaths.len(), 1);
    assert_eq!(report.deaths[0].killer, Some(player));
    assert!(!world.is_alive(rat));
}

#[test]
fn test_replacing_condition_runs_cleanup_once() {
    let mut world = World::new();
    let rat = spawn_rat(&mut world, 100);
    let creature = world.get_mut(rat).unwrap();

    creature.add_condition(Condition::poison(5000, 10, 1000));
    creature.add_condition(Condition::poison(2000, 3, 500));

    let active = creature.condition(ConditionType::Poison).unwrap();
    assert_eq!(active.remaining(), 2000);
    assert_eq!(creature.conditions().len(), 1);

    creature.execute_conditions(2000);
    assert_eq!(creature.health(), 88);
    assert!(!creature.has_condition(ConditionType::Poison));
}

#[test]
fn test_conditions_expire_through_world_tick() {
    let mut world = World::new();
    let rat = spawn_rat(&mut world, 100);
    world.get_mut(rat).unwrap().add_condition(Condition::fire(2000, 10, 1000));

    world.tick(1500);
    assert_eq!(world.get(rat).unwrap().health(), 90);
    world.tick(5000);
    let rat_creature = world.get(rat).unwrap();
    assert_eq!(rat_creature.health(), 80);
    assert!(rat_creature.conditions().is_empty());
}

#[test]
fn test_lethal_condition_credits_source() {
    let mut world = World::new();
    let player = world.spawn(CreatureTemplate::player("Knight")).unwrap();
    let rat = spawn_rat(&mut world, 20);
    world
        .get_mut(rat)
        .unwrap()
        .add_condition(Condition::energy(10_000, 15, 1000).with_source(player));

    let report = world.tick(2000);
    assert_eq!(report.deaths.len(), 1);
    assert_eq!(report.deaths[0].creature, rat);
    assert_eq!(report.deaths[0].killer, Some(player));
    assert!(world.registry().monsters().is_empty());
}

#[test]
fn test_bind_and_unbind_keep_both_sides() {
    let mut world = World::new();
    let master = world.spawn(CreatureTemplate::player("Druid").at(Position::new(50, 50, 7))).unwrap();
    let summon = spawn_rat(&mut world, 30);

    world.bind(master, summon).unwrap();
    assert_eq!(world.get(summon).unwrap().master(), Some(master));
    assert!(world.get(master).unwrap().summons().contains(&summon));
    assert_eq!(world.get(summon).unwrap().master_position(), Position::new(50, 50, 7));

    world.unbind(master, summon).unwrap();
    assert_eq!(world.get(summon).unwrap().master(), None);
    assert!(world.get(master).unwrap().summons().is_empty());
}

#[test]
fn test_removed_master_degrades_to_none() {
    let mut world = World::new();
    let master = world.spawn(CreatureTemplate::player("Druid")).unwrap();
    let summon = spawn_rat(&mut world, 30);
    world.bind(master, summon).unwrap();

    world.despawn(master).unwrap();

    // Summon is not cascaded and its raw link remains, but it no longer resolves
    assert!(world.is_alive(summon));
    assert_eq!(world.get(summon).unwrap().master(), Some(master));
    assert_eq!(world.master_of(summon), None);
}

#[test]
fn test_despawned_summon_leaves_master_list() {
    let mut world = World::new();
    let master = world.spawn(CreatureTemplate::player("Druid")).unwrap();
    let summon = spawn_rat(&mut world, 30);
    world.bind(master, summon).unwrap();

    world.despawn(summon).unwrap();
    assert!(world.summons_of(master).is_empty());
    assert!(world.get(master).unwrap().summons().is_empty());
    assert!(matches!(
        world.unbind(master, summon),
        Err(CreatureError::NotBound { .. })
    ));
}

#[test]
fn test_dying_summon_can_be_unbound_before_reaping() {
    let mut world = World::new();
    let master = world.spawn(CreatureTemplate::player("Druid")).unwrap();
    let summon = spawn_rat(&mut world, 30);
    world.bind(master, summon).unwrap();

    world.get_mut(summon).unwrap().change_health(-30);
    assert!(world.summons_of(master).is_empty());
    assert_eq!(world.get(master).unwrap().summons(), &[summon]);

    world.unbind(master, summon).unwrap();
    assert!(world.get(master).unwrap().summons().is_empty());
}

#[test]
fn test_repeated_summoning_does_not_accumulate() {
    let mut world = World::new();
    let master = world.spawn(CreatureTemplate::player("Druid")).unwrap();

    for _ in 0..100 {
        let summon = spawn_rat(&mut world, 5);
        world.bind(master, summon).unwrap();
        let report = world.attack(Some(master), summon, DamageType::Physical, 50).unwrap();
        assert!(report.killed);
    }

    assert!(world.summons_of(master).is_empty());
    assert!(world.get(master).unwrap().summons().is_empty());
}

#[test]
fn test_duplicate_player_names_keep_live_entry() {
    let mut world = World::new();
    let first = world.spawn(CreatureTemplate::player("Knight")).unwrap();
    let second = world.spawn(CreatureTemplate::player("Knight")).unwrap();
    assert_eq!(world.registry().player_by_name("knight"), Some(second));

    world.despawn(first).unwrap();
    assert_eq!(world.registry().player_by_name("Knight"), Some(second));
    assert_eq!(world.registry().player_count(), 1);

    world.despawn(second).unwrap();
    assert_eq!(world.registry().player_by_name("knight"), None);
    assert_eq!(world.registry().player_count(), 0);
}

#[test]
fn test_step_at_world_start_blocks_next_step() {
    let mut world = World::new();
    let knight = world.spawn(CreatureTemplate::player("Knight")).unwrap();
    world
        .move_creature(knight, Position::new(1, 0, 7), Direction::East)
        .unwrap();

    let creature = world.get(knight).unwrap();
    assert_eq!(creature.last_move(), Some(0));
    assert_eq!(creature.sleep_ticks(0, &UniformTerrain(220)), 1000);
}

#[test]
fn test_speed_follows_level() {
    let mut world = World::new();
    let low = world.spawn(CreatureTemplate::player("Low")).unwrap();
    let high = world.spawn(CreatureTemplate::player("High").with_level(50)).unwrap();

    assert_eq!(world.get(low).unwrap().speed(), 220);
    assert_eq!(world.get(high).unwrap().speed(), 318);

    let creature = world.get_mut(low).unwrap();
    creature.set_level(50);
    assert_eq!(creature.speed(), 318);
    assert_eq!(creature.step_duration(&UniformTerrain(159)), 500);
}

#[test]
fn test_immune_damage_leaves_health_unchanged() {
    let mut world = World::new();
    let slime = world
        .spawn(
            CreatureTemplate::monster(MonsterState::new("Slime"))
                .with_vitals(50, 0)
                .immune_to(DamageType::Poison),
        )
        .unwrap();

    for amount in [1, 49, 50, 10_000, i32::MAX] {
        let report = world.attack(None, slime, DamageType::Poison, amount).unwrap();
        assert!(report.is_none());
    }
    let creature = world.get(slime).unwrap();
    assert_eq!(creature.health(), 50);
    assert!(!creature.has_condition(ConditionType::InFight));
}

#[test]
fn test_ids_unique_and_decodable() {
    let mut world = World::new();
    let mut spawned = Vec::new();
    for i in 0..90 {
        let template = match i % 3 {
            0 => CreatureTemplate::player(format!("Player{i}")),
            1 => CreatureTemplate::monster(MonsterState::new("Rat")),
            _ => CreatureTemplate::npc(format!("Npc{i}")),
        };
        let expected = match i % 3 {
            0 => CreatureKind::Player,
            1 => CreatureKind::Monster,
            _ => CreatureKind::Npc,
        };
        spawned.push((world.spawn(template).unwrap(), expected));
    }

    let unique: HashSet<CreatureId> = spawned.iter().map(|(id, _)| *id).collect();
    assert_eq!(unique.len(), 90);
    for (id, expected) in spawned {
        assert_eq!(CreatureKind::of(id), Some(expected));
    }
}

#[test]
fn test_operations_on_missing_creature_fail() {
    let mut world = World::new();
    let ghost = CreatureId(0x4000_ffff);
    assert!(matches!(
        world.attack(None, ghost, DamageType::Physical, 1),
        Err(CreatureError::CreatureNotFound(_))
    ));
    assert!(world.set_attacked_creature(ghost, None).is_err());
    assert_eq!(world.attacked_creature(ghost), None);
}

#[test]
fn test_observer_failures_do_not_stop_broadcast() {
    let mut world = World::new();
    let npc = world.spawn(CreatureTemplate::npc("Sam")).unwrap();
    let listener = world.spawn(CreatureTemplate::player("Listener")).unwrap();
    let speaker = world.spawn(CreatureTemplate::player("Speaker")).unwrap();

    let failures = world.broadcast(&WorldEvent::CreatureSay {
        creature: speaker,
        class: SpeakClass::Yell,
        text: String::new(),
    });
    assert_eq!(failures, 1);
    assert!(world.get(npc).unwrap().as_npc().unwrap().last_speaker.is_none());
    assert_eq!(world.get(listener).unwrap().as_player().unwrap().heard().count(), 1);

    world.say(speaker, SpeakClass::Say, "trade").unwrap();
    assert_eq!(
        world.get(npc).unwrap().as_npc().unwrap().last_speaker,
        Some((speaker, "trade".to_string()))
    );
}

#[test]
fn test_players_track_known_creatures() {
    let mut world = World::new();
    let player = world.spawn(CreatureTemplate::player("Knight")).unwrap();
    let rat = spawn_rat(&mut world, 10);
    assert!(world.get(player).unwrap().as_player().unwrap().knows(rat));

    world.attack(Some(player), rat, DamageType::Physical, 10).unwrap();
    assert!(!world.get(player).unwrap().as_player().unwrap().knows(rat));
}
