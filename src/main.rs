//! Creature Sim - Entry Point
//!
//! Spawns a small population, binds a summon, and drives the world tick
//! loop with seeded random combat so creature state changes can be
//! watched in the logs.

use clap::Parser;
use creature_core::combat::DamageType;
use creature_core::core::config::{set_config, CreatureConfig};
use creature_core::core::error::Result;
use creature_core::ecs::world::World;
use creature_core::entity::{
    Condition, CreatureTemplate, LightInfo, MonsterState, Outfit, Race, SpeakClass,
};
use creature_core::{CreatureId, Direction, Position};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "creature-sim", about = "Drive the creature runtime through a scripted skirmish")]
struct Args {
    /// Number of world ticks to run
    #[arg(long, default_value_t = 40)]
    ticks: u32,

    /// Simulated ticks advanced per world tick
    #[arg(long, default_value_t = 250)]
    step: u64,

    /// RNG seed for damage rolls
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Optional TOML config overriding spawn defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print final creature snapshots as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("creature_core=debug")),
        )
        .init();

    let args = Args::parse();

    if let Some(path) = &args.config {
        let config = CreatureConfig::load(path)?;
        if let Err(e) = set_config(config) {
            tracing::warn!("Ignoring {}: {}", path.display(), e);
        }
    }

    tracing::info!("Creature Sim starting (seed {})", args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut world = World::new();

    let knight = world.spawn(
        CreatureTemplate::player("Knight")
            .with_level(20)
            .with_outfit(Outfit::new(131).with_colors(78, 69, 58, 76))
            .at(Position::new(100, 100, 7)),
    )?;
    let druid = world.spawn(
        CreatureTemplate::player("Druid")
            .with_level(35)
            .with_vitals(320, 900)
            .at(Position::new(101, 100, 7)),
    )?;
    let wolf = world.spawn(
        CreatureTemplate::monster(MonsterState::new("War Wolf").with_race(Race::Blood))
            .with_vitals(140, 0)
            .at(Position::new(101, 101, 7)),
    )?;
    let monsters = [
        world.spawn(
            CreatureTemplate::monster(MonsterState::new("Orc").with_protection(10, 8))
                .with_vitals(220, 0)
                .at(Position::new(105, 103, 7)),
        )?,
        world.spawn(
            CreatureTemplate::monster(MonsterState::new("Slime").with_race(Race::Venom))
                .with_vitals(150, 0)
                .immune_to(DamageType::Poison)
                .at(Position::new(106, 102, 7)),
        )?,
        world.spawn(
            CreatureTemplate::monster(MonsterState::new("Demon Skeleton").with_race(Race::Undead))
                .with_vitals(400, 0)
                .immune_to(DamageType::LifeDrain)
                .at(Position::new(107, 104, 7)),
        )?,
    ];
    let merchant = world.spawn(CreatureTemplate::npc("Sam").at(Position::new(99, 99, 7)))?;

    world.bind(druid, wolf)?;
    if let Some(druid) = world.get_mut(druid) {
        druid.add_condition(Condition::mana_shield(8000));
        druid.add_condition(Condition::light(6000, LightInfo::new(6, 215)));
    }
    if let Some(knight) = world.get_mut(knight) {
        knight.add_condition(Condition::haste(3000, 60));
    }
    world.say(knight, SpeakClass::Say, "hi")?;

    let attackers = [knight, druid, wolf];
    for _ in 0..args.ticks {
        for &attacker in &attackers {
            run_attack(&mut world, &mut rng, attacker, &monsters)?;
        }

        let report = world.tick(args.step);
        for death in &report.deaths {
            tracing::info!("Tick {}: {} died (killer {:?})", report.tick, death.creature, death.killer);
        }

        if world.is_alive(knight) {
            let dir = if rng.gen_bool(0.5) { Direction::East } else { Direction::West };
            let pos = world.get(knight).map(|c| c.position()).unwrap_or_default();
            let x = if dir == Direction::East { pos.x.saturating_add(1) } else { pos.x.saturating_sub(1) };
            world.move_creature(knight, Position::new(x, pos.y, pos.z), dir)?;
        }

        if monsters.iter().all(|m| !world.is_alive(*m)) {
            tracing::info!("All monsters defeated at tick {}", world.current_tick);
            break;
        }
    }

    println!("\n=== CREATURE SIM ===");
    println!("Tick: {}", world.current_tick);
    for creature in world.creatures() {
        println!(
            "  {:<16} {} HP {:>4}/{:<4} MP {:>4}/{:<4} speed {:>3} target {:?} master {:?}",
            creature.name(),
            creature.id(),
            creature.health(),
            creature.max_health(),
            creature.mana(),
            creature.max_mana(),
            creature.speed(),
            world.attacked_creature(creature.id()),
            world.master_of(creature.id()),
        );
    }
    if let Some(npc) = world.get(merchant).and_then(|c| c.as_npc()) {
        println!("  {} last heard: {:?}", npc.name, npc.last_speaker);
    }

    if args.json {
        let snapshots: Vec<_> = world.creatures().map(|c| c.snapshot()).collect();
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
    }

    Ok(())
}

/// Pick a live monster, target it, and hit it with a random damage roll
fn run_attack(world: &mut World, rng: &mut ChaCha8Rng, attacker: CreatureId, monsters: &[CreatureId]) -> Result<()> {
    if !world.is_alive(attacker) {
        return Ok(());
    }

    let target = match world.attacked_creature(attacker) {
        Some(target) => target,
        None => {
            let alive: Vec<CreatureId> = monsters.iter().copied().filter(|m| world.is_alive(*m)).collect();
            if alive.is_empty() {
                return Ok(());
            }
            let target = alive[rng.gen_range(0..alive.len())];
            world.set_attacked_creature(attacker, Some(target))?;
            target
        }
    };

    let damage_type = match rng.gen_range(0..4) {
        0 => DamageType::Fire,
        1 => DamageType::Poison,
        2 => DamageType::LifeDrain,
        _ => DamageType::Physical,
    };
    let amount = rng.gen_range(5..30);
    let report = world.attack(Some(attacker), target, damage_type, amount)?;
    if report.is_none() {
        tracing::debug!("{} is immune to {:?}", target, damage_type);
    }

    if damage_type == DamageType::Poison {
        if let Some(victim) = world.get_mut(target) {
            victim.add_condition(Condition::poison(3000, 4, 1000).with_source(attacker));
        }
    }

    // Monsters hit back
    if world.is_alive(target) && rng.gen_bool(0.3) {
        world.attack(Some(target), attacker, DamageType::Physical, rng.gen_range(1..12))?;
    }
    Ok(())
}
