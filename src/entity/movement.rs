//! Speed, step timing and think cadence
//!
//! A creature never schedules itself. The world's scheduler polls these
//! values to decide when the next step or think is due.

use crate::combat::constants::{normal_speed_for_level, BASE_THINK_INTERVAL, STEP_DURATION_SCALE};
use crate::core::config::config;
use crate::core::types::{Direction, Position, Tick};
use crate::entity::creature::Creature;
use crate::entity::kind::CreatureBehavior;

/// Terrain cost supplied by the map collaborator
pub trait TerrainCost {
    /// Ground walking cost at `position`, `None` when unknown
    fn ground_speed(&self, position: Position) -> Option<u16>;
}

impl<F> TerrainCost for F
where
    F: Fn(Position) -> Option<u16>,
{
    fn ground_speed(&self, position: Position) -> Option<u16> {
        self(position)
    }
}

/// Same ground cost everywhere
#[derive(Debug, Clone, Copy)]
pub struct UniformTerrain(pub u16);

impl TerrainCost for UniformTerrain {
    fn ground_speed(&self, _position: Position) -> Option<u16> {
        Some(self.0)
    }
}

impl Creature {
    pub fn speed(&self) -> u16 {
        self.speed.clamp(0, i32::from(u16::MAX)) as u16
    }

    /// Speed from level alone, ignoring active conditions
    pub fn normal_speed(&self) -> i32 {
        normal_speed_for_level(self.level)
    }

    /// Recompute speed from level plus active speed conditions
    pub fn set_normal_speed(&mut self) {
        self.speed = self.normal_speed().saturating_add(self.conditions.speed_delta()).max(0);
    }

    /// Ticks one step takes on the current tile
    pub fn step_duration<T: TerrainCost + ?Sized>(&self, terrain: &T) -> i64 {
        let fallback = config().default_step_duration;
        if self.removed || self.speed <= 0 {
            return fallback;
        }
        match terrain.ground_speed(self.position) {
            Some(ground) if ground > 0 => STEP_DURATION_SCALE * i64::from(ground) / i64::from(self.speed),
            _ => fallback,
        }
    }

    /// Ticks until the current step completes; zero or negative when free
    pub fn sleep_ticks<T: TerrainCost + ?Sized>(&self, now: Tick, terrain: &T) -> i64 {
        match self.last_move {
            Some(last_move) => last_move as i64 + self.step_duration(terrain) - now as i64,
            None => 0,
        }
    }

    /// Delay the scheduler should use before the next step event
    pub fn event_step_ticks<T: TerrainCost + ?Sized>(&self, now: Tick, terrain: &T) -> i64 {
        let sleep = self.sleep_ticks(now, terrain);
        if sleep > 0 {
            sleep
        } else {
            self.step_duration(terrain)
        }
    }

    /// Record a completed step
    pub fn move_to(&mut self, position: Position, direction: Direction, now: Tick) {
        self.position = position;
        self.direction = direction;
        self.last_move = Some(now);
    }

    /// Place without counting as a step (spawn, teleport)
    pub fn teleport_to(&mut self, position: Position) {
        self.position = position;
    }

    pub fn turn(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Tick of the last completed step, `None` before the first one
    pub fn last_move(&self) -> Option<Tick> {
        self.last_move
    }

    /// Think hook; returns the requested interval until the next think
    ///
    /// The same value is kept in [`Creature::think_ticks`].
    pub fn on_think(&mut self) -> Tick {
        let interval = self.kind.think_interval().unwrap_or(BASE_THINK_INTERVAL);
        self.think_ticks = interval;
        interval
    }

    /// Interval reported by the last `on_think`
    pub fn think_ticks(&self) -> Tick {
        self.think_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CreatureId;
    use crate::entity::conditions::Condition;
    use crate::entity::creature::CreatureTemplate;
    use crate::entity::kind::MonsterState;

    fn player() -> Creature {
        Creature::new(CreatureId(0x1000_03e8), CreatureTemplate::player("Knight"))
    }

    #[test]
    fn test_speed_formula() {
        let mut creature = player();
        assert_eq!(creature.speed(), 220);
        creature.set_level(50);
        assert_eq!(creature.speed(), 318);
        creature.set_level(i32::MAX);
        assert_eq!(creature.speed(), u16::MAX);
    }

    #[test]
    fn test_normal_speed_ignores_conditions() {
        let mut creature = player();
        creature.add_condition(Condition::haste(1000, 60));
        assert_eq!(creature.speed(), 280);
        assert_eq!(creature.normal_speed(), 220);
    }

    #[test]
    fn test_paralysis_floors_at_zero() {
        let mut creature = player();
        creature.add_condition(Condition::paralyze(1000, 500));
        assert_eq!(creature.speed(), 0);
        assert_eq!(creature.step_duration(&UniformTerrain(150)), config().default_step_duration);
    }

    #[test]
    fn test_step_duration_from_terrain() {
        let creature = player();
        assert_eq!(creature.step_duration(&UniformTerrain(110)), 500);
        assert_eq!(creature.step_duration(&UniformTerrain(220)), 1000);
        let unknown = |_: Position| -> Option<u16> { None };
        assert_eq!(creature.step_duration(&unknown), 500);
    }

    #[test]
    fn test_sleep_and_event_step_ticks() {
        let mut creature = player();
        let terrain = UniformTerrain(220);

        assert_eq!(creature.sleep_ticks(0, &terrain), 0);
        assert_eq!(creature.event_step_ticks(0, &terrain), 1000);

        creature.move_to(Position::new(101, 100, 7), Direction::East, 5000);
        assert_eq!(creature.sleep_ticks(5400, &terrain), 600);
        assert_eq!(creature.event_step_ticks(5400, &terrain), 600);
        assert_eq!(creature.event_step_ticks(7000, &terrain), 1000);
        assert_eq!(creature.direction(), Direction::East);
    }

    #[test]
    fn test_step_at_tick_zero_counts() {
        let mut creature = player();
        let terrain = UniformTerrain(220);
        assert_eq!(creature.last_move(), None);

        creature.move_to(Position::new(101, 100, 7), Direction::East, 0);
        assert_eq!(creature.last_move(), Some(0));
        assert_eq!(creature.sleep_ticks(0, &terrain), 1000);
        assert_eq!(creature.event_step_ticks(400, &terrain), 600);
    }

    #[test]
    fn test_on_think_cadence() {
        let mut creature = player();
        assert_eq!(creature.on_think(), 300);
        assert_eq!(creature.think_ticks(), 300);

        let mut rat = Creature::new(
            CreatureId(0x4000_03e9),
            CreatureTemplate::monster(MonsterState {
                think_interval: Some(750),
                ..MonsterState::new("Rat")
            }),
        );
        assert_eq!(rat.on_think(), 750);
        assert_eq!(rat.think_ticks(), 750);
    }
}
