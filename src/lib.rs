//! Creature Core - runtime state model for every animate actor in the world

pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;

pub use crate::core::error::{CreatureError, Result};
pub use crate::core::types::{CreatureId, Direction, Position, Tick};
pub use crate::ecs::world::World;
pub use crate::entity::creature::Creature;
