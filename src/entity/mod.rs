pub mod appearance;
pub mod conditions;
pub mod creature;
pub mod identity;
pub mod kind;
pub mod movement;
pub mod observer;

pub use appearance::{LightInfo, Outfit};
pub use conditions::{Condition, ConditionEffect, ConditionType};
pub use creature::{Creature, CreatureSnapshot, CreatureTemplate};
pub use identity::{CreatureKind, IdAllocator};
pub use kind::{CreatureBehavior, KindState, MonsterState, NpcState, PlayerState, Race};
pub use movement::{TerrainCost, UniformTerrain};
pub use observer::{CreatureObserver, ItemId, SpeakClass, WorldEvent};
