//! Creature identity: kinds, id ranges, and the injected id allocator
//!
//! Every id is `counter | kind_range`. The counter never reaches the lowest
//! range bit, so the numeric range alone tells which kind an id belongs to.

use crate::core::error::{CreatureError, Result};
use crate::core::types::CreatureId;
use serde::{Deserialize, Serialize};

pub const PLAYER_ID_RANGE: u32 = 0x1000_0000;
pub const MONSTER_ID_RANGE: u32 = 0x4000_0000;
pub const NPC_ID_RANGE: u32 = 0x8000_0000;

/// Counter values must stay strictly below this
pub const MAX_COUNTER: u32 = PLAYER_ID_RANGE;

/// First counter value handed out by a fresh allocator
pub const FIRST_COUNTER: u32 = 1000;

/// Closed set of creature kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Player,
    Monster,
    Npc,
}

impl CreatureKind {
    /// Fixed numeric offset distinguishing this kind within the id space
    pub fn id_range(&self) -> u32 {
        match self {
            CreatureKind::Player => PLAYER_ID_RANGE,
            CreatureKind::Monster => MONSTER_ID_RANGE,
            CreatureKind::Npc => NPC_ID_RANGE,
        }
    }

    /// Decode the kind from an id's numeric range
    pub fn of(id: CreatureId) -> Option<CreatureKind> {
        let raw = id.raw();
        if raw >= NPC_ID_RANGE {
            Some(CreatureKind::Npc)
        } else if raw >= MONSTER_ID_RANGE {
            Some(CreatureKind::Monster)
        } else if raw >= PLAYER_ID_RANGE {
            Some(CreatureKind::Player)
        } else {
            None
        }
    }
}

/// Hands out creature ids for one world
///
/// Owned by the world and injected at spawn time; allocation is
/// deterministic for a given starting counter.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_at(FIRST_COUNTER)
    }

    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Allocate the next id for `kind`
    ///
    /// The counter is shared across kinds, so the low bits are unique
    /// world-wide, not just per kind.
    pub fn allocate(&mut self, kind: CreatureKind) -> Result<CreatureId> {
        if self.next >= MAX_COUNTER {
            return Err(CreatureError::IdSpaceExhausted(kind));
        }
        let id = CreatureId(self.next | kind.id_range());
        self.next += 1;
        Ok(id)
    }

    pub fn peek_counter(&self) -> u32 {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
