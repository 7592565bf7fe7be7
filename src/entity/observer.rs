//! World-notification protocol: the creature's half
//!
//! The world broadcasts [`WorldEvent`]s to every live creature. Hooks
//! default to no-ops and report failures as errors, which the broadcaster
//! logs without aborting the loop.

use crate::core::error::Result;
use crate::core::types::{CreatureId, Position};
use crate::entity::appearance::Outfit;
use serde::{Deserialize, Serialize};

/// Item type id supplied by the item collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakClass {
    Say,
    Whisper,
    Yell,
}

/// Something that happened in the world that creatures may react to
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    CreatureAppear {
        creature: CreatureId,
        is_login: bool,
    },
    CreatureDisappear {
        creature: CreatureId,
        stack_pos: u32,
        is_logout: bool,
    },
    CreatureMove {
        creature: CreatureId,
        old_pos: Position,
        new_pos: Position,
        old_stack_pos: u32,
        teleport: bool,
    },
    CreatureTurn {
        creature: CreatureId,
        stack_pos: u32,
    },
    CreatureSay {
        creature: CreatureId,
        class: SpeakClass,
        text: String,
    },
    CreatureChangeOutfit {
        creature: CreatureId,
        outfit: Outfit,
    },
    AddTileItem {
        pos: Position,
        item: ItemId,
    },
    UpdateTileItem {
        pos: Position,
        stack_pos: u32,
        old_item: ItemId,
        new_item: ItemId,
    },
    RemoveTileItem {
        pos: Position,
        stack_pos: u32,
        item: ItemId,
    },
    UpdateTile {
        pos: Position,
    },
}

impl WorldEvent {
    /// The creature this event is about, if any
    pub fn subject(&self) -> Option<CreatureId> {
        match self {
            WorldEvent::CreatureAppear { creature, .. }
            | WorldEvent::CreatureDisappear { creature, .. }
            | WorldEvent::CreatureMove { creature, .. }
            | WorldEvent::CreatureTurn { creature, .. }
            | WorldEvent::CreatureSay { creature, .. }
            | WorldEvent::CreatureChangeOutfit { creature, .. } => Some(*creature),
            WorldEvent::AddTileItem { .. }
            | WorldEvent::UpdateTileItem { .. }
            | WorldEvent::RemoveTileItem { .. }
            | WorldEvent::UpdateTile { .. } => None,
        }
    }

    /// Route this event to the matching hook
    pub fn dispatch_to<O: CreatureObserver + ?Sized>(&self, observer: &mut O) -> Result<()> {
        match self {
            WorldEvent::CreatureAppear { creature, is_login } => {
                observer.on_creature_appear(*creature, *is_login)
            }
            WorldEvent::CreatureDisappear { creature, stack_pos, is_logout } => {
                observer.on_creature_disappear(*creature, *stack_pos, *is_logout)
            }
            WorldEvent::CreatureMove { creature, old_pos, new_pos, old_stack_pos, teleport } => {
                observer.on_creature_move(*creature, *old_pos, *new_pos, *old_stack_pos, *teleport)
            }
            WorldEvent::CreatureTurn { creature, stack_pos } => {
                observer.on_creature_turn(*creature, *stack_pos)
            }
            WorldEvent::CreatureSay { creature, class, text } => {
                observer.on_creature_say(*creature, *class, text)
            }
            WorldEvent::CreatureChangeOutfit { creature, outfit } => {
                observer.on_creature_change_outfit(*creature, *outfit)
            }
            WorldEvent::AddTileItem { pos, item } => observer.on_add_tile_item(*pos, *item),
            WorldEvent::UpdateTileItem { pos, stack_pos, old_item, new_item } => {
                observer.on_update_tile_item(*pos, *stack_pos, *old_item, *new_item)
            }
            WorldEvent::RemoveTileItem { pos, stack_pos, item } => {
                observer.on_remove_tile_item(*pos, *stack_pos, *item)
            }
            WorldEvent::UpdateTile { pos } => observer.on_update_tile(*pos),
        }
    }
}

/// Hooks invoked by the world; every default is a no-op
#[allow(unused_variables)]
pub trait CreatureObserver {
    fn on_creature_appear(&mut self, creature: CreatureId, is_login: bool) -> Result<()> {
        Ok(())
    }

    fn on_creature_disappear(&mut self, creature: CreatureId, stack_pos: u32, is_logout: bool) -> Result<()> {
        Ok(())
    }

    fn on_creature_move(
        &mut self,
        creature: CreatureId,
        old_pos: Position,
        new_pos: Position,
        old_stack_pos: u32,
        teleport: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn on_creature_turn(&mut self, creature: CreatureId, stack_pos: u32) -> Result<()> {
        Ok(())
    }

    fn on_creature_say(&mut self, creature: CreatureId, class: SpeakClass, text: &str) -> Result<()> {
        Ok(())
    }

    fn on_creature_change_outfit(&mut self, creature: CreatureId, outfit: Outfit) -> Result<()> {
        Ok(())
    }

    fn on_add_tile_item(&mut self, pos: Position, item: ItemId) -> Result<()> {
        Ok(())
    }

    fn on_update_tile_item(
        &mut self,
        pos: Position,
        stack_pos: u32,
        old_item: ItemId,
        new_item: ItemId,
    ) -> Result<()> {
        Ok(())
    }

    fn on_remove_tile_item(&mut self, pos: Position, stack_pos: u32, item: ItemId) -> Result<()> {
        Ok(())
    }

    fn on_update_tile(&mut self, pos: Position) -> Result<()> {
        Ok(())
    }
}
