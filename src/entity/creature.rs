//! The creature record shared by every animate actor
//!
//! Vitals live in `combat::vitals`, conditions in `entity::conditions`,
//! timing in `entity::movement`. This file holds identity, lifecycle,
//! ownership fields, appearance and the observer entry point.

use crate::combat::damage::{DamageType, Immunities};
use crate::core::config::{config, KindDefaults};
use crate::core::error::Result;
use crate::core::types::{CreatureId, Direction, Position, Tick};
use crate::entity::appearance::{LightInfo, Outfit};
use crate::entity::conditions::ConditionList;
use crate::entity::identity::CreatureKind;
use crate::entity::kind::{CreatureBehavior, KindState, MonsterState, NpcState, PlayerState};
use crate::entity::observer::WorldEvent;
use serde::{Deserialize, Serialize};

/// Everything needed to construct a creature except its id
#[derive(Debug, Clone)]
pub struct CreatureTemplate {
    pub kind: KindState,
    pub health_max: i32,
    pub mana_max: i32,
    pub level: i32,
    pub magic_level: i32,
    pub position: Position,
    pub immunities: Immunities,
    pub outfit: Outfit,
    pub look_corpse: u16,
}

impl CreatureTemplate {
    fn from_defaults(kind: KindState, defaults: &KindDefaults) -> Self {
        Self {
            kind,
            health_max: defaults.health_max,
            mana_max: defaults.mana_max,
            level: defaults.level,
            magic_level: defaults.magic_level,
            position: Position::default(),
            immunities: Immunities::none(),
            outfit: Outfit::default(),
            look_corpse: defaults.look_corpse,
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        let defaults = &config().player;
        Self::from_defaults(KindState::Player(PlayerState::new(name)), defaults)
    }

    pub fn monster(state: MonsterState) -> Self {
        let defaults = &config().monster;
        let mut state = state;
        if state.think_interval.is_none() {
            state.think_interval = defaults.think_interval;
        }
        Self::from_defaults(KindState::Monster(state), defaults)
    }

    pub fn npc(name: impl Into<String>) -> Self {
        let defaults = &config().npc;
        let mut state = NpcState::new(name);
        state.think_interval = defaults.think_interval;
        Self::from_defaults(KindState::Npc(state), defaults)
    }

    pub fn with_vitals(mut self, health_max: i32, mana_max: i32) -> Self {
        self.health_max = health_max.max(1);
        self.mana_max = mana_max.max(0);
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn with_magic_level(mut self, magic_level: i32) -> Self {
        self.magic_level = magic_level.max(0);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn immune_to(mut self, damage_type: DamageType) -> Self {
        self.immunities.insert(damage_type);
        self
    }

    pub fn with_outfit(mut self, outfit: Outfit) -> Self {
        self.outfit = outfit;
        self
    }
}

/// One living actor: player, monster or npc
#[derive(Debug, Clone)]
pub struct Creature {
    pub(crate) id: CreatureId,
    pub(crate) kind: KindState,

    pub(crate) health: i32,
    pub(crate) health_max: i32,
    pub(crate) mana: i32,
    pub(crate) mana_max: i32,
    pub(crate) level: i32,
    pub(crate) magic_level: i32,

    pub(crate) direction: Direction,
    pub(crate) position: Position,
    pub(crate) master_position: Position,
    pub(crate) last_move: Option<Tick>,
    pub(crate) speed: i32,
    pub(crate) think_ticks: Tick,

    pub(crate) immunities: Immunities,
    pub(crate) attacked_creature: Option<CreatureId>,
    pub(crate) last_attacker: Option<CreatureId>,

    pub(crate) master: Option<CreatureId>,
    pub(crate) summons: Vec<CreatureId>,

    pub(crate) conditions: ConditionList,

    pub(crate) outfit: Outfit,
    pub(crate) look_corpse: u16,
    pub(crate) look_master: u16,
    pub(crate) light: LightInfo,

    pub(crate) dead: bool,
    pub(crate) removed: bool,
}

impl Creature {
    /// Build a creature with its one and only id
    ///
    /// Vitals start at their maxima and speed at the normal speed for
    /// the template level. Out-of-range template values are pulled to the
    /// nearest legal one.
    pub fn new(id: CreatureId, template: CreatureTemplate) -> Self {
        let health_max = template.health_max.max(1);
        let mana_max = template.mana_max.max(0);
        let mut creature = Self {
            id,
            kind: template.kind,
            health: health_max,
            health_max,
            mana: mana_max,
            mana_max,
            level: template.level.max(1),
            magic_level: template.magic_level.max(0),
            direction: Direction::default(),
            position: template.position,
            master_position: template.position,
            last_move: None,
            speed: 0,
            think_ticks: 0,
            immunities: template.immunities,
            attacked_creature: None,
            last_attacker: None,
            master: None,
            summons: Vec::new(),
            conditions: ConditionList::new(),
            outfit: template.outfit,
            look_corpse: template.look_corpse,
            look_master: template.outfit.look_type,
            light: LightInfo::default(),
            dead: false,
            removed: false,
        };
        creature.set_normal_speed();
        creature.set_normal_creature_light();
        creature
    }

    // === IDENTITY & LIFECYCLE ===

    pub fn id(&self) -> CreatureId {
        self.id
    }

    pub fn kind(&self) -> CreatureKind {
        self.kind.kind()
    }

    pub fn id_range(&self) -> u32 {
        self.kind().id_range()
    }

    pub fn state(&self) -> &KindState {
        &self.kind
    }

    pub fn state_mut(&mut self) -> &mut KindState {
        &mut self.kind
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.kind {
            KindState::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_monster(&self) -> Option<&MonsterState> {
        match &self.kind {
            KindState::Monster(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_npc(&self) -> Option<&NpcState> {
        match &self.kind {
            KindState::Npc(n) => Some(n),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn name_description(&self) -> String {
        self.kind.name_description()
    }

    /// Text shown when another creature looks at this one
    pub fn description(&self, look_distance: i32) -> String {
        match &self.kind {
            KindState::Player(_) if look_distance == -1 => "yourself.".to_string(),
            KindState::Player(p) => format!("{} (Level {}).", p.name, self.level),
            _ => format!("{}.", self.name_description()),
        }
    }

    /// Soft-delete; idempotent
    pub fn mark_removed(&mut self) {
        if !self.removed {
            tracing::debug!("Creature {} ({}) marked removed", self.id, self.name());
            self.removed = true;
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn throw_range(&self) -> u32 {
        self.kind.throw_range()
    }

    pub fn is_pushable(&self) -> bool {
        self.kind.is_pushable()
    }

    pub fn is_attackable(&self) -> bool {
        self.kind.is_attackable()
    }

    pub fn armor(&self) -> i32 {
        self.kind.armor()
    }

    pub fn defense(&self) -> i32 {
        self.kind.defense()
    }

    // === PROGRESSION ===

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Change level and recompute normal speed
    pub fn set_level(&mut self, level: i32) {
        self.level = level.max(1);
        self.set_normal_speed();
    }

    pub fn magic_level(&self) -> i32 {
        self.magic_level
    }

    pub fn set_magic_level(&mut self, magic_level: i32) {
        self.magic_level = magic_level.max(0);
    }

    // === POSITION ===

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Spawn anchor used to keep summons near their master
    pub fn master_position(&self) -> Position {
        self.master_position
    }

    pub fn set_master_position(&mut self, position: Position) {
        self.master_position = position;
    }

    // === OWNERSHIP (read side; writes go through World::bind/unbind) ===

    /// Raw master association; may name a creature that is gone
    pub fn master(&self) -> Option<CreatureId> {
        self.master
    }

    pub fn summons(&self) -> &[CreatureId] {
        &self.summons
    }

    pub fn has_summon(&self, creature: CreatureId) -> bool {
        self.summons.contains(&creature)
    }

    pub(crate) fn set_master(&mut self, master: Option<CreatureId>) {
        self.master = master;
    }

    pub(crate) fn add_summon(&mut self, creature: CreatureId) {
        if !self.summons.contains(&creature) {
            self.summons.push(creature);
        }
    }

    pub(crate) fn remove_summon(&mut self, creature: CreatureId) {
        self.summons.retain(|&s| s != creature);
    }

    // === APPEARANCE ===

    pub fn outfit(&self) -> Outfit {
        self.outfit
    }

    pub fn set_outfit(&mut self, outfit: Outfit) {
        self.outfit = outfit;
    }

    pub fn look_corpse(&self) -> u16 {
        self.look_corpse
    }

    pub fn set_look_corpse(&mut self, look_corpse: u16) {
        self.look_corpse = look_corpse;
    }

    /// Outfit the creature was spawned with
    pub fn look_master(&self) -> u16 {
        self.look_master
    }

    pub fn creature_light(&self) -> LightInfo {
        self.light
    }

    pub fn set_creature_light(&mut self, light: LightInfo) {
        self.light = light;
    }

    pub fn set_normal_creature_light(&mut self) {
        self.light = LightInfo::default();
    }

    // === OBSERVER ===

    /// Deliver a world event to this creature
    ///
    /// A disappearing combat target is cleared before the kind hook runs.
    /// Kinds do not observe events about themselves.
    pub fn notify(&mut self, event: &WorldEvent) -> Result<()> {
        if let WorldEvent::CreatureDisappear { creature, .. } = event {
            if self.attacked_creature == Some(*creature) {
                self.attacked_creature = None;
            }
        }
        if event.subject() == Some(self.id) {
            return Ok(());
        }
        event.dispatch_to(self.kind.observer_mut())
    }

    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            kind: self.kind(),
            name: self.name().to_string(),
            health: self.health,
            health_max: self.health_max,
            mana: self.mana,
            mana_max: self.mana_max,
            level: self.level,
            speed: self.speed(),
            position: self.position,
            attacked_creature: self.attacked_creature,
            master: self.master,
            summons: self.summons.clone(),
            conditions: self.conditions.iter().map(|c| c.kind()).collect(),
            removed: self.removed,
        }
    }
}

/// Serializable view of a creature for debug output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureSnapshot {
    pub id: CreatureId,
    pub kind: CreatureKind,
    pub name: String,
    pub health: i32,
    pub health_max: i32,
    pub mana: i32,
    pub mana_max: i32,
    pub level: i32,
    pub speed: u16,
    pub position: Position,
    pub attacked_creature: Option<CreatureId>,
    pub master: Option<CreatureId>,
    pub summons: Vec<CreatureId>,
    pub conditions: Vec<crate::entity::conditions::ConditionType>,
    pub removed: bool,
}
