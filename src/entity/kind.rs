//! Concrete creature kinds and their capability surface
//!
//! `KindState` is the closed variant over players, monsters and npcs. The
//! shared `Creature` record holds one and dispatches kind-specific behavior
//! through [`CreatureBehavior`] and [`CreatureObserver`].

use crate::core::error::{CreatureError, Result};
use crate::core::types::{CreatureId, Tick};
use crate::ecs::world::KindRegistry;
use crate::entity::identity::CreatureKind;
use crate::entity::observer::{CreatureObserver, SpeakClass};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Blood/body type, drives splash and corpse effects downstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    #[default]
    None,
    Venom,
    Blood,
    Undead,
    Fire,
}

/// Capabilities every creature kind provides
#[allow(unused_variables)]
pub trait CreatureBehavior {
    fn kind(&self) -> CreatureKind;
    fn name(&self) -> &str;
    fn name_description(&self) -> String;

    /// World-level bookkeeping when the creature enters the registry
    fn add_to_registry(&mut self, id: CreatureId, registry: &mut KindRegistry);
    /// World-level bookkeeping when the creature leaves the registry
    fn remove_from_registry(&mut self, id: CreatureId, registry: &mut KindRegistry);

    fn throw_range(&self) -> u32 {
        1
    }

    fn is_pushable(&self) -> bool {
        true
    }

    fn is_attackable(&self) -> bool {
        true
    }

    fn armor(&self) -> i32 {
        0
    }

    fn defense(&self) -> i32 {
        0
    }

    fn race(&self) -> Race {
        Race::None
    }

    /// Think cadence override; `None` keeps the base cadence
    fn think_interval(&self) -> Option<Tick> {
        None
    }

    /// Called once from the death transition
    fn on_death(&mut self, killer: Option<CreatureId>) {}
}

const MAX_HEARD_MESSAGES: usize = 32;

/// A message a player heard from another creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeardMessage {
    pub speaker: CreatureId,
    pub class: SpeakClass,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub name: String,
    pub online: bool,
    pub deaths: u32,
    pub last_killer: Option<CreatureId>,
    known_creatures: AHashSet<CreatureId>,
    heard: VecDeque<HeardMessage>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn knows(&self, creature: CreatureId) -> bool {
        self.known_creatures.contains(&creature)
    }

    pub fn known_count(&self) -> usize {
        self.known_creatures.len()
    }

    pub fn heard(&self) -> impl Iterator<Item = &HeardMessage> {
        self.heard.iter()
    }
}

impl CreatureBehavior for PlayerState {
    fn kind(&self) -> CreatureKind {
        CreatureKind::Player
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn name_description(&self) -> String {
        self.name.clone()
    }

    fn add_to_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        registry.players.insert(self.name.to_lowercase(), id);
        self.online = true;
    }

    fn remove_from_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        let key = self.name.to_lowercase();
        // A later login under the same name owns the entry now
        if registry.players.get(&key) == Some(&id) {
            registry.players.remove(&key);
        }
        self.online = false;
    }

    fn throw_range(&self) -> u32 {
        2
    }

    fn race(&self) -> Race {
        Race::Blood
    }

    fn on_death(&mut self, killer: Option<CreatureId>) {
        self.deaths += 1;
        self.last_killer = killer;
    }
}

impl CreatureObserver for PlayerState {
    fn on_creature_appear(&mut self, creature: CreatureId, _is_login: bool) -> Result<()> {
        self.known_creatures.insert(creature);
        Ok(())
    }

    fn on_creature_disappear(&mut self, creature: CreatureId, _stack_pos: u32, _is_logout: bool) -> Result<()> {
        self.known_creatures.remove(&creature);
        Ok(())
    }

    fn on_creature_say(&mut self, creature: CreatureId, class: SpeakClass, text: &str) -> Result<()> {
        if self.heard.len() >= MAX_HEARD_MESSAGES {
            self.heard.pop_front();
        }
        self.heard.push_back(HeardMessage {
            speaker: creature,
            class,
            text: text.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MonsterState {
    pub name: String,
    /// Article-prefixed name, e.g. "a rat"
    pub description: String,
    pub race: Race,
    pub armor: i32,
    pub defense: i32,
    pub think_interval: Option<Tick>,
    pub killer: Option<CreatureId>,
    /// Players currently in view, in order of appearance
    pub players_in_view: Vec<CreatureId>,
}

impl MonsterState {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("{} {}", article_for(&name), name.to_lowercase());
        Self {
            name,
            description,
            ..Self::default()
        }
    }

    pub fn with_race(mut self, race: Race) -> Self {
        self.race = race;
        self
    }

    pub fn with_protection(mut self, armor: i32, defense: i32) -> Self {
        self.armor = armor;
        self.defense = defense;
        self
    }
}

fn article_for(name: &str) -> &'static str {
    match name.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

impl CreatureBehavior for MonsterState {
    fn kind(&self) -> CreatureKind {
        CreatureKind::Monster
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn name_description(&self) -> String {
        self.description.clone()
    }

    fn add_to_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        registry.monsters.push(id);
    }

    fn remove_from_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        registry.monsters.retain(|&m| m != id);
    }

    fn armor(&self) -> i32 {
        self.armor
    }

    fn defense(&self) -> i32 {
        self.defense
    }

    fn race(&self) -> Race {
        self.race
    }

    fn think_interval(&self) -> Option<Tick> {
        self.think_interval
    }

    fn on_death(&mut self, killer: Option<CreatureId>) {
        self.killer = killer;
    }
}

impl CreatureObserver for MonsterState {
    fn on_creature_appear(&mut self, creature: CreatureId, _is_login: bool) -> Result<()> {
        if CreatureKind::of(creature) == Some(CreatureKind::Player) && !self.players_in_view.contains(&creature) {
            self.players_in_view.push(creature);
        }
        Ok(())
    }

    fn on_creature_disappear(&mut self, creature: CreatureId, _stack_pos: u32, _is_logout: bool) -> Result<()> {
        self.players_in_view.retain(|&p| p != creature);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NpcState {
    pub name: String,
    pub think_interval: Option<Tick>,
    /// Last creature that talked to this npc, and what it said
    pub last_speaker: Option<(CreatureId, String)>,
}

impl NpcState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl CreatureBehavior for NpcState {
    fn kind(&self) -> CreatureKind {
        CreatureKind::Npc
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn name_description(&self) -> String {
        self.name.clone()
    }

    fn add_to_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        registry.npcs.push(id);
    }

    fn remove_from_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        registry.npcs.retain(|&n| n != id);
    }

    fn is_pushable(&self) -> bool {
        false
    }

    fn is_attackable(&self) -> bool {
        false
    }

    fn think_interval(&self) -> Option<Tick> {
        self.think_interval
    }
}

impl CreatureObserver for NpcState {
    fn on_creature_say(&mut self, creature: CreatureId, _class: SpeakClass, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(CreatureError::Observer(format!(
                "{} received an empty message from {}",
                self.name, creature
            )));
        }
        self.last_speaker = Some((creature, text.to_string()));
        Ok(())
    }

    fn on_creature_disappear(&mut self, creature: CreatureId, _stack_pos: u32, _is_logout: bool) -> Result<()> {
        if self.last_speaker.as_ref().is_some_and(|(speaker, _)| *speaker == creature) {
            self.last_speaker = None;
        }
        Ok(())
    }
}

/// Closed variant over the concrete creature kinds
#[derive(Debug, Clone)]
pub enum KindState {
    Player(PlayerState),
    Monster(MonsterState),
    Npc(NpcState),
}

impl KindState {
    fn behavior(&self) -> &dyn CreatureBehavior {
        match self {
            KindState::Player(p) => p,
            KindState::Monster(m) => m,
            KindState::Npc(n) => n,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn CreatureBehavior {
        match self {
            KindState::Player(p) => p,
            KindState::Monster(m) => m,
            KindState::Npc(n) => n,
        }
    }

    pub fn observer_mut(&mut self) -> &mut dyn CreatureObserver {
        match self {
            KindState::Player(p) => p,
            KindState::Monster(m) => m,
            KindState::Npc(n) => n,
        }
    }
}

impl CreatureBehavior for KindState {
    fn kind(&self) -> CreatureKind {
        self.behavior().kind()
    }

    fn name(&self) -> &str {
        self.behavior().name()
    }

    fn name_description(&self) -> String {
        self.behavior().name_description()
    }

    fn add_to_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        self.behavior_mut().add_to_registry(id, registry)
    }

    fn remove_from_registry(&mut self, id: CreatureId, registry: &mut KindRegistry) {
        self.behavior_mut().remove_from_registry(id, registry)
    }

    fn throw_range(&self) -> u32 {
        self.behavior().throw_range()
    }

    fn is_pushable(&self) -> bool {
        self.behavior().is_pushable()
    }

    fn is_attackable(&self) -> bool {
        self.behavior().is_attackable()
    }

    fn armor(&self) -> i32 {
        self.behavior().armor()
    }

    fn defense(&self) -> i32 {
        self.behavior().defense()
    }

    fn race(&self) -> Race {
        self.behavior().race()
    }

    fn think_interval(&self) -> Option<Tick> {
        self.behavior().think_interval()
    }

    fn on_death(&mut self, killer: Option<CreatureId>) {
        self.behavior_mut().on_death(killer)
    }
}
