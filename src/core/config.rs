//! Creature configuration with documented defaults
//!
//! Tunable spawn defaults and scheduler cadences live here. Formula
//! constants that other systems depend on for compatibility (speed,
//! experience curve, id ranges) are fixed in code, not configurable.

use crate::core::error::{CreatureError, Result};
use crate::core::types::Tick;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Spawn defaults for one creature kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindDefaults {
    /// Starting and maximum health
    pub health_max: i32,
    /// Starting and maximum mana
    pub mana_max: i32,
    /// Starting level, drives the speed formula
    pub level: i32,
    pub magic_level: i32,
    /// Ticks between two `on_think` calls, `None` keeps the base cadence
    pub think_interval: Option<Tick>,
    /// Item type left behind on death
    pub look_corpse: u16,
}

impl Default for KindDefaults {
    fn default() -> Self {
        Self {
            health_max: 150,
            mana_max: 0,
            level: 1,
            magic_level: 0,
            think_interval: None,
            look_corpse: 0,
        }
    }
}

/// Configuration for creature runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    /// Step duration used when terrain cost is unknown
    ///
    /// Also the fallback when speed has been driven to zero by a
    /// paralysis effect.
    pub default_step_duration: i64,

    pub player: KindDefaults,
    pub monster: KindDefaults,
    pub npc: KindDefaults,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            default_step_duration: 500,
            player: KindDefaults {
                health_max: 150,
                mana_max: 35,
                level: 1,
                magic_level: 0,
                think_interval: None,
                look_corpse: 3058,
            },
            monster: KindDefaults {
                health_max: 100,
                mana_max: 0,
                level: 1,
                magic_level: 0,
                think_interval: Some(500),
                look_corpse: 2806,
            },
            npc: KindDefaults {
                health_max: 100,
                mana_max: 0,
                level: 1,
                magic_level: 0,
                think_interval: Some(1000),
                look_corpse: 0,
            },
        }
    }
}

impl CreatureConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing fields keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CreatureConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.default_step_duration <= 0 {
            return Err(CreatureError::InvalidConfig(format!(
                "default_step_duration ({}) must be positive",
                self.default_step_duration
            )));
        }

        for (label, kind) in [("player", &self.player), ("monster", &self.monster), ("npc", &self.npc)] {
            if kind.think_interval == Some(0) {
                return Err(CreatureError::InvalidConfig(format!(
                    "{label}.think_interval must be positive"
                )));
            }
            if kind.health_max < 1 || kind.mana_max < 0 {
                return Err(CreatureError::InvalidConfig(format!(
                    "{label} maxima out of range (health_max {}, mana_max {})",
                    kind.health_max, kind.mana_max
                )));
            }
            if kind.level < 1 {
                return Err(CreatureError::InvalidConfig(format!(
                    "{label}.level ({}) must be at least 1",
                    kind.level
                )));
            }
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<CreatureConfig> = OnceLock::new();

/// Get the global creature config (initializes with defaults if not set)
pub fn config() -> &'static CreatureConfig {
    CONFIG.get_or_init(CreatureConfig::default)
}

/// Validate and install the global creature config (can only be called once)
pub fn set_config(config: CreatureConfig) -> Result<()> {
    config.validate()?;
    CONFIG.set(config).map_err(|_| CreatureError::ConfigAlreadySet)
}
