use crate::core::types::CreatureId;
use crate::entity::identity::CreatureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreatureError {
    #[error("Creature not found: {0}")]
    CreatureNotFound(CreatureId),

    #[error("Creature already removed: {0}")]
    CreatureRemoved(CreatureId),

    #[error("Id space exhausted for {0:?}")]
    IdSpaceExhausted(CreatureKind),

    #[error("Creature {0} cannot be bound to itself")]
    SelfBinding(CreatureId),

    #[error("Binding {summon} to {master} would create a cycle")]
    BindingCycle { master: CreatureId, summon: CreatureId },

    #[error("Creature {summon} is not a summon of {master}")]
    NotBound { master: CreatureId, summon: CreatureId },

    #[error("Creature {0} is not attackable")]
    NotAttackable(CreatureId),

    #[error("Observer failure: {0}")]
    Observer(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config already initialized")]
    ConfigAlreadySet,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CreatureError>;
