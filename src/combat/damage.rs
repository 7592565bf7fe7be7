//! Damage types and immunity masks

use serde::{Deserialize, Serialize};

/// Category of damage; each variant is one bit of an immunity mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum DamageType {
    Physical = 1,
    Poison = 2,
    Fire = 4,
    Energy = 8,
    LifeDrain = 16,
    ManaDrain = 32,
}

impl DamageType {
    pub fn all() -> [DamageType; 6] {
        [
            DamageType::Physical,
            DamageType::Poison,
            DamageType::Fire,
            DamageType::Energy,
            DamageType::LifeDrain,
            DamageType::ManaDrain,
        ]
    }

    pub fn bit(&self) -> u32 {
        *self as u32
    }
}

/// Set of damage types a creature cannot be harmed by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Immunities(u32);

impl Immunities {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn with(mut self, damage_type: DamageType) -> Self {
        self.insert(damage_type);
        self
    }

    pub fn insert(&mut self, damage_type: DamageType) {
        self.0 |= damage_type.bit();
    }

    pub fn remove(&mut self, damage_type: DamageType) {
        self.0 &= !damage_type.bit();
    }

    pub fn contains(&self, damage_type: DamageType) -> bool {
        self.0 & damage_type.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<DamageType> for Immunities {
    fn from_iter<I: IntoIterator<Item = DamageType>>(iter: I) -> Self {
        iter.into_iter().fold(Immunities::none(), Immunities::with)
    }
}

/// Outcome of a combat-facing drain
///
/// Immune or zero-amount drains report all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Health actually lost after clamping
    pub health: i32,
    /// Mana actually lost (mana drain or mana shield absorption)
    pub mana: i32,
    /// This drain triggered the death transition
    pub killed: bool,
}

impl DamageReport {
    pub fn is_none(&self) -> bool {
        self.health == 0 && self.mana == 0
    }

    pub fn total(&self) -> i32 {
        self.health + self.mana
    }
}
