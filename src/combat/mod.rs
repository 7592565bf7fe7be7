pub mod constants;
pub mod damage;
pub mod vitals;

pub use constants::{experience_for_level, normal_speed_for_level};
pub use damage::{DamageReport, DamageType, Immunities};
