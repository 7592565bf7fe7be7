//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for creatures
///
/// The numeric range of the id encodes the creature kind, see
/// [`crate::entity::identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl CreatureId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Tile coordinate in the world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u16,
    pub y: u16,
    pub z: u8,
}

impl Position {
    pub fn new(x: u16, y: u16, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance on the same floor, `None` across floors
    pub fn distance(&self, other: &Self) -> Option<u16> {
        if self.z != other.z {
            return None;
        }
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        Some(dx.max(dy))
    }
}

/// Facing direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    #[default]
    South = 2,
    West = 3,
    SouthWest = 4,
    SouthEast = 5,
    NorthWest = 6,
    NorthEast = 7,
}

impl Direction {
    pub fn is_diagonal(&self) -> bool {
        (*self as u8) >= 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_floor() {
        let a = Position::new(100, 100, 7);
        let b = Position::new(103, 98, 7);
        assert_eq!(a.distance(&b), Some(3));
    }

    #[test]
    fn test_distance_other_floor() {
        let a = Position::new(100, 100, 7);
        let b = Position::new(100, 100, 6);
        assert_eq!(a.distance(&b), None);
    }

    #[test]
    fn test_diagonal_directions() {
        assert!(!Direction::North.is_diagonal());
        assert!(!Direction::West.is_diagonal());
        assert!(Direction::SouthWest.is_diagonal());
        assert!(Direction::NorthEast.is_diagonal());
    }

    #[test]
    fn test_creature_id_display() {
        assert_eq!(CreatureId(0x4000_03e8).to_string(), "0x400003e8");
    }
}
