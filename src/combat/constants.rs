//! Combat and progression constants - compatibility-fixed values in one place
//!
//! Other systems (movement scheduler, leveling, saved characters) depend on
//! these exact numbers, so they are not exposed through config.

// Speed formula: BASE_SPEED + SPEED_PER_LEVEL * (level - 1)
pub const BASE_SPEED: i32 = 220;
pub const SPEED_PER_LEVEL: i32 = 2;

// Step duration: STEP_DURATION_SCALE * ground_speed / speed
pub const STEP_DURATION_SCALE: i64 = 1000;

// Think cadence reported by the base creature
pub const BASE_THINK_INTERVAL: u64 = 300;

// Both sides of a damaging exchange stay flagged in-fight this long
pub const IN_FIGHT_TICKS: u64 = 60_000;

/// Experience required to reach `level`
///
/// Every division truncates independently; saved characters and
/// balancing tables depend on this exact shape. Returns `None` once the
/// result no longer fits in an `i64` (around level 570 000).
pub fn experience_for_level(level: i64) -> Option<i64> {
    let squared = level.checked_mul(level)?;
    let cubic = squared.checked_mul(level)?.checked_mul(50)? / 3;
    let quadratic = squared.checked_mul(100)?;
    let linear = level.checked_mul(850)? / 3;
    cubic.checked_sub(quadratic)?.checked_add(linear)?.checked_sub(200)
}

/// Normal walking speed for a creature of the given level
pub fn normal_speed_for_level(level: i32) -> i32 {
    BASE_SPEED.saturating_add(SPEED_PER_LEVEL.saturating_mul(level.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_reference_values() {
        assert_eq!(experience_for_level(1), Some(-1));
        assert_eq!(experience_for_level(2), Some(99));
        assert_eq!(experience_for_level(8), Some(4199));
        assert_eq!(experience_for_level(50), Some(1_847_299));
        assert_eq!(experience_for_level(100), Some(15_694_799));
    }

    #[test]
    fn test_experience_strictly_increasing_from_level_two() {
        let mut previous = experience_for_level(2).unwrap();
        for level in 3..=200 {
            let current = experience_for_level(level).unwrap();
            assert!(current > previous, "level {level} did not increase");
            previous = current;
        }
    }

    #[test]
    fn test_normal_speed() {
        assert_eq!(normal_speed_for_level(1), 220);
        assert_eq!(normal_speed_for_level(50), 318);
    }

    #[test]
    fn test_experience_overflow_is_none() {
        assert!(experience_for_level(500_000).is_some());
        assert_eq!(experience_for_level(600_000), None);
        assert_eq!(experience_for_level(i64::MAX), None);
    }

    #[test]
    fn test_normal_speed_saturates() {
        assert_eq!(normal_speed_for_level(i32::MAX), i32::MAX);
        assert_eq!(normal_speed_for_level(i32::MIN), i32::MIN + BASE_SPEED);
    }
}
