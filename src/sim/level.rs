//! Level table and difficulty curves
//!
//! Each level is a timed coin-collection challenge. Difficulty ramps two ways:
//! spawn frequency rises with time spent in the current level, and fall speed
//! rises with both the level index and time.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What the player trades their coins for at the end of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardKind {
    Can,
    RationBox,
    RescueFlare,
}

impl RewardKind {
    pub fn name(&self) -> &'static str {
        match self {
            RewardKind::Can => "can",
            RewardKind::RationBox => "ration box",
            RewardKind::RescueFlare => "rescue flare",
        }
    }
}

/// A timed coin goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub coins_required: u32,
    pub time_seconds: u32,
    pub reward: RewardKind,
}

impl Level {
    /// Level duration in simulation ticks
    pub fn duration_ticks(&self) -> u32 {
        self.time_seconds * TICKS_PER_SECOND
    }
}

/// The campaign, in order
pub const LEVELS: &[Level] = &[
    Level {
        coins_required: 20,
        time_seconds: 60,
        reward: RewardKind::Can,
    },
    Level {
        coins_required: 30,
        time_seconds: 75,
        reward: RewardKind::RationBox,
    },
    Level {
        coins_required: 45,
        time_seconds: 90,
        reward: RewardKind::RescueFlare,
    },
];

/// Look up a level by index
pub fn level(index: u32) -> Option<&'static Level> {
    LEVELS.get(index as usize)
}

/// Whether `index` is the final level of the campaign
pub fn is_last_level(index: u32) -> bool {
    index as usize + 1 >= LEVELS.len()
}

/// Spawn roll denominator after `elapsed_secs` in the current level
///
/// A drop spawns on a tick when a roll in `1..=interval` comes up 1.
pub fn spawn_interval(elapsed_secs: f32) -> u32 {
    let decrease = (elapsed_secs / 60.0) * DROP_SPAWN_DECREASE_PER_MIN;
    let interval = (DROP_SPAWN_INTERVAL_BASE as f32 - decrease).floor();
    if interval <= DROP_SPAWN_INTERVAL_MIN as f32 {
        DROP_SPAWN_INTERVAL_MIN
    } else {
        interval as u32
    }
}

/// Fall speed multiplier for a level index (level 0 -> 1.0)
pub fn level_speed_multiplier(index: u32) -> f32 {
    1.0 + index as f32 * LEVEL_SPEED_INCREASE_PER_LEVEL
}

/// Fall speed multiplier for time spent in the current level
pub fn time_speed_multiplier(elapsed_secs: f32) -> f32 {
    1.0 + (elapsed_secs.max(0.0) / 60.0) * DROP_SPEED_INCREASE_PER_MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_get_harder() {
        for pair in LEVELS.windows(2) {
            assert!(pair[1].coins_required > pair[0].coins_required);
        }
        assert_eq!(LEVELS[0].coins_required, 20);
        assert_eq!(LEVELS[0].reward, RewardKind::Can);
    }

    #[test]
    fn test_level_lookup() {
        assert!(level(0).is_some());
        assert!(level(LEVELS.len() as u32).is_none());
        assert!(!is_last_level(0));
        assert!(is_last_level(LEVELS.len() as u32 - 1));
    }

    #[test]
    fn test_spawn_interval_ramps_down_to_min() {
        assert_eq!(spawn_interval(0.0), DROP_SPAWN_INTERVAL_BASE);
        // 20 per minute: after 30s the interval drops by 10
        assert_eq!(spawn_interval(30.0), DROP_SPAWN_INTERVAL_BASE - 10);
        assert_eq!(spawn_interval(600.0), DROP_SPAWN_INTERVAL_MIN);
    }

    #[test]
    fn test_speed_multipliers() {
        assert_eq!(level_speed_multiplier(0), 1.0);
        assert!((level_speed_multiplier(2) - 1.3).abs() < 1e-6);
        assert_eq!(time_speed_multiplier(0.0), 1.0);
        assert!((time_speed_multiplier(60.0) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_duration_ticks() {
        assert_eq!(LEVELS[0].duration_ticks(), 60 * TICKS_PER_SECOND);
    }
}
