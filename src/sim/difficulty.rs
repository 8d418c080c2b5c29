//! Time-based difficulty curve
//!
//! Three tiers over the 30-second session. Later tiers spawn more often and
//! scroll items faster.

use serde::{Deserialize, Serialize};

/// One step of the difficulty curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// Elapsed seconds at which this tier takes over
    pub time: f32,
    /// Spawn one item every `spawn_rate` frames
    pub spawn_rate: u32,
    /// Item scroll speed, pixels per frame
    pub speed: f32,
}

pub const DIFFICULTY_TIERS: [DifficultyTier; 3] = [
    DifficultyTier {
        time: 0.0,
        spawn_rate: 50,
        speed: 9.0,
    },
    DifficultyTier {
        time: 10.0,
        spawn_rate: 40,
        speed: 11.0,
    },
    DifficultyTier {
        time: 20.0,
        spawn_rate: 25,
        speed: 13.0,
    },
];

/// Highest-threshold tier reached at `elapsed` seconds
///
/// Tiers must be sorted by ascending `time`. Falls back to the first tier
/// when none has been reached.
pub fn tier_for(tiers: &[DifficultyTier], elapsed: f32) -> DifficultyTier {
    tiers
        .iter()
        .rev()
        .find(|t| elapsed >= t.time)
        .or_else(|| tiers.first())
        .copied()
        .unwrap_or(DIFFICULTY_TIERS[0])
}
