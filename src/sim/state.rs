//! Session state and core simulation types
//!
//! Everything a single 30-second run mutates lives in [`GameState`]. The
//! session owns exactly one and hands it to each subsystem by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::ItemArchetype;
use super::difficulty::{DIFFICULTY_TIERS, DifficultyTier};
use crate::consts::*;
use crate::{Color, display_seconds, player_floor_y};

/// The runner
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left of the sprite box; x never changes
    pub pos: Vec2,
    /// Vertical velocity, pixels per frame (negative is up)
    pub velocity: f32,
    pub grounded: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, player_floor_y()),
            velocity: 0.0,
            grounded: true,
        }
    }
}

/// An item scrolling toward the player
#[derive(Debug, Clone)]
pub struct ActiveItem {
    pub id: u32,
    pub archetype: &'static ItemArchetype,
    /// Top-left of the box
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame, fixed at spawn
    pub speed: f32,
}

impl ActiveItem {
    /// Fully past the left edge
    pub fn is_offscreen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// How a particle is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// A "$" glyph
    Dollar,
    /// A small filled block
    Block,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
    pub color: Color,
    pub kind: ParticleKind,
}

/// Accumulated customers. Revenue is always derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    customers: u32,
}

impl Score {
    pub fn customers(&self) -> u32 {
        self.customers
    }

    pub fn revenue(&self) -> u64 {
        u64::from(self.customers) * PATIENT_VALUE
    }

    /// Apply a signed customer delta, flooring at zero
    pub fn apply(&mut self, delta: i32) {
        self.customers = self.customers.saturating_add_signed(delta);
    }

    pub fn report(&self) -> ScoreReport {
        ScoreReport {
            revenue: self.revenue(),
            customers: self.customers,
        }
    }
}

/// Read-only score copy pushed to the host surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub revenue: u64,
    pub customers: u32,
}

/// Per-session tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session length in seconds
    pub duration: f32,
    /// Sorted by ascending `time`
    pub tiers: Vec<DifficultyTier>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration: GAME_DURATION,
            tiers: DIFFICULTY_TIERS.to_vec(),
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: SessionConfig,
    pub player: Player,
    /// Active items (spawn order)
    pub items: Vec<ActiveItem>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: Score,
    /// Seconds remaining
    pub time_left: f32,
    /// Frames simulated this run; drives the spawn cadence
    pub frame_count: u64,
    /// Background scroll counter
    pub scroll_offset: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64, config: SessionConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_left: config.duration,
            config,
            player: Player::default(),
            items: Vec::new(),
            particles: Vec::new(),
            score: Score::default(),
            frame_count: 0,
            scroll_offset: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds since the run started
    pub fn elapsed(&self) -> f32 {
        self.config.duration - self.time_left
    }

    /// Seconds shown on the HUD
    pub fn seconds_left(&self) -> u32 {
        display_seconds(self.time_left)
    }

    pub fn clock_expired(&self) -> bool {
        self.time_left <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_blank() {
        let state = GameState::new(7, SessionConfig::default());
        assert_eq!(state.player, Player::default());
        assert!(state.player.grounded);
        assert_eq!(state.player.pos, Vec2::new(150.0, 435.0));
        assert!(state.items.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.score.report(), ScoreReport::default());
        assert_eq!(state.time_left, 30.0);
        assert_eq!(state.seconds_left(), 30);
        assert_eq!(state.frame_count, 0);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut score = Score::default();
        score.apply(-15);
        assert_eq!(score.customers(), 0);
        score.apply(25);
        score.apply(-10);
        assert_eq!(score.customers(), 15);
        assert_eq!(score.revenue(), 22_500);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(1, SessionConfig::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_elapsed_tracks_clock() {
        let mut state = GameState::new(1, SessionConfig::default());
        state.time_left = 10.6;
        assert!((state.elapsed() - 19.4).abs() < 1e-4);
        assert_eq!(state.seconds_left(), 11);
        state.time_left = 0.0;
        assert!(state.clock_expired());
        assert_eq!(state.seconds_left(), 0);
    }
}
