//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Frame-stepped physics (fixed per-frame increments)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)

pub mod catalog;
pub mod collision;
pub mod difficulty;
pub mod particles;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use catalog::{ItemArchetype, ItemKind, NEGATIVE_ITEMS, POSITIVE_ITEMS};
pub use collision::{Catch, Hitbox, resolve_collisions};
pub use difficulty::{DIFFICULTY_TIERS, DifficultyTier, tier_for};
pub use state::{
    ActiveItem, GameState, Particle, ParticleKind, Player, Score, ScoreReport, SessionConfig,
};
pub use tick::{FrameReport, TickInput, TickOutcome, tick};
