//! Collision feedback particles
//!
//! Purely cosmetic. Nothing in gameplay reads them.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Particle, ParticleKind};
use crate::Color;
use crate::consts::*;

pub const GOOD_COLOR: Color = Color::rgb(180, 224, 118); // Brand lime
pub const BAD_COLOR: Color = Color::rgb(239, 68, 68);

/// Burst size for a consumed item
pub fn burst_size(positive: bool) -> usize {
    if positive { POSITIVE_BURST } else { NEGATIVE_BURST }
}

/// Spawn a burst over an item box whose top-left is `origin`
pub fn spawn_burst(state: &mut GameState, origin: Vec2, positive: bool) {
    let count = burst_size(positive);
    let color = if positive { GOOD_COLOR } else { BAD_COLOR };
    state.particles.reserve(count);

    for i in 0..count {
        let rx: f32 = state.rng.random();
        let rvx: f32 = state.rng.random();
        let rvy: f32 = state.rng.random();
        let kind = if positive && i % 2 == 0 {
            ParticleKind::Dollar
        } else {
            ParticleKind::Block
        };
        state.particles.push(Particle {
            pos: Vec2::new(origin.x + rx * ITEM_WIDTH, origin.y + ITEM_HEIGHT / 2.0),
            vel: Vec2::new(
                (rvx - 0.5) * PARTICLE_SPREAD,
                (rvy - 0.5) * PARTICLE_SPREAD - PARTICLE_LIFT,
            ),
            life: 1.0,
            color,
            kind,
        });
    }
}

/// Integrate, fall, fade, cull
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}
