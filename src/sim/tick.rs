//! Per-frame simulation step
//!
//! One call per display refresh. Physics and scrolling advance by fixed
//! per-frame amounts; only the clock uses the measured delta.

use super::collision::{Catch, resolve_collisions};
use super::particles::update_particles;
use super::spawn::{advance_items, spawn_items};
use super::state::{GameState, ScoreReport};
use crate::item_ground_y;

/// How many frames ahead the autopilot starts its jump
const AUTOPILOT_LEAD_FRAMES: f32 = 11.0;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/tap); ignored while airborne
    pub jump: bool,
    /// Idle/demo mode - the runner jumps on its own
    pub autopilot: bool,
    /// Freeze the spawner (debug/testing)
    pub hold_spawns: bool,
}

/// What one frame produced, copied out for the host
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub score: ScoreReport,
    pub seconds_left: u32,
    pub spawned: Option<u32>,
    pub catches: Vec<Catch>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Clock had already run out; nothing was simulated
    Expired,
    Stepped(FrameReport),
}

/// Advance the run by one frame. `dt_ms` is the wall time since the last frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64) -> TickOutcome {
    if state.clock_expired() {
        return TickOutcome::Expired;
    }

    state.time_left -= (dt_ms / 1000.0) as f32;
    state.scroll_offset += 1;

    if input.jump || (input.autopilot && autopilot_wants_jump(state)) {
        state.player.jump();
    }
    state.player.step();

    let spawned = if input.hold_spawns {
        None
    } else {
        spawn_items(state)
    };
    state.frame_count += 1;

    advance_items(state);
    let catches = resolve_collisions(state);
    update_particles(&mut state.particles);

    TickOutcome::Stepped(FrameReport {
        score: state.score.report(),
        seconds_left: state.seconds_left(),
        spawned,
        catches,
    })
}

/// Jump for elevated good items and over anything bad on the street
fn autopilot_wants_jump(state: &GameState) -> bool {
    if !state.player.grounded {
        return false;
    }
    let player_right = state.player.hitbox().max().x;
    let ground_y = item_ground_y();

    state.items.iter().any(|item| {
        let worth_it = !item.archetype.positive || item.pos.y < ground_y;
        if !worth_it || item.speed <= 0.0 {
            return false;
        }
        let frames_away = (item.hitbox().min.x - player_right) / item.speed;
        (0.0..=AUTOPILOT_LEAD_FRAMES).contains(&frames_away)
    })
}
