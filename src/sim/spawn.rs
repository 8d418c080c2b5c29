//! Item spawning on the difficulty cadence

use glam::Vec2;
use rand::Rng;

use super::catalog;
use super::difficulty::tier_for;
use super::state::{ActiveItem, GameState};
use crate::consts::*;
use crate::item_ground_y;

/// Spawn at most one item if this frame lands on the tier's cadence.
///
/// Reads `frame_count` but does not advance it; the tick does that once per
/// frame whether or not anything spawned.
pub fn spawn_items(state: &mut GameState) -> Option<u32> {
    let tier = tier_for(&state.config.tiers, state.elapsed());
    let rate = u64::from(tier.spawn_rate.max(1));
    if state.frame_count % rate != 0 {
        return None;
    }

    let negative = state.rng.random::<f32>() > NEGATIVE_SPAWN_THRESHOLD;
    let pool = catalog::pool(!negative);
    let archetype = &pool[state.rng.random_range(0..pool.len())];

    let ground_y = item_ground_y();
    let air_y = ground_y - ITEM_AIR_LIFT;
    // Obstacles stay on the street; good items are split between street and air
    let y = if negative || state.rng.random::<f32>() <= 0.5 {
        ground_y
    } else {
        air_y
    };

    let id = state.next_entity_id();
    state.items.push(ActiveItem {
        id,
        archetype,
        pos: Vec2::new(CANVAS_WIDTH, y),
        size: Vec2::new(ITEM_WIDTH, ITEM_HEIGHT),
        speed: tier.speed,
    });
    Some(id)
}

/// Scroll items left and drop the ones fully off-screen
pub fn advance_items(state: &mut GameState) {
    for item in &mut state.items {
        item.pos.x -= item.speed;
    }
    state.items.retain(|item| !item.is_offscreen());
}
