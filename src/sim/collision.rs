//! Collision detection and scoring
//!
//! Sprites are drawn at full size but collide through inset boxes, so a
//! corner brush doesn't count as a catch.

use glam::Vec2;

use super::catalog::ItemKind;
use super::particles::spawn_burst;
use super::state::{ActiveItem, GameState, Player};
use crate::consts::*;

/// Axis-aligned box, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub size: Vec2,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap; touching edges don't count
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.min.x < other.max().x
            && self.max().x > other.min.x
            && self.min.y < other.max().y
            && self.max().y > other.min.y
    }
}

impl Player {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(
            self.pos.x + PLAYER_INSET_X,
            self.pos.y + PLAYER_INSET_Y,
            PLAYER_WIDTH - PLAYER_INSET_X * 2.0,
            PLAYER_HEIGHT - PLAYER_INSET_Y * 2.0,
        )
    }
}

impl ActiveItem {
    /// Inset on the sides and top only; the bottom edge stays put
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(
            self.pos.x + ITEM_INSET_X,
            self.pos.y + ITEM_INSET_Y,
            self.size.x - ITEM_INSET_X * 2.0,
            self.size.y - ITEM_INSET_Y,
        )
    }
}

/// An item the player ran into this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catch {
    pub item_id: u32,
    pub kind: ItemKind,
    pub positive: bool,
    /// Customers applied (before clamping)
    pub delta: i32,
    /// Item top-left at the moment of contact
    pub at: Vec2,
}

/// Resolve every player/item overlap for this frame.
///
/// Each overlapping item is scored once, bursts into particles, and leaves
/// the active set. Catches don't interact with each other.
pub fn resolve_collisions(state: &mut GameState) -> Vec<Catch> {
    let player_box = state.player.hitbox();
    let mut catches = Vec::new();

    state.items.retain(|item| {
        if !player_box.overlaps(&item.hitbox()) {
            return true;
        }
        catches.push(Catch {
            item_id: item.id,
            kind: item.archetype.kind,
            positive: item.archetype.positive,
            delta: item.archetype.customers,
            at: item.pos,
        });
        false
    });

    for catch in &catches {
        if catch.delta != 0 {
            state.score.apply(catch.delta);
        }
        spawn_burst(state, catch.at, catch.positive);
    }

    catches
}
