//! Market Momentum - a 30-second runner for marketing landing pages
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, spawning, collisions, particles)
//! - `session`: Session state machine and frame scheduler
//! - `renderer`: Draw-list generation and the Canvas 2D backend
//! - `leaderboard`: Top-10 leaderboard persisted to LocalStorage
//! - `tips`: AI marketing tip prompt and fallbacks
//! - `settings`: Player preferences

pub mod error;
pub mod leaderboard;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tips;

pub use error::{Error, Result};
pub use leaderboard::{Challenge, Leaderboard, LeaderboardEntry};
pub use session::{FrameHost, HostSurface, Session, SessionPhase};
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Session length in seconds
    pub const GAME_DURATION: f32 = 30.0;

    /// Play surface dimensions
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player sprite box
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_X: f32 = 150.0;

    /// Per-frame gravity (not delta-scaled)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_STRENGTH: f32 = -14.0;
    /// Street level in the background art
    pub const GROUND_HEIGHT: f32 = 85.0;

    /// Item boxes
    pub const ITEM_WIDTH: f32 = 110.0;
    pub const ITEM_HEIGHT: f32 = 110.0;
    /// Gap between a grounded item and the street
    pub const ITEM_GROUND_GAP: f32 = 10.0;
    /// How far above ground level elevated items float
    pub const ITEM_AIR_LIFT: f32 = 200.0;

    /// Revenue per customer
    pub const PATIENT_VALUE: u64 = 1500;

    /// A spawn draw strictly above this picks the negative pool (~45%)
    pub const NEGATIVE_SPAWN_THRESHOLD: f32 = 0.55;

    /// Hitbox insets (sprite bounds are generous, gameplay boxes are not)
    pub const PLAYER_INSET_X: f32 = 15.0;
    pub const PLAYER_INSET_Y: f32 = 5.0;
    pub const ITEM_INSET_X: f32 = 20.0;
    pub const ITEM_INSET_Y: f32 = 10.0;

    /// Particle bursts
    pub const POSITIVE_BURST: usize = 12;
    pub const NEGATIVE_BURST: usize = 5;
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_DECAY: f32 = 0.02;
    pub const PARTICLE_SPREAD: f32 = 6.0;
    pub const PARTICLE_LIFT: f32 = 4.0;

    /// Background scroll, pixels per frame
    pub const BACKGROUND_SCROLL_SPEED: f32 = 2.0;

    pub const BACKGROUND_URL: &str = "https://images.reallygooddesigns.com/2023/09/winter-city-with-snow-on-street-background-cartoon-style.jpg";
}

/// Player floor line (top of the player box when standing)
#[inline]
pub fn player_floor_y() -> f32 {
    use consts::*;
    CANVAS_HEIGHT - GROUND_HEIGHT - PLAYER_HEIGHT
}

/// Top of a grounded item box
#[inline]
pub fn item_ground_y() -> f32 {
    use consts::*;
    CANVAS_HEIGHT - GROUND_HEIGHT - ITEM_HEIGHT - ITEM_GROUND_GAP
}

/// RGBA color, 8 bits per channel plus float alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string for Canvas 2D fill/stroke styles
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// Seconds shown on the HUD: ceiling of what's left, never negative
#[inline]
pub fn display_seconds(time_left: f32) -> u32 {
    time_left.max(0.0).ceil() as u32
}

/// Dollar amount with thousands separators, e.g. `$37,500`
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_seconds_rounds_up() {
        assert_eq!(display_seconds(10.6), 11);
        assert_eq!(display_seconds(10.0), 10);
        assert_eq!(display_seconds(0.01), 1);
        assert_eq!(display_seconds(0.0), 0);
        assert_eq!(display_seconds(-0.4), 0);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0), "$0");
        assert_eq!(format_money(1500), "$1,500");
        assert_eq!(format_money(37_500), "$37,500");
        assert_eq!(format_money(1_234_567), "$1,234,567");
    }

    #[test]
    fn test_floor_lines() {
        assert_eq!(player_floor_y(), 435.0);
        assert_eq!(item_ground_y(), 395.0);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb(0, 169, 197).to_css(), "rgb(0, 169, 197)");
        assert_eq!(Color::rgba(0, 0, 0, 0.1).to_css(), "rgba(0, 0, 0, 0.1)");
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(-0.5).to_css(), "rgba(1, 2, 3, 0)");
    }
}
