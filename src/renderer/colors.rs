//! Palette for everything drawn outside the item catalog

use crate::Color;

/// Fallback sky while the background image loads
pub const SKY: Color = Color::rgb(224, 242, 254);
pub const SHADOW: Color = Color::rgba(0, 0, 0, 0.1);
pub const WHITE: Color = Color::rgb(255, 255, 255);

// Runner
pub const NAVY: Color = Color::rgb(30, 58, 138);
pub const SCRUBS: Color = Color::rgb(59, 130, 246);
pub const SLEEVE: Color = Color::rgb(96, 165, 250);
pub const SKIN: Color = Color::rgb(252, 165, 165);
pub const TAG: Color = Color::rgba(255, 255, 255, 0.9);
pub const MASK_EDGE: Color = Color::rgb(226, 232, 240);
pub const STETHOSCOPE: Color = Color::rgb(51, 65, 85);

// Item cards
pub const CARD_EDGE: Color = Color::rgba(255, 255, 255, 0.3);
pub const BADGE_GOOD: Color = Color::rgba(255, 255, 255, 0.9);
pub const BADGE_BAD: Color = Color::rgba(0, 0, 0, 0.3);
pub const BRAND_DARK: Color = Color::rgb(0, 61, 81);
