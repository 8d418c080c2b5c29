//! Frame draw list
//!
//! Turns a [`GameState`] into a flat list of 2D drawing commands. Keeping
//! this free of any browser types lets the layout be tested natively; the
//! canvas backend just replays the list.

use glam::Vec2;
use std::f32::consts::PI;

use crate::consts::*;
use crate::sim::{ActiveItem, GameState, Particle, ParticleKind, Player};
use crate::Color;

use super::colors;

/// Item box corner radius
const ITEM_RADIUS: f32 = 12.0;
/// Labels longer than this wrap onto two lines (if they have a space)
const LABEL_WRAP_LEN: usize = 10;
/// Block particle size
const BLOCK_PARTICLE: Vec2 = Vec2::new(6.0, 4.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Item emoji
    Icon,
    /// Item name
    Label,
    /// "+25 Patients" pill
    Badge,
    /// Name tag on the runner's coat
    Tag,
    /// Dollar particle
    Dollar,
}

impl Font {
    pub fn css(&self) -> &'static str {
        match self {
            Font::Icon => "32px serif",
            Font::Label => "bold 11px \"Inter\", sans-serif",
            Font::Badge => "bold 10px \"Inter\", sans-serif",
            Font::Tag => "bold 9px \"Inter\", sans-serif",
            Font::Dollar => "bold 14px monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

/// One drawing primitive, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Flat fill over the whole canvas
    Fill { color: Color },
    /// One tile of the background image
    Background { x: f32, width: f32 },
    Rect { pos: Vec2, size: Vec2, color: Color },
    StrokeRect { pos: Vec2, size: Vec2, color: Color, width: f32 },
    RoundRect {
        pos: Vec2,
        size: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<(Color, f32)>,
    },
    /// Filled convex polygon
    Polygon { points: Vec<Vec2>, color: Color },
    /// Filled circular sector from `start` to `end` radians
    Arc { center: Vec2, radius: f32, start: f32, end: f32, color: Color },
    Ellipse { center: Vec2, radii: Vec2, color: Color },
    /// Stroked quadratic curve
    Curve { from: Vec2, ctrl: Vec2, to: Vec2, color: Color, width: f32 },
    Text {
        text: String,
        pos: Vec2,
        font: Font,
        color: Color,
        align: TextAlign,
    },
}

impl DrawCmd {
    fn circle(center: Vec2, radius: f32, color: Color) -> Self {
        DrawCmd::Arc {
            center,
            radius,
            start: 0.0,
            end: 2.0 * PI,
            color,
        }
    }

    fn centered_text(text: impl Into<String>, pos: Vec2, font: Font, color: Color) -> Self {
        DrawCmd::Text {
            text: text.into(),
            pos,
            font,
            color,
            align: TextAlign::Center,
        }
    }
}

/// Per-frame rendering switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Natural size of the background image once loaded
    pub background: Option<Vec2>,
    pub particles: bool,
    /// Background follows the run's scroll offset
    pub scroll: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            background: None,
            particles: true,
            scroll: true,
        }
    }
}

/// Build the full draw list for one frame, back to front
pub fn build_scene(state: &GameState, options: &SceneOptions) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(64 + state.items.len() * 8 + state.particles.len());

    let offset = if options.scroll { state.scroll_offset } else { 0 };
    background(&mut cmds, options.background, offset);
    runner(&mut cmds, &state.player);
    for item in &state.items {
        item_card(&mut cmds, item);
    }
    if options.particles {
        for p in &state.particles {
            particle(&mut cmds, p);
        }
    }
    cmds
}

/// Scaled to canvas height and tiled horizontally, or a flat sky until the
/// image is available
fn background(cmds: &mut Vec<DrawCmd>, image: Option<Vec2>, scroll_offset: u64) {
    let Some(size) = image.filter(|s| s.x > 0.0 && s.y > 0.0) else {
        cmds.push(DrawCmd::Fill { color: colors::SKY });
        return;
    };

    let width = size.x * (CANVAS_HEIGHT / size.y);
    let x = -((scroll_offset as f32 * BACKGROUND_SCROLL_SPEED) % width);

    cmds.push(DrawCmd::Background { x, width });
    for tile in 1..3 {
        if x + width * tile as f32 >= CANVAS_WIDTH {
            break;
        }
        cmds.push(DrawCmd::Background {
            x: x + width * tile as f32,
            width,
        });
    }
}

fn runner(cmds: &mut Vec<DrawCmd>, player: &Player) {
    let Vec2 { x, y } = player.pos;
    let jumping = !player.grounded;
    let mid = x + PLAYER_WIDTH / 2.0;

    if !jumping {
        cmds.push(DrawCmd::Ellipse {
            center: Vec2::new(mid, y + PLAYER_HEIGHT),
            radii: Vec2::new(20.0, 5.0),
            color: colors::SHADOW,
        });
    }

    // Legs
    let legs = if jumping {
        [(8.0, 40.0, 30.0), (30.0, 45.0, 35.0)]
    } else {
        [(10.0, 45.0, 35.0), (28.0, 45.0, 35.0)]
    };
    for (dx, dy, h) in legs {
        cmds.push(DrawCmd::Rect {
            pos: Vec2::new(x + dx, y + dy),
            size: Vec2::new(12.0, h),
            color: colors::NAVY,
        });
    }

    // Scrubs
    cmds.push(DrawCmd::Rect {
        pos: Vec2::new(x, y + 20.0),
        size: Vec2::new(PLAYER_WIDTH, 40.0),
        color: colors::SCRUBS,
    });

    // Arms: the trailing one always hangs, the leading one reaches up mid-jump
    let arm = Vec2::new(10.0, 25.0);
    cmds.push(DrawCmd::Rect {
        pos: Vec2::new(x - 5.0, y + 22.0),
        size: arm,
        color: colors::SLEEVE,
    });
    cmds.push(DrawCmd::circle(Vec2::new(x, y + 50.0), 5.0, colors::SKIN));
    if jumping {
        let pivot = Vec2::new(x + PLAYER_WIDTH - 5.0, y + 22.0);
        let rot = Vec2::from_angle(-PI / 1.5);
        let corners = [
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(0.0, 30.0),
        ];
        cmds.push(DrawCmd::Polygon {
            points: corners.iter().map(|c| pivot + rot.rotate(*c)).collect(),
            color: colors::SLEEVE,
        });
        cmds.push(DrawCmd::circle(
            pivot + rot.rotate(Vec2::new(5.0, 32.0)),
            6.0,
            colors::SKIN,
        ));
    } else {
        cmds.push(DrawCmd::Rect {
            pos: Vec2::new(x + PLAYER_WIDTH - 5.0, y + 22.0),
            size: arm,
            color: colors::SLEEVE,
        });
        cmds.push(DrawCmd::circle(
            Vec2::new(x + PLAYER_WIDTH, y + 50.0),
            5.0,
            colors::SKIN,
        ));
    }

    cmds.push(DrawCmd::centered_text(
        "DOCTOR",
        Vec2::new(mid, y + 35.0),
        Font::Tag,
        colors::TAG,
    ));

    // Head, mask, stethoscope, cap
    cmds.push(DrawCmd::circle(Vec2::new(mid, y + 10.0), 16.0, colors::SKIN));
    let mask_pos = Vec2::new(mid - 12.0, y + 12.0);
    let mask_size = Vec2::new(24.0, 12.0);
    cmds.push(DrawCmd::Rect {
        pos: mask_pos,
        size: mask_size,
        color: colors::WHITE,
    });
    cmds.push(DrawCmd::StrokeRect {
        pos: mask_pos,
        size: mask_size,
        color: colors::MASK_EDGE,
        width: 1.0,
    });
    cmds.push(DrawCmd::Curve {
        from: Vec2::new(mid - 10.0, y + 20.0),
        ctrl: Vec2::new(mid, y + 40.0),
        to: Vec2::new(mid + 10.0, y + 20.0),
        color: colors::STETHOSCOPE,
        width: 2.0,
    });
    cmds.push(DrawCmd::Arc {
        center: Vec2::new(mid, y + 5.0),
        radius: 17.0,
        start: PI,
        end: 2.0 * PI,
        color: colors::NAVY,
    });
}

/// Two lines when the label is long and has a space to break on
pub fn wrap_label(label: &str) -> (&str, Option<&str>) {
    match label.split_once(' ') {
        Some((first, rest)) if label.len() > LABEL_WRAP_LEN => (first, Some(rest)),
        _ => (label, None),
    }
}

/// "+25 Patients", "-10 Patients"; nothing for zero
pub fn badge_text(customers: i32) -> Option<String> {
    match customers {
        0 => None,
        c if c > 0 => Some(format!("+{} Patients", c)),
        c => Some(format!("{} Patients", c)),
    }
}

fn item_card(cmds: &mut Vec<DrawCmd>, item: &ActiveItem) {
    let arch = item.archetype;
    let Vec2 { x, y } = item.pos;
    let Vec2 { x: w, y: h } = item.size;
    let mid = x + w / 2.0;

    cmds.push(DrawCmd::RoundRect {
        pos: item.pos,
        size: item.size,
        radius: ITEM_RADIUS,
        fill: arch.color,
        stroke: Some((colors::CARD_EDGE, 2.0)),
    });

    cmds.push(DrawCmd::centered_text(
        arch.icon,
        Vec2::new(mid, y + 35.0),
        Font::Icon,
        arch.text_color,
    ));

    match wrap_label(arch.label) {
        (first, Some(rest)) => {
            cmds.push(DrawCmd::centered_text(first, Vec2::new(mid, y + 55.0), Font::Label, colors::WHITE));
            cmds.push(DrawCmd::centered_text(rest, Vec2::new(mid, y + 68.0), Font::Label, colors::WHITE));
        }
        (label, None) => {
            cmds.push(DrawCmd::centered_text(label, Vec2::new(mid, y + 60.0), Font::Label, colors::WHITE));
        }
    }

    if let Some(text) = badge_text(arch.customers) {
        let good = arch.customers > 0;
        cmds.push(DrawCmd::RoundRect {
            pos: Vec2::new(x + 10.0, y + h - 24.0),
            size: Vec2::new(w - 20.0, 18.0),
            radius: 9.0,
            fill: if good { colors::BADGE_GOOD } else { colors::BADGE_BAD },
            stroke: None,
        });
        cmds.push(DrawCmd::centered_text(
            text,
            Vec2::new(mid, y + h - 11.0),
            Font::Badge,
            if good { colors::BRAND_DARK } else { colors::WHITE },
        ));
    }
}

fn particle(cmds: &mut Vec<DrawCmd>, p: &Particle) {
    let color = p.color.with_alpha(p.life);
    cmds.push(match p.kind {
        ParticleKind::Dollar => DrawCmd::Text {
            text: "$".to_string(),
            pos: p.pos,
            font: Font::Dollar,
            color,
            align: TextAlign::Start,
        },
        ParticleKind::Block => DrawCmd::Rect {
            pos: p.pos,
            size: BLOCK_PARTICLE,
            color,
        },
    });
}
