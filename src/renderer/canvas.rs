//! Canvas 2D backend

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::scene::{DrawCmd, TextAlign};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::Color;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    background: Option<HtmlImageElement>,
}

impl CanvasRenderer {
    /// Fix the backing store to the logical game size and grab a 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            background: None,
        })
    }

    /// Image used for `DrawCmd::Background` tiles once it has loaded
    pub fn set_background(&mut self, image: HtmlImageElement) {
        self.background = Some(image);
    }

    pub fn draw(&self, cmds: &[DrawCmd]) {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        for cmd in cmds {
            if let Err(e) = self.draw_one(cmd) {
                log::warn!("Draw failed: {}", crate::Error::describe_js(&e));
            }
        }
        ctx.set_text_align("start");
    }

    fn fill(&self, color: &Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn draw_one(&self, cmd: &DrawCmd) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Fill { color } => {
                self.fill(color);
                ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
            }
            DrawCmd::Background { x, width } => {
                if let Some(img) = &self.background {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        *x as f64,
                        0.0,
                        *width as f64,
                        CANVAS_HEIGHT as f64,
                    )?;
                }
            }
            DrawCmd::Rect { pos, size, color } => {
                self.fill(color);
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::StrokeRect {
                pos,
                size,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width as f64);
                ctx.stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::RoundRect {
                pos,
                size,
                radius,
                fill,
                stroke,
            } => {
                let (x, y) = (pos.x as f64, pos.y as f64);
                let (w, h) = (size.x as f64, size.y as f64);
                let r = (*radius as f64).min(w / 2.0).min(h / 2.0);
                ctx.begin_path();
                ctx.move_to(x + r, y);
                ctx.arc_to(x + w, y, x + w, y + h, r)?;
                ctx.arc_to(x + w, y + h, x, y + h, r)?;
                ctx.arc_to(x, y + h, x, y, r)?;
                ctx.arc_to(x, y, x + w, y, r)?;
                ctx.close_path();
                self.fill(fill);
                ctx.fill();
                if let Some((color, width)) = stroke {
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke();
                }
            }
            DrawCmd::Polygon { points, color } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in rest {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                self.fill(color);
                ctx.fill();
            }
            DrawCmd::Arc {
                center,
                radius,
                start,
                end,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    *start as f64,
                    *end as f64,
                )?;
                self.fill(color);
                ctx.fill();
            }
            DrawCmd::Ellipse {
                center,
                radii,
                color,
            } => {
                ctx.begin_path();
                ctx.ellipse(
                    center.x as f64,
                    center.y as f64,
                    radii.x as f64,
                    radii.y as f64,
                    0.0,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                self.fill(color);
                ctx.fill();
            }
            DrawCmd::Curve {
                from,
                ctrl,
                to,
                color,
                width,
            } => {
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.quadratic_curve_to(ctrl.x as f64, ctrl.y as f64, to.x as f64, to.y as f64);
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width as f64);
                ctx.stroke();
            }
            DrawCmd::Text {
                text,
                pos,
                font,
                color,
                align,
            } => {
                ctx.set_font(font.css());
                ctx.set_text_align(match align {
                    TextAlign::Start => "start",
                    TextAlign::Center => "center",
                });
                self.fill(color);
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
        Ok(())
    }
}
