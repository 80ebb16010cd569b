//! Canvas 2D backend
//!
//! Executes a draw list against an HTML canvas.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCmd, css_color};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
        })
    }

    /// Draw one frame
    pub fn render(&self, cmds: &[DrawCmd]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(0.0, 0.0, self.size.0 as f64, self.size.1 as f64);
                }
                DrawCmd::Ring {
                    center,
                    radius,
                    width,
                    color,
                } => {
                    // Stroke sits inside the arena edge, like a bordered circle
                    let r = (*radius - *width / 2.0).max(0.0) as f64;
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, r, 0.0, TAU)?;
                    ctx.set_line_width(*width as f64);
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.stroke();
                }
                DrawCmd::Disc {
                    center,
                    radius,
                    color,
                } => {
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill();
                }
                DrawCmd::Label {
                    center,
                    text,
                    size,
                    color,
                } => {
                    ctx.set_font(&format!("bold {}px sans-serif", size.round()));
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_text(text, center.x as f64, center.y as f64)?;
                }
            }
        }
        Ok(())
    }
}
