//! Draw-list generation for one frame

use glam::Vec2;
use std::f32::consts::TAU;

use super::colors;
use crate::settings::DisplayConfig;
use crate::sim::{BallKind, Snapshot, Variant};

/// A single backend-independent drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Fill the whole window
    Clear { color: [f32; 4] },
    /// Stroked circle
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: [f32; 4],
    },
    /// Filled circle
    Disc {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Centered text
    Label {
        center: Vec2,
        text: &'static str,
        size: f32,
        color: [f32; 4],
    },
}

/// Hue-spread color for a flag ball (golden-angle walk, stable per index)
fn flag_color(idx: u8) -> [f32; 4] {
    let hue = (idx as f32 * 0.618_034).fract() * TAU;
    let r = 0.5 + 0.4 * hue.cos();
    let g = 0.5 + 0.4 * (hue - TAU / 3.0).cos();
    let b = 0.5 + 0.4 * (hue + TAU / 3.0).cos();
    [r, g, b, 1.0]
}

fn ball_color(kind: BallKind) -> [f32; 4] {
    match kind {
        BallKind::Diamond => colors::DIAMOND,
        BallKind::Emerald => colors::EMERALD,
        BallKind::Flag(idx) => flag_color(idx),
    }
}

/// Build the draw list for a snapshot.
///
/// Order: background, arena ring, then shadow and ball for each ball in
/// simulation order (later balls draw over earlier ones).
pub fn build_frame(snapshot: &Snapshot, variant: Variant, display: &DisplayConfig) -> Vec<DrawCmd> {
    let (background, ring_color, shadow_color) = match variant {
        Variant::Gems => (colors::DIRT, colors::STONE, colors::GEM_SHADOW),
        Variant::Flags => (colors::ALICE_BLUE, colors::PALE_BLUE, colors::FLAG_SHADOW),
    };
    let r = snapshot.ball_radius;

    let mut cmds = Vec::with_capacity(2 + snapshot.balls.len() * 3);
    cmds.push(DrawCmd::Clear { color: background });
    cmds.push(DrawCmd::Ring {
        center: snapshot.arena.center,
        radius: snapshot.arena.radius,
        width: display.ring_width,
        color: ring_color,
    });

    let offset = Vec2::splat(display.shadow_offset);
    for ball in &snapshot.balls {
        // Gem shadows hang off the sprite's top-left corner; flag shadows sit
        // just below-right of the ball
        let shadow_center = match variant {
            Variant::Gems => ball.pos - Vec2::splat(r) + offset,
            Variant::Flags => ball.pos + offset,
        };
        cmds.push(DrawCmd::Disc {
            center: shadow_center,
            radius: r,
            color: shadow_color,
        });
        cmds.push(DrawCmd::Disc {
            center: ball.pos,
            radius: r,
            color: ball_color(ball.kind),
        });
        if display.show_labels {
            if let Some(text) = ball.kind.label() {
                cmds.push(DrawCmd::Label {
                    center: ball.pos,
                    text,
                    size: r * 0.8,
                    color: colors::LABEL,
                });
            }
        }
    }

    cmds
}
