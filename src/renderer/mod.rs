//! Rendering module
//!
//! `shapes` turns a simulation snapshot into a flat draw list; backends only
//! execute draw commands. The Canvas 2D backend exists on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::{DrawCmd, build_frame};

/// Colors for scene elements (RGBA, 0-1)
pub mod colors {
    // Gems: dirt background, stone ring
    pub const DIRT: [f32; 4] = [0.36, 0.25, 0.17, 1.0];
    pub const STONE: [f32; 4] = [0.5, 0.5, 0.52, 1.0];
    pub const GEM_SHADOW: [f32; 4] = [50.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0, 1.0];
    pub const DIAMOND: [f32; 4] = [0.55, 0.93, 0.95, 1.0];
    pub const EMERALD: [f32; 4] = [0.2, 0.78, 0.42, 1.0];

    // Flags: alice blue background, pale calming blue ring
    pub const ALICE_BLUE: [f32; 4] = [240.0 / 255.0, 248.0 / 255.0, 1.0, 1.0];
    pub const PALE_BLUE: [f32; 4] = [173.0 / 255.0, 216.0 / 255.0, 230.0 / 255.0, 1.0];
    pub const FLAG_SHADOW: [f32; 4] = [200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0, 1.0];
    pub const LABEL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// CSS color string for a 0-1 RGBA color
pub fn css_color(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(colors::PALE_BLUE), "rgba(173, 216, 230, 1)");
        assert_eq!(css_color([2.0, -1.0, 0.5, 0.5]), "rgba(255, 0, 128, 0.5)");
    }
}
