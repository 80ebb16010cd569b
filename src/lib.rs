//! Gem Bounce - balls bouncing inside a circular arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, wall reflection, cloning, annihilation)
//! - `settings`: Data-driven tuning and preferences (JSON)
//! - `renderer`: Draw-list construction and the Canvas 2D backend
//! - `audio`: Bounce sound selection, played via Web Audio on wasm32

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SimConfig};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Target tick rate (one physics step per rendered frame)
    pub const TICK_HZ: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Window dimensions (the arena is centered in the window)
    pub const WINDOW_WIDTH: f32 = 540.0;
    pub const WINDOW_HEIGHT: f32 = 960.0;

    /// Arena and ball radii
    pub const ARENA_RADIUS: f32 = 270.0;
    pub const BALL_RADIUS: f32 = 20.0;

    /// Launch speed (px/tick); horizontal momentum is drawn from [0, SPEED]
    pub const SPEED: f32 = 5.0;

    /// Per-ball gravity (px/tick²) before and after the shift
    pub const INITIAL_GRAVITY: f32 = 0.5;
    pub const UPDATED_GRAVITY: f32 = 0.3;
    /// Elapsed time after which the gravity shift fires
    pub const GRAVITY_CHANGE_MS: f64 = 5000.0;

    /// Wall bounce coefficient before and after the shift (negative, |b| > 1)
    pub const INITIAL_BOUNCE: f32 = -1.005;
    pub const UPDATED_BOUNCE: f32 = -1.02;

    /// A ball clones itself on every Nth wall bounce
    pub const CLONE_EVERY: u32 = 5;

    /// Drop shadow offset and arena ring stroke width (px)
    pub const SHADOW_OFFSET: f32 = 5.0;
    pub const RING_WIDTH: f32 = 10.0;
}

/// Direction of a vector, `atan2(y, x)`.
///
/// The zero vector has angle 0, so a resting ball reflects to a resting ball.
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Unit vector pointing at `theta`
#[inline]
pub fn unit_at(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    unit_at(theta) * r
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_of_zero_is_zero() {
        assert_eq!(angle_of(Vec2::ZERO), 0.0);
        assert!((angle_of(Vec2::new(0.0, 3.0)) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(250.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-3);
        assert!((p.y - 250.0).abs() < 1e-3);
        assert!((p.length() - 250.0).abs() < 1e-3);
        assert!((angle_of(polar_to_cartesian(10.0, -PI / 3.0)) + PI / 3.0).abs() < 1e-5);
    }
}
