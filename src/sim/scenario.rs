//! Starting ball sets for each variant

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::state::{Arena, Ball, BallKind};
use crate::polar_to_cartesian;
use crate::settings::SimConfig;

/// Which ball set a run starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// One diamond and one emerald with opposite gravity
    #[default]
    Gems,
    /// One ball per country, evenly spaced around the rim
    Flags,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Gems => "gems",
            Variant::Flags => "flags",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gems" | "gem" | "diamond" | "emerald" => Some(Variant::Gems),
            "flags" | "flag" | "countries" => Some(Variant::Flags),
            _ => None,
        }
    }
}

/// Fifty largest economies, in ball order
pub const COUNTRIES: [&str; 50] = [
    "US", "CN", "JP", "DE", "IN", "GB", "FR", "IT", "BR", "CA", //
    "RU", "KR", "AU", "ES", "MX", "ID", "NL", "SA", "TR", "CH", //
    "TW", "SE", "PL", "BE", "TH", "AR", "NG", "AT", "IR", "AE", //
    "IL", "NO", "IE", "HK", "MY", "SG", "PH", "PK", "CL", "FI", //
    "EG", "VN", "PT", "CZ", "RO", "PE", "NZ", "GR", "IQ", "QA",
];

/// Vertical offsets of the diamond (below center) and emerald (above center)
const DIAMOND_OFFSET_Y: f32 = 41.0;
const EMERALD_OFFSET_Y: f32 = -40.0;

/// Random momentum component in [0, speed]
fn momentum<R: Rng>(rng: &mut R, speed: f32) -> f32 {
    rng.random_range(0.0..=speed)
}

/// Build the starting balls for `config.variant`. IDs are left at 0 for the
/// caller to assign.
pub fn initial_balls<R: Rng>(config: &SimConfig, arena: &Arena, rng: &mut R) -> Vec<Ball> {
    match config.variant {
        Variant::Gems => gem_pair(config, arena, rng),
        Variant::Flags => flag_ring(config, arena, rng),
    }
}

/// Diamond launched up-left with downward gravity, emerald launched down-right
/// with upward gravity, so the pair drifts apart before falling back together.
fn gem_pair<R: Rng>(config: &SimConfig, arena: &Arena, rng: &mut R) -> Vec<Ball> {
    let speed = config.speed;
    let diamond = Ball::new(
        0,
        BallKind::Diamond,
        arena.center + Vec2::new(0.0, DIAMOND_OFFSET_Y),
        Vec2::new(-momentum(rng, speed), -speed),
        config.gravity,
    );
    let emerald = Ball::new(
        0,
        BallKind::Emerald,
        arena.center + Vec2::new(0.0, EMERALD_OFFSET_Y),
        Vec2::new(momentum(rng, speed), speed),
        -config.gravity,
    );
    vec![diamond, emerald]
}

/// Flag balls start on the arena rim itself, so each resolves a wall contact
/// on its first tick.
fn flag_ring<R: Rng>(config: &SimConfig, arena: &Arena, rng: &mut R) -> Vec<Ball> {
    let count = COUNTRIES.len();
    (0..count)
        .map(|i| {
            let theta = i as f32 * (TAU / count as f32);
            let vel = Vec2::new(momentum(rng, config.speed), momentum(rng, config.speed));
            Ball::new(
                0,
                BallKind::Flag(i as u8),
                arena.center + polar_to_cartesian(arena.radius, theta),
                vel,
                config.gravity,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gem_pair_layout() {
        let config = SimConfig::gems();
        let arena = Arena::from_config(&config);
        let mut rng = Pcg32::seed_from_u64(7);
        let balls = initial_balls(&config, &arena, &mut rng);

        assert_eq!(balls.len(), 2);
        let diamond = &balls[0];
        let emerald = &balls[1];
        assert_eq!(diamond.kind, BallKind::Diamond);
        assert_eq!(diamond.pos, Vec2::new(270.0, 521.0));
        assert_eq!(diamond.vel.y, -5.0);
        assert!((-5.0..=0.0).contains(&diamond.vel.x));
        assert_eq!(diamond.gravity, 0.5);

        assert_eq!(emerald.kind, BallKind::Emerald);
        assert_eq!(emerald.pos, Vec2::new(270.0, 440.0));
        assert_eq!(emerald.vel.y, 5.0);
        assert!((0.0..=5.0).contains(&emerald.vel.x));
        assert_eq!(emerald.gravity, -0.5);
    }

    #[test]
    fn test_flag_ring_on_rim() {
        let config = SimConfig::flags();
        let arena = Arena::from_config(&config);
        let mut rng = Pcg32::seed_from_u64(11);
        let balls = initial_balls(&config, &arena, &mut rng);

        assert_eq!(balls.len(), 50);
        for (i, ball) in balls.iter().enumerate() {
            assert_eq!(ball.kind, BallKind::Flag(i as u8));
            let d = arena.distance_from_center(ball.pos);
            assert!((d - arena.radius).abs() < 1e-2, "ball {i} at distance {d}");
            assert!((0.0..=5.0).contains(&ball.vel.x));
            assert!((0.0..=5.0).contains(&ball.vel.y));
            assert_eq!(ball.gravity, 0.5);
        }
        // First flag sits at angle 0 (right of center)
        assert!((balls[0].pos - Vec2::new(540.0, 480.0)).length() < 1e-3);
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(Variant::from_name("Flags"), Some(Variant::Flags));
        assert_eq!(Variant::from_name(" gems "), Some(Variant::Gems));
        assert_eq!(Variant::from_name("billiards"), None);
        assert_eq!(Variant::from_name(Variant::Flags.as_str()), Some(Variant::Flags));
    }

    #[test]
    fn test_same_seed_same_balls() {
        let config = SimConfig::flags();
        let arena = Arena::from_config(&config);
        let a = initial_balls(&config, &arena, &mut Pcg32::seed_from_u64(3));
        let b = initial_balls(&config, &arena, &mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
