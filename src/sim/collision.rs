//! Collision detection and response
//!
//! Two kinds of contact exist: a ball poking through the circular arena wall
//! (reflected and pushed back inside), and two balls of different kinds
//! overlapping (both removed, no elastic response).

use glam::Vec2;

use super::state::{Arena, Ball};
use crate::{angle_of, unit_at};

/// Result of a wall contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    /// Direction from arena center to ball center at contact
    pub normal_angle: f32,
    /// How far the ball had poked through the wall before push-back
    pub overlap: f32,
    /// Signed speed written back along the reflection angle
    pub speed: f32,
}

/// Mirror a velocity direction across the radial normal and scale its speed.
///
/// Result angle is `2 * normal_angle - angle(vel)` with magnitude
/// `|vel| * bounce`. A negative `bounce` flips the result, which is what sends
/// the ball back inward. Zero velocity stays zero.
#[inline]
pub fn reflect_velocity(vel: Vec2, normal_angle: f32, bounce: f32) -> Vec2 {
    let reflection_angle = 2.0 * normal_angle - angle_of(vel);
    unit_at(reflection_angle) * (vel.length() * bounce)
}

/// Resolve a ball against the arena wall.
///
/// If the ball penetrates (`distance + radius > arena radius`) its velocity is
/// reflected, it is moved back inside along the normal by the overlap, and its
/// bounce counter is incremented. Returns `None` when there is no contact.
pub fn resolve_boundary(
    ball: &mut Ball,
    arena: &Arena,
    ball_radius: f32,
    bounce: f32,
) -> Option<BoundaryHit> {
    let offset = ball.pos - arena.center;
    let distance = offset.length();
    if distance + ball_radius <= arena.radius {
        return None;
    }

    let normal_angle = angle_of(offset);
    let speed = ball.vel.length() * bounce;
    ball.vel = reflect_velocity(ball.vel, normal_angle, bounce);

    let overlap = distance + ball_radius - arena.radius;
    ball.pos -= unit_at(normal_angle) * overlap;

    ball.bounces += 1;

    Some(BoundaryHit {
        normal_angle,
        overlap,
        speed,
    })
}

/// Two balls of the shared radius overlap
#[inline]
pub fn balls_overlap(a: Vec2, b: Vec2, ball_radius: f32) -> bool {
    a.distance(b) < 2.0 * ball_radius
}

/// Every unordered pair `(i, j)`, `i < j`, of different-kind balls that overlap.
///
/// Same-kind balls never collide, whatever their distance.
pub fn find_annihilations(balls: &[Ball], ball_radius: f32) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in balls.iter().enumerate() {
        for (j, b) in balls.iter().enumerate().skip(i + 1) {
            if a.kind != b.kind && balls_overlap(a.pos, b.pos, ball_radius) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallKind;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// Wrap an angle into [-π, π)
    fn normalize_angle(mut angle: f32) -> f32 {
        while angle >= PI {
            angle -= 2.0 * PI;
        }
        while angle < -PI {
            angle += 2.0 * PI;
        }
        angle
    }

    fn arena() -> Arena {
        Arena {
            center: Vec2::new(270.0, 480.0),
            radius: 270.0,
        }
    }

    fn ball_at(pos: Vec2, vel: Vec2) -> Ball {
        Ball::new(1, BallKind::Diamond, pos, vel, 0.0)
    }

    #[test]
    fn test_inside_is_no_contact() {
        let mut ball = ball_at(Vec2::new(270.0, 600.0), Vec2::new(0.0, 3.0));
        let before = ball.clone();
        assert!(resolve_boundary(&mut ball, &arena(), 20.0, -1.005).is_none());
        assert_eq!(ball, before);
    }

    #[test]
    fn test_touching_exactly_is_no_contact() {
        // distance + radius == arena radius is not penetration
        let mut ball = ball_at(Vec2::new(270.0, 730.0), Vec2::new(0.0, 1.0));
        assert!(resolve_boundary(&mut ball, &arena(), 20.0, -1.005).is_none());
    }

    #[test]
    fn test_straight_down_bounces_straight_up() {
        let arena = arena();
        let mut ball = ball_at(Vec2::new(270.0, 735.0), Vec2::new(0.0, 8.0));
        let hit = resolve_boundary(&mut ball, &arena, 20.0, -1.005).unwrap();

        assert!((hit.normal_angle - FRAC_PI_2).abs() < 1e-6);
        assert!((hit.overlap - 5.0).abs() < 1e-3);
        // 2*(π/2) - π/2 = π/2, speed 8 * -1.005 → points up
        assert!(ball.vel.x.abs() < 1e-4);
        assert!((ball.vel.y - (-8.04)).abs() < 1e-4);
        assert!((arena.distance_from_center(ball.pos) + 20.0 - 270.0).abs() < 1e-3);
        assert_eq!(ball.bounces, 1);
    }

    #[test]
    fn test_zero_velocity_contact_is_defined() {
        let mut ball = ball_at(Vec2::new(560.0, 480.0), Vec2::ZERO);
        let hit = resolve_boundary(&mut ball, &arena(), 20.0, -1.02).unwrap();
        assert_eq!(hit.speed, 0.0);
        assert!(ball.vel.length() < 1e-6);
        assert!(!ball.vel.x.is_nan() && !ball.vel.y.is_nan());
        assert!((ball.pos.x - 520.0).abs() < 1e-3);
        assert_eq!(ball.bounces, 1);
    }

    #[test]
    fn test_outward_at_limit_then_corrected() {
        // At exactly arena - radius, moving directly outward: next step penetrates
        let arena = arena();
        let mut ball = ball_at(Vec2::new(270.0 + 250.0, 480.0), Vec2::new(4.0, 0.0));
        assert!(!arena.penetrates(ball.pos, 20.0));
        ball.pos += ball.vel;
        assert!(arena.penetrates(ball.pos, 20.0));

        resolve_boundary(&mut ball, &arena, 20.0, -1.005).unwrap();
        let d = arena.distance_from_center(ball.pos);
        assert!((d + 20.0 - 270.0).abs() < 1e-3);
        // Moving back toward the center
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_oblique_reflection_angle() {
        // Contact on the right wall, moving right and down
        let mut ball = ball_at(Vec2::new(525.0, 480.0), Vec2::new(3.0, 4.0));
        resolve_boundary(&mut ball, &arena(), 20.0, -1.0).unwrap();
        // normal 0, incoming angle atan2(4,3); reflected angle -atan2(4,3), flipped by -1
        assert!((ball.vel.x - (-3.0)).abs() < 1e-4);
        assert!((ball.vel.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_different_kinds_overlapping_annihilate() {
        let balls = vec![
            Ball::new(1, BallKind::Diamond, Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0),
            Ball::new(2, BallKind::Emerald, Vec2::new(130.0, 100.0), Vec2::ZERO, 0.0),
            Ball::new(3, BallKind::Emerald, Vec2::new(300.0, 300.0), Vec2::ZERO, 0.0),
        ];
        assert_eq!(find_annihilations(&balls, 20.0), vec![(0, 1)]);
    }

    #[test]
    fn test_same_kind_never_annihilates() {
        let balls = vec![
            Ball::new(1, BallKind::Emerald, Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0),
            Ball::new(2, BallKind::Emerald, Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0),
        ];
        assert!(find_annihilations(&balls, 20.0).is_empty());
    }

    #[test]
    fn test_exact_touch_does_not_annihilate() {
        let balls = vec![
            Ball::new(1, BallKind::Diamond, Vec2::new(0.0, 0.0), Vec2::ZERO, 0.0),
            Ball::new(2, BallKind::Emerald, Vec2::new(40.0, 0.0), Vec2::ZERO, 0.0),
        ];
        assert!(find_annihilations(&balls, 20.0).is_empty());
    }

    #[test]
    fn test_one_ball_in_several_pairs() {
        let balls = vec![
            Ball::new(1, BallKind::Diamond, Vec2::new(0.0, 0.0), Vec2::ZERO, 0.0),
            Ball::new(2, BallKind::Emerald, Vec2::new(10.0, 0.0), Vec2::ZERO, 0.0),
            Ball::new(3, BallKind::Emerald, Vec2::new(-10.0, 0.0), Vec2::ZERO, 0.0),
        ];
        assert_eq!(find_annihilations(&balls, 20.0), vec![(0, 1), (0, 2)]);
    }

    proptest! {
        #[test]
        fn prop_reflection_angle_and_speed(
            normal in -PI..PI,
            heading in -PI..PI,
            speed in 0.5f32..50.0,
            bounce in -1.5f32..-0.5,
        ) {
            let vel = Vec2::new(heading.cos(), heading.sin()) * speed;
            let out = reflect_velocity(vel, normal, bounce);

            prop_assert!((out.length() - speed * bounce.abs()).abs() < 1e-3 * speed.max(1.0));

            // Negative bounce points the result opposite to the mirrored direction
            let expected = normalize_angle(2.0 * normal - angle_of(vel) + PI);
            let diff = normalize_angle(angle_of(out) - expected).abs();
            prop_assert!(diff < 1e-3 || (diff - 2.0 * PI).abs() < 1e-3, "diff {}", diff);
        }

        #[test]
        fn prop_pushed_back_inside(
            theta in -PI..PI,
            depth in 0.01f32..15.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let arena = arena();
            let pos = arena.center + Vec2::new(theta.cos(), theta.sin()) * (250.0 + depth);
            let mut ball = ball_at(pos, Vec2::new(vx, vy));
            let hit = resolve_boundary(&mut ball, &arena, 20.0, -1.005);
            prop_assert!(hit.is_some());
            let d = arena.distance_from_center(ball.pos);
            prop_assert!((d + 20.0 - 270.0).abs() < 1e-2);
            prop_assert_eq!(ball.bounces, 1);
        }
    }
}
