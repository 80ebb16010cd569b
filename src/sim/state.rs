//! Simulation state and core types
//!
//! Everything one run needs lives on `SimState`; nothing is global.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::scenario;
use crate::settings::SimConfig;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Balls seeded, clock stopped, waiting for Start
    Idle,
    /// Full per-tick pipeline runs
    Running,
    /// Quit received; terminal
    Stopped,
}

/// What a ball is. Decides annihilation eligibility and bounce sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallKind {
    Diamond,
    Emerald,
    /// Index into `scenario::COUNTRIES`
    Flag(u8),
}

impl BallKind {
    /// Text drawn on the ball, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            BallKind::Flag(idx) => scenario::COUNTRIES.get(*idx as usize).copied(),
            _ => None,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub kind: BallKind,
    pub pos: Vec2,
    /// Velocity in px/tick
    pub vel: Vec2,
    /// Added to `vel.y` every tick
    pub gravity: f32,
    /// Wall reflections since creation (or last reset)
    pub bounces: u32,
}

impl Ball {
    pub fn new(id: u32, kind: BallKind, pos: Vec2, vel: Vec2, gravity: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            gravity,
            bounces: 0,
        }
    }
}

/// The fixed circular boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
}

impl Arena {
    /// Arena centered in the configured window
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            center: Vec2::new(config.window_width / 2.0, config.window_height / 2.0),
            radius: config.arena_radius,
        }
    }

    #[inline]
    pub fn distance_from_center(&self, pos: Vec2) -> f32 {
        pos.distance(self.center)
    }

    /// True when a ball of `ball_radius` at `pos` pokes through the wall
    #[inline]
    pub fn penetrates(&self, pos: Vec2, ball_radius: f32) -> bool {
        self.distance_from_center(pos) + ball_radius > self.radius
    }
}

/// Elapsed simulation time since Start (or last reset)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    pub ticks: u64,
    pub elapsed_ms: f64,
}

impl SimClock {
    pub fn advance(&mut self, dt: f32) {
        self.ticks += 1;
        self.elapsed_ms += f64::from(dt) * 1000.0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Something that happened during the last tick, for audio and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Started,
    /// Ball reflected off the arena wall
    WallBounce { ball: u32, kind: BallKind, bounces: u32 },
    /// `parent` hit a clone interval and produced `child`
    Spawned { parent: u32, child: u32 },
    /// Two balls of different kinds overlapped and were both removed
    Annihilated { a: u32, b: u32 },
    /// The one-time gravity/bounce change fired
    GravityShifted { gravity: f32, bounce: f32 },
    Reset,
    Stopped,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Move to a fresh stream so each reset draws new momentum
    pub fn next_stream(&mut self) {
        self.stream = self.stream.wrapping_add(1);
    }
}

/// Read-only view of one ball for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallView {
    pub id: u32,
    pub pos: Vec2,
    pub kind: BallKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub arena: Arena,
    pub ball_radius: f32,
    pub balls: Vec<BallView>,
}

/// Complete simulation state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: SimConfig,
    pub arena: Arena,
    pub phase: Phase,
    pub clock: SimClock,
    /// Wall bounce coefficient currently in force
    pub bounce: f32,
    /// Gravity shift already applied this run
    pub shift_fired: bool,
    /// Live balls, in creation order
    pub balls: Vec<Ball>,
    pub rng_state: RngState,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<SimEvent>,
    next_id: u32,
}

impl SimState {
    /// Create an idle simulation with the initial balls seeded
    pub fn new(config: SimConfig) -> Self {
        let mut state = Self {
            arena: Arena::from_config(&config),
            phase: Phase::Idle,
            clock: SimClock::default(),
            bounce: config.bounce,
            shift_fired: false,
            balls: Vec::new(),
            rng_state: RngState::new(config.seed),
            events: Vec::new(),
            next_id: 1,
            config,
        };
        state.seed_balls();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the ball list with the variant's starting set
    fn seed_balls(&mut self) {
        let mut rng = self.rng_state.to_rng();
        let seeded = scenario::initial_balls(&self.config, &self.arena, &mut rng);
        let mut balls = Vec::with_capacity(seeded.len());
        for mut ball in seeded {
            ball.id = self.next_entity_id();
            balls.push(ball);
        }
        self.balls = balls;
    }

    /// Back to the starting balls, initial constants and a zero clock
    pub fn reset(&mut self) {
        self.rng_state.next_stream();
        self.seed_balls();
        self.bounce = self.config.bounce;
        self.shift_fired = false;
        self.clock.reset();
        log::info!(
            "Simulation reset ({} balls, stream {})",
            self.balls.len(),
            self.rng_state.stream
        );
    }

    /// Shared ball radius
    #[inline]
    pub fn ball_radius(&self) -> f32 {
        self.config.ball_radius
    }

    /// Events emitted by the last tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn count_kind(&self, kind: BallKind) -> usize {
        self.balls.iter().filter(|b| b.kind == kind).count()
    }

    /// Read-only copy of what should be drawn this frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            arena: self.arena,
            ball_radius: self.ball_radius(),
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    id: b.id,
                    pos: b.pos,
                    kind: b.kind,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_with_two_gems() {
        let state = SimState::new(SimConfig::gems());
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.count_kind(BallKind::Diamond), 1);
        assert_eq!(state.count_kind(BallKind::Emerald), 1);
        assert_eq!(state.clock, SimClock::default());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = SimState::new(SimConfig::flags());
        let mut ids: Vec<u32> = state.balls.iter().map(|b| b.id).collect();
        ids.push(state.next_entity_id());
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_arena_centered_in_window() {
        let arena = Arena::from_config(&SimConfig::gems());
        assert_eq!(arena.center, Vec2::new(270.0, 480.0));
        assert_eq!(arena.radius, 270.0);
        assert!(!arena.penetrates(Vec2::new(270.0, 730.0), 20.0));
        assert!(arena.penetrates(Vec2::new(270.0, 731.0), 20.0));
    }

    #[test]
    fn test_clock_advance_and_reset() {
        let mut clock = SimClock::default();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        assert_eq!(clock.ticks, 60);
        assert!((clock.elapsed_ms - 1000.0).abs() < 0.01);
        clock.reset();
        assert_eq!(clock.ticks, 0);
        assert_eq!(clock.elapsed_ms, 0.0);
    }

    #[test]
    fn test_reset_restores_initial_constants() {
        let mut state = SimState::new(SimConfig::gems());
        state.bounce = -1.02;
        state.shift_fired = true;
        state.clock.advance(1.0);
        state.balls.clear();

        state.reset();
        assert_eq!(state.balls.len(), 2);
        assert_eq!(state.bounce, SimConfig::gems().bounce);
        assert!(!state.shift_fired);
        assert_eq!(state.clock.ticks, 0);
        assert!(state.balls.iter().all(|b| b.bounces == 0));
        assert!(state.balls.iter().all(|b| b.gravity.abs() == 0.5));
    }

    #[test]
    fn test_reset_reseeds_start_positions_and_momentum() {
        let mut state = SimState::new(SimConfig::gems());
        for ball in &mut state.balls {
            ball.pos += Vec2::new(33.0, -71.0);
            ball.vel = Vec2::new(12.0, 9.0);
        }
        state.clock.advance(2.5);

        for _ in 0..5 {
            state.reset();
            assert_eq!(state.clock, SimClock::default());
            assert_eq!(state.balls.len(), 2);

            let diamond = &state.balls[0];
            assert_eq!(diamond.kind, BallKind::Diamond);
            assert_eq!(diamond.pos, Vec2::new(270.0, 521.0));
            assert_eq!(diamond.vel.y, -5.0);
            assert!((-5.0..=0.0).contains(&diamond.vel.x), "vx {}", diamond.vel.x);

            let emerald = &state.balls[1];
            assert_eq!(emerald.kind, BallKind::Emerald);
            assert_eq!(emerald.pos, Vec2::new(270.0, 440.0));
            assert_eq!(emerald.vel.y, 5.0);
            assert!((0.0..=5.0).contains(&emerald.vel.x), "vx {}", emerald.vel.x);
        }
    }

    #[test]
    fn test_snapshot_mirrors_balls() {
        let state = SimState::new(SimConfig::gems());
        let snap = state.snapshot();
        assert_eq!(snap.balls.len(), state.balls.len());
        assert_eq!(snap.ball_radius, 20.0);
        for (view, ball) in snap.balls.iter().zip(&state.balls) {
            assert_eq!(view.id, ball.id);
            assert_eq!(view.pos, ball.pos);
            assert_eq!(view.kind, ball.kind);
        }
    }

    #[test]
    fn test_flag_label() {
        assert_eq!(BallKind::Flag(0).label(), Some("US"));
        assert_eq!(BallKind::Diamond.label(), None);
    }
}
