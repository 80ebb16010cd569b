//! Fixed timestep simulation tick
//!
//! One call advances the controller by one frame: commands first, then the
//! physics pipeline while running.

use super::collision::{find_annihilations, resolve_boundary};
use super::state::{Ball, Phase, SimEvent, SimState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Begin the simulation (Idle → Running); restarts the clock while running
    pub start: bool,
    /// Re-seed the run while running
    pub reset: bool,
    /// End the simulation loop
    pub quit: bool,
}

/// Apply gravity to the vertical velocity, then move by the velocity
#[inline]
pub fn integrate(ball: &mut Ball) {
    ball.vel.y += ball.gravity;
    ball.pos += ball.vel;
}

/// Fire the one-time gravity/bounce change once the elapsed time passes the
/// threshold. Returns true only on the tick it fires.
pub fn apply_gravity_shift(state: &mut SimState) -> bool {
    let Some(shift) = state.config.gravity_shift else {
        return false;
    };
    if state.shift_fired || state.clock.elapsed_ms <= shift.after_ms {
        return false;
    }

    for ball in &mut state.balls {
        ball.gravity = if ball.gravity > 0.0 {
            shift.gravity
        } else {
            -shift.gravity
        };
    }
    state.bounce = shift.bounce;
    state.shift_fired = true;

    log::info!(
        "Gravity shift at {:.0} ms: gravity {} bounce {}",
        state.clock.elapsed_ms,
        shift.gravity,
        shift.bounce
    );
    state.events.push(SimEvent::GravityShifted {
        gravity: shift.gravity,
        bounce: shift.bounce,
    });
    true
}

/// Mirrored copy of `parent`: same spot, opposite velocity, fresh bounce count
pub fn spawn_clone(parent: &Ball, id: u32) -> Ball {
    Ball {
        id,
        kind: parent.kind,
        pos: parent.pos,
        vel: -parent.vel,
        gravity: parent.gravity,
        bounces: 0,
    }
}

/// Advance the simulation by one fixed timestep.
///
/// Start while Running zeroes the clock without touching the balls, which
/// postpones a gravity shift that has not fired yet.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.phase == Phase::Stopped {
        return;
    }

    if input.quit {
        log::info!("Quit after {} ticks", state.clock.ticks);
        state.phase = Phase::Stopped;
        state.events.push(SimEvent::Stopped);
        return;
    }

    match state.phase {
        Phase::Idle => {
            if !input.start {
                return;
            }
            state.phase = Phase::Running;
            state.clock.reset();
            state.events.push(SimEvent::Started);
            log::info!("Simulation started ({} balls)", state.balls.len());
        }
        Phase::Running => {
            if input.start {
                // Re-arms the clock only; a shift that already fired stays applied
                state.clock.reset();
                log::info!("Clock restarted");
            }
            if input.reset && state.config.allow_reset {
                state.reset();
                state.events.push(SimEvent::Reset);
            }
        }
        Phase::Stopped => return,
    }

    step(state, dt);
}

/// The running pipeline: clock, gravity shift, integrate and wall-collide each
/// ball, merge clones, then annihilate overlapping different-kind pairs.
fn step(state: &mut SimState, dt: f32) {
    state.clock.advance(dt);
    apply_gravity_shift(state);

    let radius = state.ball_radius();
    let bounce = state.bounce;
    let clone_every = state.config.clone_every;

    // Clones are staged so the ball list is never grown while iterated
    let mut parents: Vec<usize> = Vec::new();

    for (idx, ball) in state.balls.iter_mut().enumerate() {
        integrate(ball);

        let Some(hit) = resolve_boundary(ball, &state.arena, radius, bounce) else {
            continue;
        };
        log::debug!(
            "Ball {} ({:?}) bounce #{} overlap {:.2} speed {:.2}",
            ball.id,
            ball.kind,
            ball.bounces,
            hit.overlap,
            hit.speed.abs()
        );
        state.events.push(SimEvent::WallBounce {
            ball: ball.id,
            kind: ball.kind,
            bounces: ball.bounces,
        });

        if let Some(n) = clone_every {
            if ball.bounces % n == 0 {
                parents.push(idx);
            }
        }
    }

    let mut spawned = Vec::with_capacity(parents.len());
    for idx in parents {
        let id = state.next_entity_id();
        let clone = spawn_clone(&state.balls[idx], id);
        log::debug!("Ball {} cloned into {}", state.balls[idx].id, id);
        state.events.push(SimEvent::Spawned {
            parent: state.balls[idx].id,
            child: id,
        });
        spawned.push(clone);
    }
    state.balls.extend(spawned);

    if state.config.annihilation {
        annihilate(state, radius);
    }
}

/// Mark every ball in a colliding pair, then drop all marked balls in one pass
fn annihilate(state: &mut SimState, radius: f32) {
    let pairs = find_annihilations(&state.balls, radius);
    if pairs.is_empty() {
        return;
    }

    let mut marked = vec![false; state.balls.len()];
    for &(i, j) in &pairs {
        marked[i] = true;
        marked[j] = true;
        let (a, b) = (state.balls[i].id, state.balls[j].id);
        log::debug!("Balls {a} and {b} annihilated");
        state.events.push(SimEvent::Annihilated { a, b });
    }

    let mut idx = 0;
    state.balls.retain(|_| {
        let keep = !marked[idx];
        idx += 1;
        keep
    });
}
