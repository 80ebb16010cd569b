//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod scenario;
pub mod state;
pub mod tick;

pub use collision::{BoundaryHit, find_annihilations, reflect_velocity, resolve_boundary};
pub use scenario::{COUNTRIES, Variant};
pub use state::{Arena, Ball, BallKind, BallView, Phase, SimClock, SimEvent, SimState, Snapshot};
pub use tick::{TickInput, tick};
