//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod band;
pub mod coins;
pub mod collision;
pub mod flight;
pub mod hazards;
pub mod rect;
pub mod sampler;
pub mod scheduler;
pub mod sets;
pub mod speed;
pub mod state;
pub mod tick;

pub use band::{ForbiddenBand, ForbiddenBandTracker, compute_band};
pub use coins::GapPattern;
pub use collision::{Collider, CollisionReport, overlap};
pub use flight::FlightOutcome;
pub use rect::Rect;
pub use sampler::WeightedTable;
pub use sets::Archetype;
pub use state::{
    Coin, EntityKind, GameEvent, GameOverCause, GamePhase, Hazard, Obstacle, ObstacleKind, Player,
    World,
};
pub use tick::{TickInput, tick};
