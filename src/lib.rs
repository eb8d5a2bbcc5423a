//! Wing Dash - endless side-scrolling dodge game core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (flight, spawning, collisions, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the smoothing factors are tuned for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical screen dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 450.0;

    /// Player column (the world scrolls past it)
    pub const PLAYER_X: f32 = 100.0;

    /// Entities whose x drops below this are pruned
    pub const CLEANUP_X: f32 = -220.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
