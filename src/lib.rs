//! Flip Runner - side-scrolling runner minigame core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body physics, portals, obstacles, rewards)
//! - `renderer`: WebGPU rendering pipeline
//! - `config`: Tunable runner parameters
//! - `skins`: Cosmetic player skins

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;
pub mod skins;

pub use config::RunnerConfig;
pub use error::{ConfigError, RenderError, RewardError};

/// Fixed geometry and probability tables.
///
/// Everything here is part of the game's content rules rather than tuning,
/// so it is not exposed through [`RunnerConfig`]. Size ranges are stored as
/// `(min, span)` pairs and sampled as `min + roll * span`.
pub mod consts {
    /// One simulation step per animation frame; all speeds are in units per frame
    pub const SIM_DT: f32 = 1.0;

    /// Ground level never drops below this, whatever the viewport does
    pub const MIN_GROUND_LEVEL: f32 = 200.0;

    /// Ship mode falls with this fraction of cube gravity
    pub const SHIP_GRAVITY_FACTOR: f32 = 0.6;

    /// Portal geometry (all three portal kinds)
    pub const PORTAL_WIDTH: f32 = 30.0;
    pub const PORTAL_HEIGHT: f32 = 60.0;
    /// Distance of the portal's center from the gravity-relevant edge
    pub const PORTAL_OFFSET: f32 = 80.0;

    /// Spawn selection bands (cumulative, first match wins)
    pub const PORTAL_FLY_BAND: f32 = 0.05;
    pub const PORTAL_GRAVITY_BAND: f32 = 0.10;
    pub const PORTAL_NORMAL_BAND: f32 = 0.15;
    pub const CUBE_FLOATING_BAND: f32 = 0.35;
    pub const CUBE_TALL_BAND: f32 = 0.55;
    pub const CUBE_SPIKE_BAND: f32 = 0.75;
    pub const CUBE_NORMAL_BAND: f32 = 0.80;
    pub const SHIP_CEILING_BAND: f32 = 0.25;
    pub const SHIP_FLOOR_BAND: f32 = 0.50;

    /// Edge spikes in ship mode: width 30-50, height 40-80
    pub const EDGE_SPIKE_WIDTH: (f32, f32) = (30.0, 20.0);
    pub const EDGE_SPIKE_HEIGHT: (f32, f32) = (40.0, 40.0);
    /// Ship floating obstacle: width 40-70, height 30-70
    pub const SHIP_FLOATING_WIDTH: (f32, f32) = (40.0, 30.0);
    pub const SHIP_FLOATING_HEIGHT: (f32, f32) = (30.0, 40.0);
    /// Keep-out band at the top/bottom of the ship floating obstacle's y range
    pub const SHIP_FLOATING_MARGIN: f32 = 20.0;

    /// Cube floating block: width 40-70, height 30, 60-100 from the floor edge
    pub const CUBE_FLOATING_WIDTH: (f32, f32) = (40.0, 30.0);
    pub const CUBE_FLOATING_HEIGHT: f32 = 30.0;
    pub const CUBE_FLOATING_DISTANCE: (f32, f32) = (60.0, 40.0);
    /// Tall wall: width 20, height 70-100
    pub const TALL_WIDTH: f32 = 20.0;
    pub const TALL_HEIGHT: (f32, f32) = (70.0, 30.0);
    /// Cube spike: 30x30
    pub const SPIKE_SIZE: f32 = 30.0;
    /// Normal block: width 30-70, height 40-70
    pub const NORMAL_WIDTH: (f32, f32) = (30.0, 40.0);
    pub const NORMAL_HEIGHT: (f32, f32) = (40.0, 30.0);
    /// Platform: fixed 60x60
    pub const PLATFORM_SIZE: f32 = 60.0;

    /// Reward per unit of obstacle height
    pub const REWARD_PER_HEIGHT: f32 = 0.5;
}
