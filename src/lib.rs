//! Moving Circles - A reflex arcade simulation engine
//!
//! Core modules:
//! - `sim`: Simulation (spawning, motion, expiry, scoring, particles, session state machine)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `persistence`: Best-score storage
//! - `audio`: Sound cue playback
//! - `platform`: Logger setup and browser bindings

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Reference frame rate the per-frame constants were tuned at
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Default play area in pixels
    pub const DEFAULT_AREA_WIDTH: f32 = 800.0;
    pub const DEFAULT_AREA_HEIGHT: f32 = 600.0;

    /// Initial session values
    pub const START_LIVES: u32 = 3;
    pub const START_LEVEL: u32 = 1;

    /// Points needed per level
    pub const POINTS_PER_LEVEL: u64 = 10;
}

/// Format whole seconds as `mm:ss`
pub fn format_elapsed(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
