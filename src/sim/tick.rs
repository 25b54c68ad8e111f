//! Fixed timestep driver
//!
//! Converts variable display-frame deltas into whole `SIM_DT` steps so a run
//! replays identically for a given seed regardless of frame rate.

use super::session::GameSession;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted before clamping (tab switches, debugger stops)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates frame time and feeds the session in fixed steps
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `frame_dt` seconds and run as many fixed steps as fit.
    ///
    /// Returns the number of steps taken (at most `MAX_SUBSTEPS`).
    pub fn advance(&mut self, session: &mut GameSession, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            session.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Forget any partial step (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
