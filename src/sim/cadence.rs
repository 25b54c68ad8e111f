//! Fixed-delay periodic triggers fed by simulation time
//!
//! A cadence only advances when the session feeds it time, so stopping a
//! cadence is just not calling [`Cadence::advance`]. Rescheduling replaces
//! the countdown outright, which makes double-scheduling impossible.

/// Interval timer driven by elapsed milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    interval_ms: f64,
    elapsed_ms: f64,
}

impl Cadence {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms.max(1)),
            elapsed_ms: 0.0,
        }
    }

    /// Feed `dt_ms` of time; returns how many times the interval elapsed
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        self.elapsed_ms += dt_ms.max(0.0);
        let mut fired = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fired += 1;
        }
        fired
    }

    /// Switch to a new interval and start a fresh countdown
    pub fn reschedule(&mut self, interval_ms: u32) {
        *self = Self::new(interval_ms);
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms as u32
    }
}
