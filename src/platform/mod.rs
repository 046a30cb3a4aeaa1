//! Platform abstraction layer
//!
//! The simulation reads time only through [`Clock`], so hosts can drive it
//! from wall time or from a fixed step.

use std::time::Instant;

use crate::consts::FRAME_MS;

/// Monotonic milliseconds since some fixed origin
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Deterministic clock that moves one frame per [`FixedStepClock::advance`]
#[derive(Debug, Clone, Default)]
pub struct FixedStepClock {
    frames: u64,
}

impl FixedStepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step one frame forward
    pub fn advance(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Clock for FixedStepClock {
    fn now_ms(&self) -> u64 {
        // Computed from the frame count so rounding never accumulates
        (self.frames as f64 * FRAME_MS) as u64
    }
}
