//! Scene clock.

use std::time::Duration;

/// Elapsed scene time, stepped explicitly once per tick.
///
/// The clock never reads the wall clock: the host passes each tick's delta, so a session driven
/// with the same deltas replays identically.
#[derive(Debug, Default, Clone, Copy)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    /// Clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Step the clock by one tick of length `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in seconds, the clock the animations run on.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Ticks since mount.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed tick length for a given rate in Hz.
pub fn tick_duration(hz: f64) -> Duration {
    Duration::from_secs_f64(1.0 / hz.max(1.0))
}
