//! Interval sources: how long until the next event of a given kind.
//!
//! Event queues and service-time calculations are composed with an
//! `IntervalSource` instead of owning random-number logic themselves.  Tests
//! plug in [`FixedInterval`] to get fully deterministic traces.

use crate::{Intensity, SimRng, SimTime};

/// A pluggable duration policy.
pub trait IntervalSource {
    /// Draw one duration (simulation-time units, never negative).
    fn draw(&mut self) -> f64;

    /// `now + draw()`: the absolute time of the next event.
    fn next_event_time(&mut self, now: SimTime) -> SimTime {
        now + self.draw()
    }
}

impl<S: IntervalSource + ?Sized> IntervalSource for Box<S> {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }
}

// ── UniformInterval ───────────────────────────────────────────────────────────

/// Uniform draw over a configured `[start, end]` window.
///
/// A degenerate window (`start == end`) always yields `start`.
#[derive(Clone, Debug)]
pub struct UniformInterval {
    window: Intensity,
    rng:    SimRng,
}

impl UniformInterval {
    /// The caller is responsible for passing a validated window
    /// (see [`PortConfig::validate`][crate::PortConfig::validate]).
    pub fn new(window: Intensity, rng: SimRng) -> Self {
        Self { window, rng }
    }

    pub fn window(&self) -> Intensity {
        self.window
    }
}

impl IntervalSource for UniformInterval {
    fn draw(&mut self) -> f64 {
        if self.window.is_fixed() {
            return self.window.start;
        }
        self.rng.gen_range(self.window.start..=self.window.end)
    }
}

// ── FixedInterval ─────────────────────────────────────────────────────────────

/// Always returns the same duration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedInterval(pub f64);

impl IntervalSource for FixedInterval {
    #[inline]
    fn draw(&mut self) -> f64 {
        self.0
    }
}
