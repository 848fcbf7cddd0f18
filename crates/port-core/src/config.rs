//! Run configuration.
//!
//! Typically loaded from JSON by the application crate (with the `serde`
//! feature) and handed to the scheduler builder, which validates it before
//! anything is scheduled.

use crate::{PortError, PortResult, SimTime};

const SECS_PER_HOUR: f64 = 3_600.0;

// ── Intensity ─────────────────────────────────────────────────────────────────

/// A `[start, end]` window for a uniformly drawn duration.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intensity {
    pub start: f64,
    pub end:   f64,
}

impl Intensity {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// A degenerate window that always yields `value`.
    pub fn fixed(value: f64) -> Self {
        Self { start: value, end: value }
    }

    /// Window given in hours, stored in seconds.
    pub fn hours(start: f64, end: f64) -> Self {
        Self { start: start * SECS_PER_HOUR, end: end * SECS_PER_HOUR }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.start == self.end
    }

    /// Reject `end < start`, negative durations and non-finite bounds.
    pub fn validate(&self, what: &'static str) -> PortResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(PortError::Config(format!("{what} window must be finite")));
        }
        if self.end < self.start {
            return Err(PortError::InvalidIntensity { what, start: self.start, end: self.end });
        }
        if self.start < 0.0 {
            return Err(PortError::Config(format!(
                "{what} window starts at {} but durations cannot be negative",
                self.start
            )));
        }
        Ok(())
    }
}

// ── PortConfig ────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PortConfig {
    /// Horizon: the run stops when the clock reaches this time.
    pub simulation_time: f64,

    pub processing_line_count: u32,
    pub tow_count:             u32,

    /// Interval between consecutive tanker arrivals.
    pub tanker_intensity: Intensity,

    /// Duration of one tow leg (to the line, or away from it).
    pub tow_intensity: Intensity,

    /// Time a line needs to refill one tanker.
    pub processing_line_intensity: Intensity,

    /// Events due within this window of the selected time fire on the same
    /// tick.  Default: 5.
    pub coalescing_tolerance: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,
}

impl Default for PortConfig {
    /// One simulated week in seconds with three lines and a single tow.
    fn default() -> Self {
        Self {
            simulation_time:           7.0 * 24.0 * SECS_PER_HOUR,
            processing_line_count:     3,
            tow_count:                 1,
            tanker_intensity:          Intensity::hours(4.0, 18.0),
            tow_intensity:             Intensity::hours(1.0, 1.0),
            processing_line_intensity: Intensity::hours(15.0, 25.0),
            coalescing_tolerance:      5.0,
            seed:                      42,
        }
    }
}

impl PortConfig {
    /// The horizon as a `SimTime`.
    #[inline]
    pub fn horizon(&self) -> SimTime {
        SimTime(self.simulation_time)
    }

    /// Check every precondition the scheduler relies on.
    pub fn validate(&self) -> PortResult<()> {
        if !self.simulation_time.is_finite() || self.simulation_time <= 0.0 {
            return Err(PortError::Config(format!(
                "simulation_time must be positive, got {}",
                self.simulation_time
            )));
        }
        if !self.coalescing_tolerance.is_finite() || self.coalescing_tolerance < 0.0 {
            return Err(PortError::Config(format!(
                "coalescing_tolerance must be non-negative, got {}",
                self.coalescing_tolerance
            )));
        }
        self.tanker_intensity.validate("tanker arrival")?;
        self.tow_intensity.validate("tow")?;
        self.processing_line_intensity.validate("processing line")?;
        if self.tanker_intensity.end <= 0.0 {
            return Err(PortError::Config(
                "tanker arrival window must allow a positive interval".into(),
            ));
        }
        Ok(())
    }
}
