//! Simulation time model.
//!
//! # Design
//!
//! Time is a continuous `SimTime` value in simulation-time units (the default
//! configuration uses seconds).  Interval draws are uniform over real-valued
//! windows, so unlike an integer tick counter the canonical unit is `f64`.
//!
//! `SimTime` is totally ordered through [`f64::total_cmp`] so it can key a
//! `BTreeMap` directly.  NaN never enters the system: every time is built from
//! validated configuration windows.
//!
//! `SimClock` is the single authoritative "now".  It is owned by the
//! scheduler and only moves forward.

use std::cmp::Ordering;
use std::fmt;

use crate::{PortError, PortResult};

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute point on the simulation time axis.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Return the time `dt` units after `self`.
    #[inline]
    pub fn offset(self, dt: f64) -> SimTime {
        SimTime(self.0 + dt)
    }

    /// Units elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(t: f64) -> Self {
        SimTime(t)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation's notion of "now".
///
/// Passed by reference to everything that needs to read the time; only the
/// scheduler holds it mutably.  There is no process-wide clock, so independent
/// runs never share time state.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    /// A clock at `SimTime::ZERO`.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock to `to`.
    ///
    /// Staying at the same instant is allowed; moving backwards is a
    /// [`PortError::ClockRegression`].
    pub fn advance_to(&mut self, to: SimTime) -> PortResult<()> {
        if to < self.now {
            return Err(PortError::ClockRegression { from: self.now, to });
        }
        self.now = to;
        Ok(())
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.now.0.max(0.0);
        let days = (secs / 86_400.0).floor();
        let hours = (secs % 86_400.0) / 3_600.0;
        write!(f, "{} (day {} {:05.2}h)", self.now, days, hours)
    }
}
