//! Core error type.
//!
//! Downstream crates define their own error enums and wrap `PortError` as one
//! variant via `#[from]`, the same way `port-sim` wraps `PoolError`.

use thiserror::Error;

use crate::SimTime;

/// Errors raised by configuration validation and the simulation clock.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid {what} window: end {end} is before start {start}")]
    InvalidIntensity {
        what:  &'static str,
        start: f64,
        end:   f64,
    },

    #[error("clock regression: cannot move from {from} back to {to}")]
    ClockRegression { from: SimTime, to: SimTime },
}

/// Shorthand result type for `port-core`.
pub type PortResult<T> = Result<T, PortError>;
