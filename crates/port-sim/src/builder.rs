//! Fluent builder for constructing a [`Scheduler`].

use port_core::{
    IdFactory, IntervalSource, PortConfig, PortError, SimClock, SimRng, UniformInterval,
};
use port_pool::{EventQueue, LifecycleTracker, ResourcePool};

use crate::{Scheduler, SimResult};

/// Child-RNG offsets, one per interval generator.
const TANKER_STREAM: u64 = 1;
const TOW_STREAM:    u64 = 2;
const LINE_STREAM:   u64 = 3;

/// Fluent builder for [`Scheduler`].
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                              |
/// |-----------------------------|--------------------------------------|
/// | `.coalescing_tolerance(d)`  | `config.coalescing_tolerance`        |
///
/// # Example
///
/// ```rust,ignore
/// let mut scheduler = SchedulerBuilder::new(config).build()?;
/// scheduler.run(&mut NoopObserver)?;
/// ```
///
/// For deterministic traces, swap the seeded uniform draws for any other
/// [`IntervalSource`] with [`build_with_sources`][Self::build_with_sources].
pub struct SchedulerBuilder {
    config:               PortConfig,
    coalescing_tolerance: Option<f64>,
}

impl SchedulerBuilder {
    pub fn new(config: PortConfig) -> Self {
        Self { config, coalescing_tolerance: None }
    }

    /// Override the configured coalescing window.
    pub fn coalescing_tolerance(mut self, tolerance: f64) -> Self {
        self.coalescing_tolerance = Some(tolerance);
        self
    }

    /// Validate the configuration and build a scheduler drawing uniformly
    /// from the configured windows, seeded from `config.seed`.
    pub fn build(self) -> SimResult<Scheduler<UniformInterval>> {
        self.config.validate()?;
        let mut root = SimRng::new(self.config.seed);
        let tanker = UniformInterval::new(self.config.tanker_intensity, root.child(TANKER_STREAM));
        let tow = UniformInterval::new(self.config.tow_intensity, root.child(TOW_STREAM));
        let line =
            UniformInterval::new(self.config.processing_line_intensity, root.child(LINE_STREAM));
        self.build_with_sources(tanker, tow, line)
    }

    /// Validate the configuration and build a scheduler around caller-supplied
    /// interval sources for arrivals, tow legs and line service.
    pub fn build_with_sources<S: IntervalSource>(
        self,
        tanker_interval: S,
        tow_interval:    S,
        line_interval:   S,
    ) -> SimResult<Scheduler<S>> {
        self.config.validate()?;
        let tolerance = self.coalescing_tolerance.unwrap_or(self.config.coalescing_tolerance);
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PortError::Config(format!(
                "coalescing tolerance must be non-negative, got {tolerance}"
            ))
            .into());
        }

        Ok(Scheduler {
            config:               self.config,
            coalescing_tolerance: tolerance,
            clock:                SimClock::new(),
            tankers:              LifecycleTracker::new(),
            tows:                 ResourcePool::new(),
            lines:                ResourcePool::new(),
            tanker_events:        EventQueue::new("tanker", tanker_interval),
            tow_events:           EventQueue::new("tow", tow_interval),
            line_events:          EventQueue::new("processing line", line_interval),
            tanker_ids:           IdFactory::new(),
            started:              false,
            finished:             false,
        })
    }
}
