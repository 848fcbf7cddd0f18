//! `port-stats`: turns the scheduler's notifications into a report.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`collector`] | `StatisticsCollector`: a `PortObserver` that records a run  |
//! | [`lifecycle`] | `TankerLifecycle`: per-tanker milestones and durations      |
//! | [`serving`]   | `ServingEntityStatistics`: idle/working history per resource |
//! | [`busyness`]  | load and queue-length step functions                         |
//! | [`histogram`] | equal-width histogram builder                                |
//! | [`report`]    | `SimulationReport`, `TankerAverages`                         |
//! | [`error`]     | `StatsError`, `StatsResult<T>`                               |
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut stats = StatisticsCollector::new();
//! scheduler.run(&mut stats)?;
//! let report = stats.finalize(scheduler.now())?;
//! println!("{} of {} tankers served", report.processed, report.arrived);
//! ```

pub mod busyness;
pub mod collector;
pub mod error;
pub mod histogram;
pub mod lifecycle;
pub mod report;
pub mod serving;

#[cfg(test)]
mod tests;

pub use busyness::{
    BusynessSample, BusynessState, QueueLengthState, aggregate_busyness, queue_length_curve,
};
pub use collector::StatisticsCollector;
pub use error::{StatsError, StatsResult};
pub use histogram::{
    BUCKET_EPSILON, DEFAULT_BUCKETS, HistogramData, HistogramItem, build_histogram, observed_histogram,
};
pub use lifecycle::TankerLifecycle;
pub use report::{SimulationReport, TankerAverages};
pub use serving::{ServingEntityStatistics, StateInterval};
