//! The finished statistics of one run.

use port_core::SimTime;

use crate::{
    BusynessState, HistogramData, QueueLengthState, ServingEntityStatistics, TankerLifecycle,
};

/// Mean durations over the tankers that left the system before the horizon.
/// All zero when none did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TankerAverages {
    pub time_in_queue:                       f64,
    pub tow_process_time:                    f64,
    pub time_on_process_line:                f64,
    pub time_while_stuck_in_processing_line: f64,
    pub time_in_system:                      f64,
}

impl TankerAverages {
    pub fn over<'a>(lifecycles: impl IntoIterator<Item = &'a TankerLifecycle>) -> Self {
        let mut sum = TankerAverages::default();
        let mut n = 0usize;
        for l in lifecycles.into_iter().filter(|l| l.has_been_processed) {
            sum.time_in_queue += l.time_in_queue;
            sum.tow_process_time += l.tow_process_time;
            sum.time_on_process_line += l.time_on_process_line;
            sum.time_while_stuck_in_processing_line += l.time_while_stuck_in_processing_line;
            sum.time_in_system += l.time_in_system;
            n += 1;
        }
        if n == 0 {
            return sum;
        }
        let n = n as f64;
        TankerAverages {
            time_in_queue:                       sum.time_in_queue / n,
            tow_process_time:                    sum.tow_process_time / n,
            time_on_process_line:                sum.time_on_process_line / n,
            time_while_stuck_in_processing_line: sum.time_while_stuck_in_processing_line / n,
            time_in_system:                      sum.time_in_system / n,
        }
    }
}

/// Everything a presentation layer needs from one run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationReport {
    pub horizon: SimTime,

    pub tows:    Vec<ServingEntityStatistics>,
    pub lines:   Vec<ServingEntityStatistics>,
    /// Ordered by tanker id; unprocessed records are censored at the horizon.
    pub tankers: Vec<TankerLifecycle>,

    pub arrived:     usize,
    pub processed:   usize,
    pub unprocessed: usize,

    pub averages: TankerAverages,

    /// Built from processed tankers only.
    pub time_in_queue_histogram:                 HistogramData,
    pub time_on_process_line_histogram:          HistogramData,
    pub time_stuck_in_processing_line_histogram: HistogramData,

    pub tow_load:     Vec<BusynessState>,
    pub line_load:    Vec<BusynessState>,
    pub queue_length: Vec<QueueLengthState>,
}

impl SimulationReport {
    /// Processed tanker records.
    pub fn processed_tankers(&self) -> impl Iterator<Item = &TankerLifecycle> {
        self.tankers.iter().filter(|t| t.has_been_processed)
    }

    /// Time-weighted mean of a load curve, in percent.
    pub fn mean_load(curve: &[BusynessState]) -> f64 {
        let (weighted, total) = curve
            .iter()
            .fold((0.0, 0.0), |(w, t), s| (w + s.load_percent * s.duration, t + s.duration));
        if total > 0.0 { weighted / total } else { 0.0 }
    }
}
