//! `StatisticsCollector`: records a run through the observer hooks.

use std::collections::BTreeMap;

use log::debug;
use port_core::{
    EntityKind, Notification, PortObserver, ResourceState, SimTime, TankerId, TankerStage,
};

use crate::busyness::{BusynessSample, aggregate_busyness, queue_length_curve};
use crate::histogram::{DEFAULT_BUCKETS, observed_histogram};
use crate::{ServingEntityStatistics, SimulationReport, StatsResult, TankerAverages, TankerLifecycle};

/// Subscribes to every pool and tracker notification and turns them into a
/// [`SimulationReport`] once the run is over.
///
/// Resource notifications open a new idle/working interval and close the
/// previous one.  Tanker notifications advance the tanker's
/// [`TankerLifecycle`].  Entering and leaving the queue are kept as `±1`
/// deltas for the queue-length curve.
#[derive(Debug)]
pub struct StatisticsCollector {
    tows:    BTreeMap<u32, ServingEntityStatistics>,
    lines:   BTreeMap<u32, ServingEntityStatistics>,
    tankers: BTreeMap<TankerId, TankerLifecycle>,

    queue_deltas: Vec<(SimTime, i64)>,
    arrived:      usize,
    processed:    usize,

    require_positive_duration: bool,
    histogram_buckets:         usize,
    ended_at:                  Option<SimTime>,
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self {
            tows: BTreeMap::new(),
            lines: BTreeMap::new(),
            tankers: BTreeMap::new(),
            queue_deltas: Vec::new(),
            arrived: 0,
            processed: 0,
            require_positive_duration: true,
            histogram_buckets: DEFAULT_BUCKETS,
            ended_at: None,
        }
    }

    /// Selection policy for load curves; see [`aggregate_busyness`].
    /// Defaults to `true`.
    pub fn require_positive_duration(mut self, require: bool) -> Self {
        self.require_positive_duration = require;
        self
    }

    /// Bucket count for the report histograms.  Defaults to
    /// [`DEFAULT_BUCKETS`].
    pub fn histogram_buckets(mut self, buckets: usize) -> Self {
        self.histogram_buckets = buckets;
        self
    }

    // ── Running counts ────────────────────────────────────────────────────

    pub fn arrived(&self) -> usize {
        self.arrived
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn unprocessed(&self) -> usize {
        self.arrived.saturating_sub(self.processed)
    }

    /// The horizon passed to `on_sim_end`, if the run has ended.
    pub fn ended_at(&self) -> Option<SimTime> {
        self.ended_at
    }

    pub fn lifecycle(&self, id: TankerId) -> Option<&TankerLifecycle> {
        self.tankers.get(&id)
    }

    // ── Finalization ──────────────────────────────────────────────────────

    /// Close every open interval at `horizon` and compute the aggregates.
    pub fn finalize(self, horizon: SimTime) -> StatsResult<SimulationReport> {
        let close = |map: BTreeMap<u32, ServingEntityStatistics>| -> Vec<ServingEntityStatistics> {
            map.into_values()
                .map(|mut s| {
                    s.finalize(horizon);
                    s
                })
                .collect()
        };
        let tows = close(self.tows);
        let lines = close(self.lines);

        let tankers: Vec<TankerLifecycle> = self
            .tankers
            .into_values()
            .map(|mut t| {
                t.censor(horizon);
                t
            })
            .collect();

        let averages = TankerAverages::over(&tankers);
        let processed: Vec<&TankerLifecycle> =
            tankers.iter().filter(|t| t.has_been_processed).collect();
        let pick = |f: fn(&TankerLifecycle) -> f64| processed.iter().map(|t| f(t)).collect::<Vec<_>>();
        let buckets = self.histogram_buckets;
        let time_in_queue_histogram = observed_histogram(&pick(|t| t.time_in_queue), buckets)?;
        let time_on_process_line_histogram =
            observed_histogram(&pick(|t| t.time_on_process_line), buckets)?;
        let time_stuck_in_processing_line_histogram =
            observed_histogram(&pick(|t| t.time_while_stuck_in_processing_line), buckets)?;

        let policy = self.require_positive_duration;
        let tow_load = aggregate_busyness(&BusynessSample::merge(&tows), horizon, policy);
        let line_load = aggregate_busyness(&BusynessSample::merge(&lines), horizon, policy);
        let queue_length = queue_length_curve(&self.queue_deltas, horizon);

        debug!(
            "statistics finalized at {horizon}: {} arrived, {} processed",
            self.arrived, self.processed
        );

        Ok(SimulationReport {
            horizon,
            tows,
            lines,
            tankers,
            arrived: self.arrived,
            processed: self.processed,
            unprocessed: self.arrived.saturating_sub(self.processed),
            averages,
            time_in_queue_histogram,
            time_on_process_line_histogram,
            time_stuck_in_processing_line_histogram,
            tow_load,
            line_load,
            queue_length,
        })
    }

    // ── Notification handling ─────────────────────────────────────────────

    fn on_resource(&mut self, kind: EntityKind, id: u32, time: SimTime, state: ResourceState) {
        let map = match kind {
            EntityKind::Tow            => &mut self.tows,
            EntityKind::ProcessingLine => &mut self.lines,
            EntityKind::Tanker         => return,
        };
        map.entry(id)
            .or_insert_with(|| ServingEntityStatistics::new(kind, id))
            .record(state, time);
    }

    fn on_tanker(&mut self, id: TankerId, time: SimTime, stage: TankerStage) {
        match stage {
            TankerStage::InQueue => {
                self.arrived += 1;
                self.queue_deltas.push((time, 1));
            }
            TankerStage::ProcessedByTow => self.queue_deltas.push((time, -1)),
            TankerStage::LeftSystem     => self.processed += 1,
            _ => {}
        }
        self.tankers
            .entry(id)
            .or_insert_with(|| TankerLifecycle::new(id, time))
            .record(stage, time);
    }
}

impl PortObserver for StatisticsCollector {
    fn notify(&mut self, notification: &Notification) {
        match *notification {
            Notification::Resource { kind, id, time, state } => self.on_resource(kind, id, time, state),
            Notification::Tanker { tanker, time, stage }     => self.on_tanker(tanker, time, stage),
        }
    }

    fn on_sim_end(&mut self, horizon: SimTime) {
        self.ended_at = Some(horizon);
    }
}
