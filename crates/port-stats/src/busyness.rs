//! Load-percentage and queue-length step functions.
//!
//! Input records are grouped into batches sharing one timestamp.  Each
//! curve covers `[0, horizon)` with strictly increasing start times; the
//! last step runs from the final batch to the horizon and zero-length steps
//! are dropped.
//!
//! The load curve is applied batch-first: after a batch at `t` is consumed,
//! the step `[previous batch, t)` is emitted with the resulting load.  The
//! queue-length curve emits the length that held over `[previous batch, t)`
//! before applying the batch's deltas.

use std::collections::BTreeMap;

use port_core::{ResourceState, SimTime};

use crate::ServingEntityStatistics;

/// One state record of one resource, as fed to [`aggregate_busyness`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BusynessSample {
    pub entity:   u32,
    pub state:    ResourceState,
    pub time:     SimTime,
    /// Length of the interval this record opened.
    pub duration: f64,
}

impl BusynessSample {
    /// Merge the histories of one resource kind into a single time-ordered
    /// stream.  Records sharing a time keep their per-resource order.
    pub fn merge(stats: &[ServingEntityStatistics]) -> Vec<BusynessSample> {
        let mut samples: Vec<BusynessSample> = stats
            .iter()
            .flat_map(|s| {
                s.intervals.iter().map(move |i| BusynessSample {
                    entity:   s.id,
                    state:    i.state,
                    time:     i.start,
                    duration: i.duration,
                })
            })
            .collect();
        samples.sort_by_key(|s| s.time);
        samples
    }
}

/// One step of a load curve.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusynessState {
    pub start_time:   SimTime,
    pub duration:     f64,
    /// Share of the population working, in `[0, 100]`.
    pub load_percent: f64,
}

/// One step of the queue-length curve.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueLengthState {
    pub start_time: SimTime,
    pub duration:   f64,
    pub length:     usize,
}

/// Convert the merged history of one resource kind into a load curve.
///
/// After each batch at `t` the step `[previous batch, t)` is emitted with
/// the load the batch produced; the tail `[last batch, horizon)` keeps the
/// final load.
///
/// Every distinct entity starts idle.  Within a batch, the first record of
/// an entity decides its new state; with `require_positive_duration` set,
/// records whose interval has zero length are skipped first, so a resource
/// released and re-acquired at the same instant counts as still working.
/// An entity with no eligible record in a batch keeps its state.
pub fn aggregate_busyness(
    samples:                   &[BusynessSample],
    horizon:                   SimTime,
    require_positive_duration: bool,
) -> Vec<BusynessState> {
    let mut working: BTreeMap<u32, bool> = samples.iter().map(|s| (s.entity, false)).collect();
    let population = working.len();
    let load = |working: &BTreeMap<u32, bool>| {
        if population == 0 {
            0.0
        } else {
            100.0 * working.values().filter(|w| **w).count() as f64 / population as f64
        }
    };

    let mut curve = Vec::new();
    let mut prev = SimTime::ZERO;
    for batch in samples.chunk_by(|a, b| a.time == b.time) {
        let at = batch[0].time;
        if at >= horizon {
            break;
        }
        let mut decided: Vec<u32> = Vec::new();
        for s in batch {
            if decided.contains(&s.entity) {
                continue;
            }
            if require_positive_duration && s.duration <= 0.0 {
                continue;
            }
            working.insert(s.entity, s.state == ResourceState::Working);
            decided.push(s.entity);
        }
        push_step(&mut curve, prev, at, load(&working), busyness_step);
        prev = at;
    }
    push_step(&mut curve, prev, horizon, load(&working), busyness_step);
    curve
}

/// Build the queue-length curve from `(time, ±1)` deltas in time order.
pub fn queue_length_curve(deltas: &[(SimTime, i64)], horizon: SimTime) -> Vec<QueueLengthState> {
    let mut curve = Vec::new();
    let mut prev = SimTime::ZERO;
    let mut length: i64 = 0;
    for batch in deltas.chunk_by(|a, b| a.0 == b.0) {
        let at = batch[0].0;
        if at >= horizon {
            break;
        }
        push_step(&mut curve, prev, at, length, queue_step);
        length += batch.iter().map(|(_, d)| d).sum::<i64>();
        prev = at;
    }
    push_step(&mut curve, prev, horizon, length, queue_step);
    curve
}

fn busyness_step(start_time: SimTime, duration: f64, load_percent: f64) -> BusynessState {
    BusynessState { start_time, duration, load_percent }
}

fn queue_step(start_time: SimTime, duration: f64, length: i64) -> QueueLengthState {
    QueueLengthState { start_time, duration, length: length.max(0) as usize }
}

fn push_step<V, T>(out: &mut Vec<T>, from: SimTime, to: SimTime, value: V, make: fn(SimTime, f64, V) -> T) {
    if to > from {
        out.push(make(from, to - from, value));
    }
}
