//! Plain data row types written by output backends, and their extraction
//! from a report.

use port_core::{EntityKind, ResourceState};
use port_stats::{HistogramData, SimulationReport, TankerLifecycle};

/// One tanker's milestones and durations.  Missing milestones are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifecycleRow {
    pub tanker_id:                   u32,
    pub entered_system_at:           f64,
    pub processed_by_tow_at:         Option<f64>,
    pub processed_by_line_at:        Option<f64>,
    pub stuck_in_processing_line_at: Option<f64>,
    pub dispatched_by_tow_at:        Option<f64>,
    pub left_system_at:              Option<f64>,
    pub time_in_queue:               f64,
    pub tow_process_time:            f64,
    pub time_on_process_line:        f64,
    pub time_stuck:                  f64,
    pub time_in_system:              f64,
    pub has_been_processed:          bool,
}

impl From<&TankerLifecycle> for LifecycleRow {
    fn from(l: &TankerLifecycle) -> Self {
        Self {
            tanker_id:                   l.id.raw(),
            entered_system_at:           l.entered_system_at.as_f64(),
            processed_by_tow_at:         l.processed_by_tow_at.map(|t| t.as_f64()),
            processed_by_line_at:        l.processed_by_line_at.map(|t| t.as_f64()),
            stuck_in_processing_line_at: l.stuck_in_processing_line_at.map(|t| t.as_f64()),
            dispatched_by_tow_at:        l.dispatched_by_tow_at.map(|t| t.as_f64()),
            left_system_at:              l.left_system_at.map(|t| t.as_f64()),
            time_in_queue:               l.time_in_queue,
            tow_process_time:            l.tow_process_time,
            time_on_process_line:        l.time_on_process_line,
            time_stuck:                  l.time_while_stuck_in_processing_line,
            time_in_system:              l.time_in_system,
            has_been_processed:          l.has_been_processed,
        }
    }
}

/// One idle/working interval of one resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRow {
    pub kind:      EntityKind,
    pub entity_id: u32,
    pub state:     ResourceState,
    pub start:     f64,
    pub duration:  f64,
}

/// One step of a named curve.  `value` is a load percentage for the
/// resource curves and a tanker count for `queue_length`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadRow {
    pub curve:    &'static str,
    pub start:    f64,
    pub duration: f64,
    pub value:    f64,
}

/// One bucket of a named histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramRow {
    pub histogram: &'static str,
    pub bucket:    usize,
    pub start:     f64,
    pub end:       f64,
    pub height:    u32,
}

// ── Extraction ────────────────────────────────────────────────────────────────

pub fn lifecycle_rows(report: &SimulationReport) -> Vec<LifecycleRow> {
    report.tankers.iter().map(LifecycleRow::from).collect()
}

/// Tows first, then processing lines, each in id order.
pub fn interval_rows(report: &SimulationReport) -> Vec<IntervalRow> {
    report
        .tows
        .iter()
        .chain(&report.lines)
        .flat_map(|s| {
            s.intervals.iter().map(move |i| IntervalRow {
                kind:      s.kind,
                entity_id: s.id,
                state:     i.state,
                start:     i.start.as_f64(),
                duration:  i.duration,
            })
        })
        .collect()
}

pub fn load_rows(report: &SimulationReport) -> Vec<LoadRow> {
    let busyness = |curve: &'static str, states: &[port_stats::BusynessState]| -> Vec<LoadRow> {
        states
            .iter()
            .map(|b| LoadRow {
                curve,
                start:    b.start_time.as_f64(),
                duration: b.duration,
                value:    b.load_percent,
            })
            .collect()
    };
    let mut rows = busyness("tow_load", &report.tow_load);
    rows.extend(busyness("line_load", &report.line_load));
    rows.extend(report.queue_length.iter().map(|q| LoadRow {
        curve:    "queue_length",
        start:    q.start_time.as_f64(),
        duration: q.duration,
        value:    q.length as f64,
    }));
    rows
}

pub fn histogram_rows(report: &SimulationReport) -> Vec<HistogramRow> {
    let named: [(&'static str, &HistogramData); 3] = [
        ("time_in_queue", &report.time_in_queue_histogram),
        ("time_on_process_line", &report.time_on_process_line_histogram),
        ("time_stuck_in_processing_line", &report.time_stuck_in_processing_line_histogram),
    ];
    named
        .into_iter()
        .flat_map(|(histogram, data)| {
            data.items.iter().enumerate().map(move |(bucket, item)| HistogramRow {
                histogram,
                bucket,
                start:  item.start,
                end:    item.end,
                height: item.height,
            })
        })
        .collect()
}
