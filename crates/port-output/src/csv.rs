//! CSV output backend.
//!
//! Creates four files in the configured output directory:
//! - `tanker_lifecycles.csv`
//! - `resource_intervals.csv`
//! - `load_curves.csv`
//! - `histograms.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;
use log::info;

use crate::row::{HistogramRow, IntervalRow, LifecycleRow, LoadRow};
use crate::writer::ReportWriter;
use crate::OutputResult;

/// Writes a simulation report to four CSV files.
pub struct CsvReportWriter {
    lifecycles: Writer<File>,
    intervals:  Writer<File>,
    load:       Writer<File>,
    histograms: Writer<File>,
    finished:   bool,
}

impl CsvReportWriter {
    /// Create `dir` if needed, open the four CSV files and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut lifecycles = Writer::from_path(dir.join("tanker_lifecycles.csv"))?;
        lifecycles.write_record([
            "tanker_id",
            "entered_system_at",
            "processed_by_tow_at",
            "processed_by_line_at",
            "stuck_in_processing_line_at",
            "dispatched_by_tow_at",
            "left_system_at",
            "time_in_queue",
            "tow_process_time",
            "time_on_process_line",
            "time_stuck",
            "time_in_system",
            "processed",
        ])?;

        let mut intervals = Writer::from_path(dir.join("resource_intervals.csv"))?;
        intervals.write_record(["kind", "entity_id", "state", "start", "duration"])?;

        let mut load = Writer::from_path(dir.join("load_curves.csv"))?;
        load.write_record(["curve", "start", "duration", "value"])?;

        let mut histograms = Writer::from_path(dir.join("histograms.csv"))?;
        histograms.write_record(["histogram", "bucket", "start", "end", "height"])?;

        info!("writing CSV report to {}", dir.display());
        Ok(Self { lifecycles, intervals, load, histograms, finished: false })
    }
}

fn opt(t: Option<f64>) -> String {
    t.map(|t| t.to_string()).unwrap_or_default()
}

impl ReportWriter for CsvReportWriter {
    fn write_lifecycles(&mut self, rows: &[LifecycleRow]) -> OutputResult<()> {
        for row in rows {
            self.lifecycles.write_record(&[
                row.tanker_id.to_string(),
                row.entered_system_at.to_string(),
                opt(row.processed_by_tow_at),
                opt(row.processed_by_line_at),
                opt(row.stuck_in_processing_line_at),
                opt(row.dispatched_by_tow_at),
                opt(row.left_system_at),
                row.time_in_queue.to_string(),
                row.tow_process_time.to_string(),
                row.time_on_process_line.to_string(),
                row.time_stuck.to_string(),
                row.time_in_system.to_string(),
                (row.has_been_processed as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_intervals(&mut self, rows: &[IntervalRow]) -> OutputResult<()> {
        for row in rows {
            self.intervals.write_record(&[
                row.kind.to_string(),
                row.entity_id.to_string(),
                row.state.to_string(),
                row.start.to_string(),
                row.duration.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_load(&mut self, rows: &[LoadRow]) -> OutputResult<()> {
        for row in rows {
            self.load.write_record(&[
                row.curve.to_string(),
                row.start.to_string(),
                row.duration.to_string(),
                row.value.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_histograms(&mut self, rows: &[HistogramRow]) -> OutputResult<()> {
        for row in rows {
            self.histograms.write_record(&[
                row.histogram.to_string(),
                row.bucket.to_string(),
                row.start.to_string(),
                row.end.to_string(),
                row.height.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.lifecycles.flush()?;
        self.intervals.flush()?;
        self.load.flush()?;
        self.histograms.flush()?;
        Ok(())
    }
}
