//! The `ReportWriter` trait implemented by backend writers.

use port_stats::SimulationReport;

use crate::row::{self, HistogramRow, IntervalRow, LifecycleRow, LoadRow};
use crate::OutputResult;

/// One method per table, plus a provided [`write_report`][Self::write_report]
/// that extracts every table from a report and flushes.
pub trait ReportWriter {
    fn write_lifecycles(&mut self, rows: &[LifecycleRow]) -> OutputResult<()>;

    fn write_intervals(&mut self, rows: &[IntervalRow]) -> OutputResult<()>;

    fn write_load(&mut self, rows: &[LoadRow]) -> OutputResult<()>;

    fn write_histograms(&mut self, rows: &[HistogramRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;

    fn write_report(&mut self, report: &SimulationReport) -> OutputResult<()> {
        self.write_lifecycles(&row::lifecycle_rows(report))?;
        self.write_intervals(&row::interval_rows(report))?;
        self.write_load(&row::load_rows(report))?;
        self.write_histograms(&row::histogram_rows(report))?;
        self.finish()
    }
}
