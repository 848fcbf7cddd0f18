//! `port-output`: writes a [`SimulationReport`][port_stats::SimulationReport]
//! to disk.
//!
//! | File                      | One row per                                   |
//! |---------------------------|-----------------------------------------------|
//! | `tanker_lifecycles.csv`   | tanker                                        |
//! | `resource_intervals.csv`  | idle/working interval of a tow or line        |
//! | `load_curves.csv`         | step of the tow, line, or queue-length curve  |
//! | `histograms.csv`          | histogram bucket                              |
//!
//! # Usage
//!
//! ```rust,ignore
//! use port_output::{CsvReportWriter, ReportWriter};
//!
//! let mut writer = CsvReportWriter::new(Path::new("./output"))?;
//! writer.write_report(&report)?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;


pub use crate::csv::CsvReportWriter;
pub use error::{OutputError, OutputResult};
pub use row::{HistogramRow, IntervalRow, LifecycleRow, LoadRow};
pub use writer::ReportWriter;
