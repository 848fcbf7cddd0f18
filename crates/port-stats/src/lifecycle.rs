//! Per-tanker milestone timestamps and the durations derived from them.

use port_core::{SimTime, TankerId, TankerStage};

/// One tanker's path through the port.
///
/// Time spent in a stage is credited when the tanker leaves it, so for a
/// processed tanker the stage durations add up to `time_in_system`:
///
/// ```text
/// time_in_queue + tow_process_time + time_on_process_line
///     + time_while_stuck_in_processing_line == time_in_system
/// ```
///
/// `tow_process_time` covers both tow legs (to the line and back out).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TankerLifecycle {
    pub id: TankerId,

    pub entered_system_at:           SimTime,
    pub processed_by_tow_at:         Option<SimTime>,
    pub processed_by_line_at:        Option<SimTime>,
    pub stuck_in_processing_line_at: Option<SimTime>,
    pub dispatched_by_tow_at:        Option<SimTime>,
    pub left_system_at:              Option<SimTime>,

    pub time_in_queue:                       f64,
    pub tow_process_time:                    f64,
    pub time_on_process_line:                f64,
    pub time_while_stuck_in_processing_line: f64,
    pub time_in_system:                      f64,

    /// `true` iff the tanker left the system before the horizon.
    pub has_been_processed: bool,

    /// Stage the tanker is in and when it entered it.
    stage:    TankerStage,
    stage_at: SimTime,
}

impl TankerLifecycle {
    /// Open a record for a tanker first seen at `at`.
    pub fn new(id: TankerId, at: SimTime) -> Self {
        Self {
            id,
            entered_system_at: at,
            processed_by_tow_at: None,
            processed_by_line_at: None,
            stuck_in_processing_line_at: None,
            dispatched_by_tow_at: None,
            left_system_at: None,
            time_in_queue: 0.0,
            tow_process_time: 0.0,
            time_on_process_line: 0.0,
            time_while_stuck_in_processing_line: 0.0,
            time_in_system: 0.0,
            has_been_processed: false,
            stage: TankerStage::InQueue,
            stage_at: at,
        }
    }

    /// The stage the tanker was last seen entering.
    pub fn stage(&self) -> TankerStage {
        self.stage
    }

    /// Record entry into `stage` at `at`, crediting the stage being left.
    pub fn record(&mut self, stage: TankerStage, at: SimTime) {
        match stage {
            TankerStage::InQueue               => return,
            TankerStage::ProcessedByTow        => self.processed_by_tow_at = Some(at),
            TankerStage::ProcessedByLine       => self.processed_by_line_at = Some(at),
            TankerStage::StuckInProcessingLine => self.stuck_in_processing_line_at = Some(at),
            TankerStage::DispatchedByTow       => self.dispatched_by_tow_at = Some(at),
            TankerStage::LeftSystem            => self.left_system_at = Some(at),
        }
        self.close_stage(at);
        self.stage = stage;
        self.stage_at = at;

        if stage == TankerStage::LeftSystem {
            self.time_in_system = self.stage_total();
            self.has_been_processed = true;
        }
    }

    /// Close a censored record at the horizon: the open stage and the time
    /// in system both end at `horizon`.
    pub fn censor(&mut self, horizon: SimTime) {
        if self.has_been_processed {
            return;
        }
        self.close_stage(horizon);
        self.stage_at = horizon;
        self.time_in_system = self.stage_total();
    }

    /// Sum of the four stage durations; `time_in_system` once closed.
    pub fn stage_total(&self) -> f64 {
        self.time_in_queue
            + self.tow_process_time
            + self.time_on_process_line
            + self.time_while_stuck_in_processing_line
    }

    fn close_stage(&mut self, at: SimTime) {
        let spent = at - self.stage_at;
        match self.stage {
            TankerStage::InQueue => self.time_in_queue += spent,
            TankerStage::ProcessedByTow | TankerStage::DispatchedByTow => {
                self.tow_process_time += spent
            }
            TankerStage::ProcessedByLine       => self.time_on_process_line += spent,
            TankerStage::StuckInProcessingLine => self.time_while_stuck_in_processing_line += spent,
            TankerStage::LeftSystem            => {}
        }
    }
}
