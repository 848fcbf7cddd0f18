//! Idle/working history of one tow or processing line.

use port_core::{EntityKind, ResourceState, SimTime};

/// A run of one resource in a single state.  `duration` stays 0 until the
/// next state change (or the horizon) closes the interval.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateInterval {
    pub state:    ResourceState,
    pub start:    SimTime,
    pub duration: f64,
}

impl StateInterval {
    pub fn end(&self) -> SimTime {
        self.start.offset(self.duration)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServingEntityStatistics {
    pub kind:         EntityKind,
    pub id:           u32,
    pub intervals:    Vec<StateInterval>,
    /// Filled in by [`finalize`][Self::finalize].
    pub idle_time:    f64,
    /// Filled in by [`finalize`][Self::finalize].
    pub working_time: f64,
}

impl ServingEntityStatistics {
    pub fn new(kind: EntityKind, id: u32) -> Self {
        Self { kind, id, intervals: Vec::new(), idle_time: 0.0, working_time: 0.0 }
    }

    /// Close the open interval at `at` and open a new one in `state`.
    pub fn record(&mut self, state: ResourceState, at: SimTime) {
        self.close_at(at);
        self.intervals.push(StateInterval { state, start: at, duration: 0.0 });
    }

    /// Close the last interval at `horizon` and total the time per state.
    pub fn finalize(&mut self, horizon: SimTime) {
        self.close_at(horizon);
        self.idle_time = self.time_in(ResourceState::Idle);
        self.working_time = self.time_in(ResourceState::Working);
    }

    /// Fraction of `horizon` spent working, in `[0, 1]`.
    pub fn working_share(&self, horizon: SimTime) -> f64 {
        let total = horizon.as_f64();
        if total <= 0.0 { 0.0 } else { self.working_time / total }
    }

    /// Fraction of `horizon` spent idle, in `[0, 1]`.
    pub fn idle_share(&self, horizon: SimTime) -> f64 {
        let total = horizon.as_f64();
        if total <= 0.0 { 0.0 } else { self.idle_time / total }
    }

    fn close_at(&mut self, at: SimTime) {
        if let Some(last) = self.intervals.last_mut() {
            last.duration = (at - last.start).max(0.0);
        }
    }

    fn time_in(&self, state: ResourceState) -> f64 {
        self.intervals.iter().filter(|i| i.state == state).map(|i| i.duration).sum()
    }
}
