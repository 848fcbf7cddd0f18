//! State-change notifications and the observer trait that receives them.
//!
//! Resource pools and the lifecycle tracker emit a [`Notification`] for every
//! state change.  They do not own subscribers; the scheduler passes its
//! observer into each mutating call, so notifications are delivered
//! synchronously on the scheduler's thread, in the order the changes happen.

use std::fmt;

use crate::{EntityKind, SimTime, TankerId};

/// Whether a reusable resource is available or checked out.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceState {
    Idle,
    Working,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Idle    => f.write_str("idle"),
            ResourceState::Working => f.write_str("working"),
        }
    }
}

/// The life stages a tanker moves through, in order.
///
/// `LeftSystem` is terminal and is never stored by the lifecycle tracker.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TankerStage {
    InQueue,
    ProcessedByTow,
    ProcessedByLine,
    StuckInProcessingLine,
    DispatchedByTow,
    LeftSystem,
}

impl TankerStage {
    /// Stages that occupy a tracker bucket.
    pub const STORED: [TankerStage; 5] = [
        TankerStage::InQueue,
        TankerStage::ProcessedByTow,
        TankerStage::ProcessedByLine,
        TankerStage::StuckInProcessingLine,
        TankerStage::DispatchedByTow,
    ];

    /// Bucket index for stored stages; `None` for `LeftSystem`.
    pub fn bucket(self) -> Option<usize> {
        match self {
            TankerStage::InQueue               => Some(0),
            TankerStage::ProcessedByTow        => Some(1),
            TankerStage::ProcessedByLine       => Some(2),
            TankerStage::StuckInProcessingLine => Some(3),
            TankerStage::DispatchedByTow       => Some(4),
            TankerStage::LeftSystem            => None,
        }
    }
}

impl fmt::Display for TankerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TankerStage::InQueue               => "in queue",
            TankerStage::ProcessedByTow        => "processed by tow",
            TankerStage::ProcessedByLine       => "processed by line",
            TankerStage::StuckInProcessingLine => "stuck in processing line",
            TankerStage::DispatchedByTow       => "dispatched by tow",
            TankerStage::LeftSystem            => "left system",
        };
        f.write_str(s)
    }
}

/// One state change, stamped with the clock time at which it happened.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// A tow or processing line was pushed idle or popped to work.
    Resource {
        kind:  EntityKind,
        id:    u32,
        time:  SimTime,
        state: ResourceState,
    },
    /// A tanker entered a new life stage.
    Tanker {
        tanker: TankerId,
        time:   SimTime,
        stage:  TankerStage,
    },
}

impl Notification {
    pub fn time(&self) -> SimTime {
        match self {
            Notification::Resource { time, .. } | Notification::Tanker { time, .. } => *time,
        }
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked synchronously by pools, the tracker, and the scheduler.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait PortObserver {
    /// Called for every pool push/pop and every tanker transition.
    fn notify(&mut self, _notification: &Notification) {}

    /// Called after the scheduler finished dispatching one coalesced batch.
    ///
    /// `fired` is the number of events in the batch.
    fn on_tick_end(&mut self, _now: SimTime, _fired: usize) {}

    /// Called once when the clock reaches the horizon.
    fn on_sim_end(&mut self, _horizon: SimTime) {}
}

/// A [`PortObserver`] that does nothing.
pub struct NoopObserver;

impl PortObserver for NoopObserver {}

/// Records every notification in arrival order.  Handy in tests.
#[derive(Default, Debug)]
pub struct NotificationLog {
    pub notifications: Vec<Notification>,
    pub ticks:         Vec<SimTime>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tanker transitions for `tanker`, in order.
    pub fn stages_of(&self, tanker: TankerId) -> Vec<(SimTime, TankerStage)> {
        self.notifications
            .iter()
            .filter_map(|n| match *n {
                Notification::Tanker { tanker: t, time, stage } if t == tanker => Some((time, stage)),
                _ => None,
            })
            .collect()
    }
}

impl PortObserver for NotificationLog {
    fn notify(&mut self, notification: &Notification) {
        self.notifications.push(*notification);
    }

    fn on_tick_end(&mut self, now: SimTime, _fired: usize) {
        self.ticks.push(now);
    }
}

/// Fans every callback out to several subscribers, in subscription order.
#[derive(Default)]
pub struct NotificationChannel<'a> {
    subscribers: Vec<&'a mut dyn PortObserver>,
}

impl<'a> NotificationChannel<'a> {
    pub fn new() -> Self {
        Self { subscribers: Vec::new() }
    }

    pub fn subscribe(mut self, observer: &'a mut dyn PortObserver) -> Self {
        self.subscribers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl PortObserver for NotificationChannel<'_> {
    fn notify(&mut self, notification: &Notification) {
        for s in &mut self.subscribers {
            s.notify(notification);
        }
    }

    fn on_tick_end(&mut self, now: SimTime, fired: usize) {
        for s in &mut self.subscribers {
            s.on_tick_end(now, fired);
        }
    }

    fn on_sim_end(&mut self, horizon: SimTime) {
        for s in &mut self.subscribers {
            s.on_sim_end(horizon);
        }
    }
}
