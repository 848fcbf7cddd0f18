//! Scheduled port events.

use std::fmt;

use port_core::{ProcessingLine, SimTime, Tanker, Tow};
use port_pool::Scheduled;

/// What happens to a tanker when its event fires.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TankerTransition {
    /// A new tanker reaches the port.
    ArrivedNew,
    /// The tow delivered the tanker to its line; refilling starts.
    StartedRefill,
    /// The line finished refilling.
    FinishedRefill,
    /// The tow finished taking the tanker away.
    LeftSystem,
}

/// A pending event.  One queue exists per variant.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PortEvent {
    Tanker {
        at:         SimTime,
        transition: TankerTransition,
        tanker:     Tanker,
    },
    /// `tow` becomes free.
    Tow { at: SimTime, tow: Tow },
    /// `line` becomes free.
    ProcessingLine { at: SimTime, line: ProcessingLine },
}

impl PortEvent {
    pub fn tanker(at: SimTime, transition: TankerTransition, tanker: Tanker) -> Self {
        PortEvent::Tanker { at, transition, tanker }
    }
}

impl Scheduled for PortEvent {
    fn time(&self) -> SimTime {
        match *self {
            PortEvent::Tanker { at, .. }
            | PortEvent::Tow { at, .. }
            | PortEvent::ProcessingLine { at, .. } => at,
        }
    }
}

impl fmt::Display for PortEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortEvent::Tanker { at, transition, tanker } => {
                write!(f, "{at} {transition:?} {}", tanker.id)
            }
            PortEvent::Tow { at, tow } => write!(f, "{at} {} free", tow.id),
            PortEvent::ProcessingLine { at, line } => write!(f, "{at} {} free", line.id),
        }
    }
}
