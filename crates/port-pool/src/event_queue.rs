//! `EventQueue<E, S>`: pending events of one kind, in firing order.
//!
//! Events are keyed by `(time, insertion sequence)` in a `BTreeMap`, so
//! `peek`/`pop` always see the earliest event and ties fire in the order they
//! were scheduled.  The queue is composed with an [`IntervalSource`] that
//! answers "when is the next event of this kind due?".

use std::collections::BTreeMap;

use port_core::{IntervalSource, SimTime};

use crate::{PoolError, PoolResult};

/// Anything with an absolute firing time.
pub trait Scheduled {
    fn time(&self) -> SimTime;
}

/// A time-ordered queue of pending events bound to one interval source.
pub struct EventQueue<E: Scheduled, S: IntervalSource> {
    label:    &'static str,
    events:   BTreeMap<(SimTime, u64), E>,
    next_seq: u64,
    source:   S,
}

impl<E: Scheduled, S: IntervalSource> EventQueue<E, S> {
    /// `label` names the queue in error messages.
    pub fn new(label: &'static str, source: S) -> Self {
        Self { label, events: BTreeMap::new(), next_seq: 0, source }
    }

    /// Schedule `event`.
    ///
    /// Fails with [`PoolError::PastScheduling`] if the event is due before
    /// `now`.
    pub fn push(&mut self, event: E, now: SimTime) -> PoolResult<()> {
        let at = event.time();
        if at < now {
            return Err(PoolError::PastScheduling { queue: self.label, at, now });
        }
        self.events.insert((at, self.next_seq), event);
        self.next_seq += 1;
        Ok(())
    }

    /// The earliest pending event.
    pub fn peek(&self) -> Option<&E> {
        self.events.values().next()
    }

    /// Firing time of the earliest pending event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.keys().next().map(|&(t, _)| t)
    }

    /// Remove and return the earliest pending event.
    pub fn pop(&mut self) -> PoolResult<E> {
        self.events
            .pop_first()
            .map(|(_, e)| e)
            .ok_or(PoolError::EmptyEventQueue { queue: self.label })
    }

    /// Remove and return every event due at or before `until`, in order.
    pub fn pop_due(&mut self, until: SimTime) -> Vec<E> {
        let mut due = Vec::new();
        while let Some(entry) = self.events.first_entry() {
            if entry.key().0 > until {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// `now + draw()` from the bound interval source.
    pub fn next_event_time(&mut self, now: SimTime) -> SimTime {
        self.source.next_event_time(now)
    }

    #[inline]
    pub fn any(&self) -> bool {
        !self.events.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Pending events in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.events.values()
    }
}
