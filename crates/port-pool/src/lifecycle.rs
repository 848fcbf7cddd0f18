//! `LifecycleTracker`: where every tanker currently is.
//!
//! # Stage graph
//!
//! ```text
//! enqueue ──▶ InQueue ──process_by_tow──▶ ProcessedByTow ──process_by_line──▶ ProcessedByLine
//!                                                                              │          │
//!                                                            mark_stuck ◀──────┘          │
//!                                                                 │                       │
//!                                                    StuckInProcessingLine                │
//!                                                                 │                       │
//!                                                                 └──▶ dispatch_by_tow ◀──┘
//!                                                                             │
//!                                                  DispatchedByTow ──remove_from_system──▶ (gone)
//! ```
//!
//! Each transition looks the tanker up in its required predecessor stage.
//! A tanker anywhere else is a [`PoolError::Lifecycle`]; the run cannot
//! continue from an inconsistent state.  Each bucket keeps arrival order so
//! `first()` is the head of the waiting queue.

use std::collections::{HashMap, VecDeque};

use port_core::{
    Assignment, EntityKind, Notification, PortObserver, SimTime, Tanker, TankerId, TankerStage,
    Tow,
};

use crate::{PoolError, PoolResult};

const STORED_STAGES: usize = TankerStage::STORED.len();

/// Multi-bucket container enforcing single occupancy per tanker.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    buckets:  [VecDeque<Tanker>; STORED_STAGES],
    stage_of: HashMap<TankerId, TankerStage>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// A newly arrived tanker joins the waiting queue.
    pub fn enqueue<O: PortObserver + ?Sized>(
        &mut self,
        tanker:   Tanker,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<()> {
        if self.stage_of.contains_key(&tanker.id) {
            return Err(PoolError::DuplicateId { kind: EntityKind::Tanker, id: tanker.id.raw() });
        }
        self.put(tanker, TankerStage::InQueue, now, observer);
        Ok(())
    }

    /// A tow picked the tanker up from the queue; `assignment` records the
    /// tow and the line it is heading for.
    pub fn process_by_tow<O: PortObserver + ?Sized>(
        &mut self,
        id:         TankerId,
        assignment: Assignment,
        now:        SimTime,
        observer:   &mut O,
    ) -> PoolResult<Tanker> {
        let mut tanker = self.take(id, "process_by_tow", &[TankerStage::InQueue])?;
        tanker.assignment = Some(assignment);
        self.put(tanker, TankerStage::ProcessedByTow, now, observer);
        Ok(tanker)
    }

    /// The tow delivered the tanker and the line started refilling it.
    pub fn process_by_line<O: PortObserver + ?Sized>(
        &mut self,
        id:       TankerId,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<Tanker> {
        let tanker = self.take(id, "process_by_line", &[TankerStage::ProcessedByTow])?;
        self.put(tanker, TankerStage::ProcessedByLine, now, observer);
        Ok(tanker)
    }

    /// Refill finished but no tow is free to take the tanker away.
    pub fn mark_stuck_in_processing_line<O: PortObserver + ?Sized>(
        &mut self,
        id:       TankerId,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<Tanker> {
        let tanker =
            self.take(id, "mark_stuck_in_processing_line", &[TankerStage::ProcessedByLine])?;
        self.put(tanker, TankerStage::StuckInProcessingLine, now, observer);
        Ok(tanker)
    }

    /// `tow` takes the tanker off its line, either straight after the refill
    /// or after it was stuck waiting.
    pub fn dispatch_by_tow<O: PortObserver + ?Sized>(
        &mut self,
        id:       TankerId,
        tow:      Tow,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<Tanker> {
        let mut tanker = self.take(
            id,
            "dispatch_by_tow",
            &[TankerStage::ProcessedByLine, TankerStage::StuckInProcessingLine],
        )?;
        if let Some(a) = tanker.assignment.as_mut() {
            a.tow = tow;
        }
        self.put(tanker, TankerStage::DispatchedByTow, now, observer);
        Ok(tanker)
    }

    /// The tanker leaves the port.  It is no longer tracked afterwards.
    pub fn remove_from_system<O: PortObserver + ?Sized>(
        &mut self,
        id:       TankerId,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<Tanker> {
        let tanker = self.take(id, "remove_from_system", &[TankerStage::DispatchedByTow])?;
        observer.notify(&Notification::Tanker {
            tanker: id,
            time:   now,
            stage:  TankerStage::LeftSystem,
        });
        Ok(tanker)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Is any tanker waiting in the queue?
    #[inline]
    pub fn any(&self) -> bool {
        self.bucket(TankerStage::InQueue).is_some_and(|b| !b.is_empty())
    }

    #[inline]
    pub fn any_stuck_in_processing_line(&self) -> bool {
        self.bucket(TankerStage::StuckInProcessingLine).is_some_and(|b| !b.is_empty())
    }

    /// Head of the waiting queue.
    pub fn first(&self) -> Option<&Tanker> {
        self.bucket(TankerStage::InQueue).and_then(VecDeque::front)
    }

    /// The tanker that has been stuck the longest.
    pub fn first_stuck(&self) -> Option<&Tanker> {
        self.bucket(TankerStage::StuckInProcessingLine).and_then(VecDeque::front)
    }

    pub fn stage(&self, id: TankerId) -> Option<TankerStage> {
        self.stage_of.get(&id).copied()
    }

    pub fn get(&self, id: TankerId) -> Option<&Tanker> {
        let stage = self.stage(id)?;
        self.bucket(stage)?.iter().find(|t| t.id == id)
    }

    /// Number of tankers currently in `stage` (0 for `LeftSystem`).
    pub fn count(&self, stage: TankerStage) -> usize {
        self.bucket(stage).map_or(0, VecDeque::len)
    }

    /// Tankers tracked in any stored stage.
    pub fn len(&self) -> usize {
        self.stage_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stage_of.is_empty()
    }

    /// Every tracked tanker appears in exactly one bucket, and that bucket
    /// agrees with the stage index.
    pub fn is_consistent(&self) -> bool {
        let stored: usize = self.buckets.iter().map(VecDeque::len).sum();
        stored == self.stage_of.len()
            && TankerStage::STORED.iter().all(|&stage| {
                self.bucket(stage).is_some_and(|b| {
                    b.iter().all(|t| self.stage_of.get(&t.id) == Some(&stage))
                })
            })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// The bucket holding `stage`; `None` for `LeftSystem`.
    fn bucket(&self, stage: TankerStage) -> Option<&VecDeque<Tanker>> {
        stage.bucket().map(|i| &self.buckets[i])
    }

    fn take(
        &mut self,
        id:       TankerId,
        op:       &'static str,
        expected: &'static [TankerStage],
    ) -> PoolResult<Tanker> {
        let found = self.stage_of.get(&id).copied();
        let stage = match found {
            Some(s) if expected.contains(&s) => s,
            _ => return Err(PoolError::Lifecycle { tanker: id, op, expected, found }),
        };
        let Some(index) = stage.bucket() else {
            return Err(PoolError::Lifecycle { tanker: id, op, expected, found });
        };
        let bucket = &mut self.buckets[index];
        let pos = bucket
            .iter()
            .position(|t| t.id == id)
            .ok_or(PoolError::Lifecycle { tanker: id, op, expected, found })?;
        self.stage_of.remove(&id);
        bucket
            .remove(pos)
            .ok_or(PoolError::Lifecycle { tanker: id, op, expected, found })
    }

    fn put<O: PortObserver + ?Sized>(
        &mut self,
        tanker:   Tanker,
        stage:    TankerStage,
        now:      SimTime,
        observer: &mut O,
    ) {
        if let Some(index) = stage.bucket() {
            self.buckets[index].push_back(tanker);
            self.stage_of.insert(tanker.id, stage);
        }
        observer.notify(&Notification::Tanker { tanker: tanker.id, time: now, stage });
    }
}
