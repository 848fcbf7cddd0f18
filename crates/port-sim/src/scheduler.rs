//! The `Scheduler` and its event loop.

use log::{debug, info, trace};
use port_core::{
    Assignment, IdFactory, IntervalSource, PortConfig, PortObserver, ProcessingLine, SimClock,
    SimTime, Tanker, TankerId, Tow, UniformInterval,
};
use port_pool::{EventQueue, LifecycleTracker, ResourcePool};

use crate::{PortEvent, SimError, SimResult, TankerTransition};

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// The mediator: owns the clock, the three event queues, the two resource
/// pools and the tanker tracker, and drives the event loop.
///
/// Each [`step`][Self::step] processes one tick:
///
/// 1. **Select**: peek the three queue heads; a head earlier than the clock
///    is a stale event.  The earliest head becomes the new "now".
/// 2. **Guard**: a waiting tanker with an idle tow and an idle line means the
///    previous tick missed a pairing.
/// 3. **Coalesce**: every event due within `coalescing_tolerance` of now is
///    popped and fires at now, in time order (ties: tow, line, tanker queue,
///    then scheduling order).
/// 4. **Dispatch**: each event updates pools and tracker, pairs resources
///    where possible, and schedules follow-on events.
///
/// Events at or beyond the horizon never fire: the clock moves to the horizon
/// and the run ends.
///
/// Create via [`SchedulerBuilder`][crate::SchedulerBuilder].
pub struct Scheduler<S: IntervalSource = UniformInterval> {
    pub(crate) config:               PortConfig,
    pub(crate) coalescing_tolerance: f64,
    pub(crate) clock:                SimClock,

    pub(crate) tankers: LifecycleTracker,
    pub(crate) tows:    ResourcePool<Tow>,
    pub(crate) lines:   ResourcePool<ProcessingLine>,

    /// Arrivals and tanker transitions; bound to the arrival interval.
    pub(crate) tanker_events: EventQueue<PortEvent, S>,
    /// Tow releases; bound to the tow-leg interval.
    pub(crate) tow_events: EventQueue<PortEvent, S>,
    /// Line releases; bound to the line service interval.
    pub(crate) line_events: EventQueue<PortEvent, S>,

    pub(crate) tanker_ids: IdFactory<TankerId>,
    pub(crate) started:    bool,
    pub(crate) finished:   bool,
}

impl<S: IntervalSource> Scheduler<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current time to the horizon.
    pub fn run<O: PortObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            "starting port run: horizon {}, {} line(s), {} tow(s)",
            self.config.horizon(),
            self.config.processing_line_count,
            self.config.tow_count,
        );
        let mut ticks = 0u64;
        while self.step(observer)? {
            ticks += 1;
        }
        info!(
            "port run finished after {ticks} tick(s): {} tanker(s) created, {} still tracked",
            self.tanker_ids.issued(),
            self.tankers.len(),
        );
        Ok(())
    }

    /// Process exactly one tick.
    ///
    /// Returns `false` once the horizon has been reached (the call that
    /// reaches it fires `on_sim_end` and processes no events).
    pub fn step<O: PortObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<bool> {
        if self.finished {
            return Ok(false);
        }
        if !self.started {
            self.setup(observer)?;
        }

        let horizon = self.config.horizon();
        let next = match self.select_next_time()? {
            Some(t) if t < horizon => t,
            _ => {
                self.clock.advance_to(horizon)?;
                self.finished = true;
                debug!("horizon {horizon} reached");
                observer.on_sim_end(horizon);
                return Ok(false);
            }
        };

        self.clock.advance_to(next)?;
        self.check_contention()?;

        let batch = self.take_batch();
        debug!("{}: firing {} event(s)", self.clock, batch.len());
        for event in &batch {
            self.dispatch(event, observer)?;
        }
        observer.on_tick_end(next, batch.len());
        Ok(true)
    }

    // ── Read-only views ───────────────────────────────────────────────────

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    pub fn coalescing_tolerance(&self) -> f64 {
        self.coalescing_tolerance
    }

    pub fn tankers(&self) -> &LifecycleTracker {
        &self.tankers
    }

    pub fn tows(&self) -> &ResourcePool<Tow> {
        &self.tows
    }

    pub fn lines(&self) -> &ResourcePool<ProcessingLine> {
        &self.lines
    }

    /// Tankers created so far, including the one whose arrival is pending.
    pub fn tankers_created(&self) -> u32 {
        self.tanker_ids.issued()
    }

    /// Events waiting in all three queues.
    pub fn pending_events(&self) -> usize {
        self.tanker_events.len() + self.tow_events.len() + self.line_events.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // ── Loop phases ───────────────────────────────────────────────────────

    /// Create the resources and schedule the first arrival.
    pub(crate) fn setup<O: PortObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.now();
        let mut line_ids = IdFactory::new();
        for _ in 0..self.config.processing_line_count {
            self.lines.push(ProcessingLine::new(line_ids.next_id()), now, observer)?;
        }
        let mut tow_ids = IdFactory::new();
        for _ in 0..self.config.tow_count {
            self.tows.push(Tow::new(tow_ids.next_id()), now, observer)?;
        }
        self.lines.seal();
        self.tows.seal();
        self.schedule_arrival()?;
        self.started = true;
        Ok(())
    }

    /// Earliest pending event time, or `None` if every queue is empty.
    fn select_next_time(&self) -> SimResult<Option<SimTime>> {
        let now = self.clock.now();
        let heads = [
            (self.tow_events.label(), self.tow_events.peek_time()),
            (self.line_events.label(), self.line_events.peek_time()),
            (self.tanker_events.label(), self.tanker_events.peek_time()),
        ];
        let mut next: Option<SimTime> = None;
        for (queue, head) in heads {
            let Some(at) = head else { continue };
            if at < now {
                return Err(SimError::StaleEvent { queue, at, now });
            }
            next = Some(next.map_or(at, |n| n.min(at)));
        }
        Ok(next)
    }

    /// A tanker, a tow and a line all idle at once means a pairing was missed.
    fn check_contention(&self) -> SimResult<()> {
        if !(self.tows.any() && self.lines.any()) {
            return Ok(());
        }
        match self.tankers.first() {
            Some(waiting) => Err(SimError::InconsistentContention {
                now:        self.clock.now(),
                tanker:     waiting.id,
                idle_tows:  self.tows.idle_count(),
                idle_lines: self.lines.idle_count(),
            }),
            None => Ok(()),
        }
    }

    /// Pop every event due within the coalescing window, in firing order.
    fn take_batch(&mut self) -> Vec<PortEvent> {
        use port_pool::Scheduled;

        let until = self.clock.now() + self.coalescing_tolerance;
        let mut batch = self.tow_events.pop_due(until);
        batch.extend(self.line_events.pop_due(until));
        batch.extend(self.tanker_events.pop_due(until));
        // Stable: equal times keep queue order, then scheduling order.
        batch.sort_by_key(|e| e.time());
        batch
    }

    // ── Event dispatch ────────────────────────────────────────────────────

    fn dispatch<O: PortObserver + ?Sized>(
        &mut self,
        event:    &PortEvent,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = self.clock.now();
        trace!("{now}: dispatch {event}");
        match *event {
            PortEvent::Tanker { transition: TankerTransition::ArrivedNew, tanker, .. } => {
                self.tankers.enqueue(tanker, now, observer)?;
                self.resolve_contention(observer)?;
                self.schedule_arrival()?;
            }
            PortEvent::Tanker { transition: TankerTransition::StartedRefill, tanker, .. } => {
                let tanker = self.tankers.process_by_line(tanker.id, now, observer)?;
                let at = self.line_events.next_event_time(now);
                self.tanker_events
                    .push(PortEvent::tanker(at, TankerTransition::FinishedRefill, tanker), now)?;
            }
            PortEvent::Tanker { transition: TankerTransition::FinishedRefill, tanker, .. } => {
                if self.tows.any() {
                    let tow = self.tows.pop(now, observer)?;
                    self.dispatch_tanker(tanker.id, tow, observer)?;
                } else {
                    trace!("{now}: {} stuck waiting for a tow", tanker.id);
                    self.tankers.mark_stuck_in_processing_line(tanker.id, now, observer)?;
                }
            }
            PortEvent::Tanker { transition: TankerTransition::LeftSystem, tanker, .. } => {
                self.tankers.remove_from_system(tanker.id, now, observer)?;
            }
            PortEvent::Tow { tow, .. } => {
                self.tows.push(tow, now, observer)?;
                self.resolve_contention(observer)?;
            }
            PortEvent::ProcessingLine { line, .. } => {
                self.lines.push(line, now, observer)?;
                self.resolve_contention(observer)?;
            }
        }
        Ok(())
    }

    /// Use idle resources until no pairing is possible.
    ///
    /// Stuck tankers hold a line hostage, so they get the tows first.
    fn resolve_contention<O: PortObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.now();
        loop {
            let stuck = self.tankers.first_stuck().map(|t| t.id);
            if let (Some(id), true) = (stuck, self.tows.any()) {
                let tow = self.tows.pop(now, observer)?;
                self.dispatch_tanker(id, tow, observer)?;
                continue;
            }
            if self.tankers.any() && self.tows.any() && self.lines.any() {
                self.begin_refill(observer)?;
                continue;
            }
            return Ok(());
        }
    }

    /// Pair the head-of-queue tanker with an idle line and tow.  The tow leg
    /// delivers it to the line; the tow is free again when the leg ends.
    fn begin_refill<O: PortObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.now();
        let Some(id) = self.tankers.first().map(|t| t.id) else {
            return Ok(());
        };
        let line = self.lines.pop(now, observer)?;
        let tow = self.tows.pop(now, observer)?;
        let tanker = self.tankers.process_by_tow(id, Assignment { line, tow }, now, observer)?;

        let delivered = self.tow_events.next_event_time(now);
        trace!("{now}: {id} paired with {} and {}, delivered at {delivered}", line.id, tow.id);
        self.tow_events.push(PortEvent::Tow { at: delivered, tow }, now)?;
        self.tanker_events
            .push(PortEvent::tanker(delivered, TankerTransition::StartedRefill, tanker), now)?;
        Ok(())
    }

    /// `tow` takes the tanker off its line.  Tow, line and tanker are all
    /// released when the leg ends.
    fn dispatch_tanker<O: PortObserver + ?Sized>(
        &mut self,
        id:       TankerId,
        tow:      Tow,
        observer: &mut O,
    ) -> SimResult<()> {
        let now = self.clock.now();
        let tanker = self.tankers.dispatch_by_tow(id, tow, now, observer)?;
        let line = tanker.line().ok_or(SimError::Unassigned { tanker: id })?;

        let gone = self.tow_events.next_event_time(now);
        trace!("{now}: {id} dispatched by {}, leaves at {gone}", tow.id);
        self.tow_events.push(PortEvent::Tow { at: gone, tow }, now)?;
        self.line_events.push(PortEvent::ProcessingLine { at: gone, line }, now)?;
        self.tanker_events
            .push(PortEvent::tanker(gone, TankerTransition::LeftSystem, tanker), now)?;
        Ok(())
    }

    /// Create the next tanker and schedule its arrival.
    fn schedule_arrival(&mut self) -> SimResult<()> {
        let now = self.clock.now();
        let tanker = Tanker::new(self.tanker_ids.next_id());
        let at = self.tanker_events.next_event_time(now);
        self.tanker_events
            .push(PortEvent::tanker(at, TankerTransition::ArrivedNew, tanker), now)?;
        Ok(())
    }
}
