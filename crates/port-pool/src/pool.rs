//! `ResourcePool<T>`: idle container for tows and processing lines.
//!
//! The pool tracks every entity it has ever seen in exactly one of two sets:
//! the FIFO idle queue or the checked-out working set.  `push` checks an
//! entity in (or registers it the first time), `pop` checks the oldest idle
//! entity out.  Consequently `idle_count() + working_count() == capacity()`
//! after every call.
//!
//! Once [`seal`][ResourcePool::seal]ed, the population is fixed: pushing an
//! id the pool has never seen is a [`PoolError::UnknownId`], so capacity
//! stays at its initial count for the rest of the run.

use std::collections::{BTreeSet, VecDeque};

use port_core::{Entity, Notification, PortObserver, ResourceState, SimTime};

use crate::{PoolError, PoolResult};

/// FIFO pool of idle resources of one kind.
#[derive(Debug)]
pub struct ResourcePool<T: Entity> {
    idle:    VecDeque<T>,
    working: BTreeSet<u32>,
    sealed:  bool,
}

impl<T: Entity> Default for ResourcePool<T> {
    fn default() -> Self {
        Self { idle: VecDeque::new(), working: BTreeSet::new(), sealed: false }
    }
}

impl<T: Entity> ResourcePool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `entity` idle.
    ///
    /// A working entity is checked back in; an unknown one is registered
    /// until the pool is sealed, and rejected with [`PoolError::UnknownId`]
    /// afterwards.  Pushing an entity that is already idle is a
    /// [`PoolError::DuplicateId`].  Emits an `Idle` notification.
    pub fn push<O: PortObserver + ?Sized>(
        &mut self,
        entity:   T,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<()> {
        let id = entity.raw_id();
        if self.idle.iter().any(|e| e.raw_id() == id) {
            return Err(PoolError::DuplicateId { kind: T::KIND, id });
        }
        if !self.working.remove(&id) && self.sealed {
            return Err(PoolError::UnknownId { kind: T::KIND, id });
        }
        self.idle.push_back(entity);
        observer.notify(&Notification::Resource {
            kind:  T::KIND,
            id,
            time:  now,
            state: ResourceState::Idle,
        });
        Ok(())
    }

    /// Check out the earliest-pushed idle entity.  Emits a `Working`
    /// notification.
    pub fn pop<O: PortObserver + ?Sized>(
        &mut self,
        now:      SimTime,
        observer: &mut O,
    ) -> PoolResult<T> {
        let entity = self.idle.pop_front().ok_or(PoolError::EmptyPool { kind: T::KIND })?;
        self.working.insert(entity.raw_id());
        observer.notify(&Notification::Resource {
            kind:  T::KIND,
            id:    entity.raw_id(),
            time:  now,
            state: ResourceState::Working,
        });
        Ok(entity)
    }

    /// Fix the population: from now on only known entities may be pushed.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// The entity `pop` would return, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.idle.front()
    }

    #[inline]
    pub fn any(&self) -> bool {
        !self.idle.is_empty()
    }

    #[inline]
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    #[inline]
    pub fn working_count(&self) -> usize {
        self.working.len()
    }

    /// Every entity the pool knows about, idle or working.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.idle.len() + self.working.len()
    }

    pub fn is_working(&self, id: u32) -> bool {
        self.working.contains(&id)
    }

    /// Idle entities in pop order.
    pub fn idle(&self) -> impl Iterator<Item = &T> {
        self.idle.iter()
    }
}
