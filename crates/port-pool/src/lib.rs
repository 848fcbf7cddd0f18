//! `port-pool`: containers mutated by the scheduler.
//!
//! # Crate layout
//!
//! | Module           | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | [`pool`]         | `ResourcePool<T>`: FIFO idle set + working set        |
//! | [`event_queue`]  | `EventQueue<E, S>` (`BTreeMap<(SimTime, seq), E>`)     |
//! | [`lifecycle`]    | `LifecycleTracker`: five stored tanker stages         |
//! | [`error`]        | `PoolError`, `PoolResult<T>`                           |
//!
//! Every mutating call on a pool or the tracker takes the current time and
//! the observer that should hear about the change.  Nothing here owns a
//! clock or a subscriber list.

pub mod error;
pub mod event_queue;
pub mod lifecycle;
pub mod pool;


pub use error::{PoolError, PoolResult};
pub use event_queue::{EventQueue, Scheduled};
pub use lifecycle::LifecycleTracker;
pub use pool::ResourcePool;
