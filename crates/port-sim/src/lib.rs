//! `port-sim`: discrete-event scheduler for the tanker port.
//!
//! # Event loop
//!
//! ```text
//! setup: push every line and tow idle; schedule the first arrival
//! while now < horizon:
//!   ① Select  : earliest head of the tanker / tow / line queues → now
//!   ② Guard   : waiting tanker + idle tow + idle line ⇒ error
//!   ③ Coalesce: pop everything due within the coalescing tolerance
//!   ④ Dispatch:
//!        ArrivedNew      → enqueue; pair; schedule next arrival
//!        Tow/Line free   → push idle; pair
//!        StartedRefill   → on the line; schedule FinishedRefill
//!        FinishedRefill  → dispatch with an idle tow, or stuck
//!        LeftSystem      → forget the tanker
//! ```
//!
//! Pairing always serves stuck tankers first, then the head of the queue.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use port_core::{NoopObserver, PortConfig};
//! use port_sim::SchedulerBuilder;
//!
//! let mut scheduler = SchedulerBuilder::new(PortConfig::default()).build()?;
//! scheduler.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use builder::SchedulerBuilder;
pub use error::{SimError, SimResult};
pub use event::{PortEvent, TankerTransition};
pub use scheduler::Scheduler;
