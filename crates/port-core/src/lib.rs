//! `port-core`: foundational types for the tanker port simulator.
//!
//! This crate is a dependency of every other `port-*` crate.  It has no
//! `port-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`ids`]        | `TankerId`, `TowId`, `LineId`, `IdFactory`                |
//! | [`time`]       | `SimTime`, `SimClock`                                     |
//! | [`rng`]        | `SimRng`                                                  |
//! | [`interval`]   | `IntervalSource`, `UniformInterval`, `FixedInterval`      |
//! | [`entity`]     | `Tanker`, `Tow`, `ProcessingLine`, `Entity`, `EntityKind` |
//! | [`notify`]     | `Notification`, `PortObserver`, `NotificationChannel`     |
//! | [`config`]     | `PortConfig`, `Intensity`                                 |
//! | [`error`]      | `PortError`, `PortResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and data types.   |

pub mod config;
pub mod entity;
pub mod error;
pub mod ids;
pub mod interval;
pub mod notify;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Intensity, PortConfig};
pub use entity::{Assignment, Entity, EntityKind, ProcessingLine, Tanker, Tow};
pub use error::{PortError, PortResult};
pub use ids::{IdFactory, LineId, TankerId, TowId};
pub use interval::{FixedInterval, IntervalSource, UniformInterval};
pub use notify::{
    NoopObserver, Notification, NotificationChannel, NotificationLog, PortObserver,
    ResourceState, TankerStage,
};
pub use rng::SimRng;
pub use time::{SimClock, SimTime};
