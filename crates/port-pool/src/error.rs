use port_core::{EntityKind, SimTime, TankerId, TankerStage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("duplicate {kind} id {id}: already present")]
    DuplicateId { kind: EntityKind, id: u32 },

    #[error("{kind} id {id} does not belong to this pool")]
    UnknownId { kind: EntityKind, id: u32 },

    #[error("cannot pop from empty {kind} pool")]
    EmptyPool { kind: EntityKind },

    #[error("cannot pop from empty {queue} event queue")]
    EmptyEventQueue { queue: &'static str },

    #[error("{op} on {tanker}: expected it in {expected:?}, found {found:?}")]
    Lifecycle {
        tanker:   TankerId,
        op:       &'static str,
        expected: &'static [TankerStage],
        found:    Option<TankerStage>,
    },

    #[error("cannot schedule {queue} event at {at}: clock is already at {now}")]
    PastScheduling {
        queue: &'static str,
        at:    SimTime,
        now:   SimTime,
    },
}

pub type PoolResult<T> = Result<T, PoolError>;
