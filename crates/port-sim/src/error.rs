use port_core::{PortError, SimTime, TankerId};
use port_pool::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] PortError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("stale {queue} event at {at}: clock is already at {now}")]
    StaleEvent {
        queue: &'static str,
        at:    SimTime,
        now:   SimTime,
    },

    #[error(
        "inconsistent contention at {now}: {tanker} waits while {idle_tows} tow(s) and \
         {idle_lines} line(s) are idle"
    )]
    InconsistentContention {
        now:        SimTime,
        tanker:     TankerId,
        idle_tows:  usize,
        idle_lines: usize,
    },

    #[error("{tanker} is being dispatched but holds no processing line")]
    Unassigned { tanker: TankerId },
}

pub type SimResult<T> = Result<T, SimError>;
