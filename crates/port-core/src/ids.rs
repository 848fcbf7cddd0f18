//! Strongly typed identifier wrappers and the sequential id factory.
//!
//! Ids are unique within their kind and issued sequentially starting at 1 by
//! an [`IdFactory`].  All ids are `Copy + Ord + Hash` so they can key maps and
//! sorted collections without ceremony.

use std::fmt;
use std::marker::PhantomData;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".  Factories start at 1 and never
            /// reach it in practice.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The raw integer, as carried in notifications.
            #[inline(always)]
            pub fn raw(self) -> u32 {
                self.0 as u32
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> Self {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identity of a tanker.  Issued when its arrival event is scheduled.
    pub struct TankerId(u32);
}

typed_id! {
    /// Identity of a tow.  Tows are created once at setup.
    pub struct TowId(u32);
}

typed_id! {
    /// Identity of a processing line (dock).
    pub struct LineId(u32);
}

// ── IdFactory ─────────────────────────────────────────────────────────────────

/// Issues unique, monotonically increasing ids of one kind, starting at 1.
///
/// One factory per kind per run; a fresh run starts a fresh sequence.
#[derive(Debug)]
pub struct IdFactory<I> {
    last:  u32,
    _kind: PhantomData<I>,
}

impl<I: From<u32>> IdFactory<I> {
    pub fn new() -> Self {
        Self { last: 0, _kind: PhantomData }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> I {
        self.last += 1;
        I::from(self.last)
    }

    /// How many ids have been issued so far.
    pub fn issued(&self) -> u32 {
        self.last
    }
}

impl<I: From<u32>> Default for IdFactory<I> {
    fn default() -> Self {
        Self::new()
    }
}
