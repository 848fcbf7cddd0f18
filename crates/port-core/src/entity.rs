//! Port entities: tankers and the two reusable resource kinds.

use std::fmt;

use crate::{LineId, TankerId, TowId};

/// Which population an entity belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Tanker,
    Tow,
    ProcessingLine,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Tanker         => "tanker",
            EntityKind::Tow            => "tow",
            EntityKind::ProcessingLine => "processing line",
        };
        f.write_str(s)
    }
}

/// Anything that can sit in a resource pool.
pub trait Entity: Copy + fmt::Debug {
    const KIND: EntityKind;

    /// Raw id, unique within `KIND`.
    fn raw_id(&self) -> u32;
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// A tow: relocates tankers to and from processing lines.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Tow {
    pub id: TowId,
}

impl Tow {
    pub fn new(id: TowId) -> Self {
        Self { id }
    }
}

impl Entity for Tow {
    const KIND: EntityKind = EntityKind::Tow;

    #[inline]
    fn raw_id(&self) -> u32 {
        self.id.raw()
    }
}

/// A processing line (dock) where tankers are refilled.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ProcessingLine {
    pub id: LineId,
}

impl ProcessingLine {
    pub fn new(id: LineId) -> Self {
        Self { id }
    }
}

impl Entity for ProcessingLine {
    const KIND: EntityKind = EntityKind::ProcessingLine;

    #[inline]
    fn raw_id(&self) -> u32 {
        self.id.raw()
    }
}

// ── Tanker ────────────────────────────────────────────────────────────────────

/// The resources a tanker holds while it is being serviced.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    pub line: ProcessingLine,
    pub tow:  Tow,
}

/// A tanker requesting service.
///
/// `assignment` is `Some` only between pairing and leaving the system.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Tanker {
    pub id:         TankerId,
    pub assignment: Option<Assignment>,
}

impl Tanker {
    pub fn new(id: TankerId) -> Self {
        Self { id, assignment: None }
    }

    /// The line this tanker occupies, if it is being serviced.
    pub fn line(&self) -> Option<ProcessingLine> {
        self.assignment.map(|a| a.line)
    }
}

impl Entity for Tanker {
    const KIND: EntityKind = EntityKind::Tanker;

    #[inline]
    fn raw_id(&self) -> u32 {
        self.id.raw()
    }
}
