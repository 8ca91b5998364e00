//! The five-stage pipeline model.
//!
//! This module contains the whole cycle-by-cycle machinery:
//! 1. **Signals:** Immutable per-stage records of live datapath wires.
//! 2. **Tables:** The static `(class, stage) -> signals` control logic.
//! 3. **Hazards:** Data, load-use, and control hazard detection.
//! 4. **Scheduler:** The clock walker producing one record per cycle.
//! 5. **Trace:** The cycle-record output types.
//! 6. **Describe:** Human-readable per-component annotations.

use std::fmt;

use serde::Serialize;

/// Per-cycle component annotations for display.
pub mod describe;

/// Hazard kinds, reports, and detection.
pub mod hazards;

/// The stage occupancy scheduler.
pub mod scheduler;

/// Per-stage datapath signal records.
pub mod signals;

/// Static per-stage signal tables.
pub mod tables;

/// Cycle records and the full trace.
pub mod trace;

/// The five pipeline stages, in order.
///
/// An instruction occupies stages in exactly this order, one per cycle,
/// unless stalled (it repeats a stage) or flushed (it disappears).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    /// Instruction fetch.
    #[serde(rename = "IF")]
    If,
    /// Instruction decode and register read.
    #[serde(rename = "ID")]
    Id,
    /// Execute / address calculation.
    #[serde(rename = "EX")]
    Ex,
    /// Data memory access.
    #[serde(rename = "MEM")]
    Mem,
    /// Register write-back.
    #[serde(rename = "WB")]
    Wb,
}

impl Stage {
    /// All five stages, in pipeline order.
    pub const ALL: [Self; 5] = [Self::If, Self::Id, Self::Ex, Self::Mem, Self::Wb];

    /// The stage an instruction advances into next, or `None` after WB.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::If => Some(Self::Id),
            Self::Id => Some(Self::Ex),
            Self::Ex => Some(Self::Mem),
            Self::Mem => Some(Self::Wb),
            Self::Wb => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::If => "IF",
            Self::Id => "ID",
            Self::Ex => "EX",
            Self::Mem => "MEM",
            Self::Wb => "WB",
        };
        f.write_str(name)
    }
}
