//! Cycle records and the full trace.
//!
//! One [`CycleRecord`] is emitted per simulated clock tick, immutable once
//! emitted and ordered by cycle number. The full trace is the simulator's
//! sole externally consumed artifact; its serialized field names (`stages`,
//! `stageDetails`, `hazards`, and `component` on the enriched form) are the
//! contract with the existing renderer.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::isa::instruction::Instruction;
use crate::pipeline::Stage;
use crate::pipeline::hazards::HazardReport;
use crate::pipeline::signals::{ExSignals, IdSignals, IfSignals, MemSignals, WbSignals};
use crate::stats::SimStats;

/// Why a bubble occupies a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    /// Inserted behind a stalled instruction.
    Stall,
    /// Replacing a flushed instruction.
    Flush,
}

/// What occupies a pipeline stage in one cycle.
///
/// Serializes as the display string (`"add x28, x29, x31"`,
/// `"bubble (stall)"`), which is what the renderer prints in the stage box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageSlot {
    /// A real instruction, with its program position (zero-based).
    Instr {
        /// Index of the instruction in the input program.
        index: usize,
        /// The instruction itself.
        instr: Instruction,
    },
    /// A synthetic no-op occupying the slot.
    Bubble(BubbleKind),
}

impl StageSlot {
    /// The instruction in this slot, if it is not a bubble.
    #[must_use]
    pub const fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Instr { instr, .. } => Some(instr),
            Self::Bubble(_) => None,
        }
    }

    /// Whether this slot holds a bubble.
    #[must_use]
    pub const fn is_bubble(&self) -> bool {
        matches!(self, Self::Bubble(_))
    }
}

impl fmt::Display for StageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instr { instr, .. } => write!(f, "{instr}"),
            Self::Bubble(BubbleKind::Stall) => f.write_str("bubble (stall)"),
            Self::Bubble(BubbleKind::Flush) => f.write_str("bubble (flush)"),
        }
    }
}

impl Serialize for StageSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A per-stage map, serialized under the renderer's stage keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageMap<T> {
    /// IF occupant.
    #[serde(rename = "IF", skip_serializing_if = "Option::is_none")]
    pub fetch: Option<T>,
    /// ID occupant.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub decode: Option<T>,
    /// EX occupant.
    #[serde(rename = "EX", skip_serializing_if = "Option::is_none")]
    pub execute: Option<T>,
    /// MEM occupant.
    #[serde(rename = "MEM", skip_serializing_if = "Option::is_none")]
    pub memory: Option<T>,
    /// WB occupant.
    #[serde(rename = "WB", skip_serializing_if = "Option::is_none")]
    pub writeback: Option<T>,
}

impl<T> StageMap<T> {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fetch: None,
            decode: None,
            execute: None,
            memory: None,
            writeback: None,
        }
    }

    /// The entry for a stage.
    #[must_use]
    pub const fn get(&self, stage: Stage) -> Option<&T> {
        match stage {
            Stage::If => self.fetch.as_ref(),
            Stage::Id => self.decode.as_ref(),
            Stage::Ex => self.execute.as_ref(),
            Stage::Mem => self.memory.as_ref(),
            Stage::Wb => self.writeback.as_ref(),
        }
    }

    /// Mutable access to the entry for a stage.
    pub fn slot_mut(&mut self, stage: Stage) -> &mut Option<T> {
        match stage {
            Stage::If => &mut self.fetch,
            Stage::Id => &mut self.decode,
            Stage::Ex => &mut self.execute,
            Stage::Mem => &mut self.memory,
            Stage::Wb => &mut self.writeback,
        }
    }

    /// Whether no stage is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fetch.is_none()
            && self.decode.is_none()
            && self.execute.is_none()
            && self.memory.is_none()
            && self.writeback.is_none()
    }
}

/// Per-stage signal records for one cycle, absent where a stage is empty or
/// holds a bubble.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StageDetails {
    /// IF signals.
    #[serde(rename = "IF", skip_serializing_if = "Option::is_none")]
    pub fetch: Option<IfSignals>,
    /// ID signals.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub decode: Option<IdSignals>,
    /// EX signals.
    #[serde(rename = "EX", skip_serializing_if = "Option::is_none")]
    pub execute: Option<ExSignals>,
    /// MEM signals.
    #[serde(rename = "MEM", skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemSignals>,
    /// WB signals.
    #[serde(rename = "WB", skip_serializing_if = "Option::is_none")]
    pub writeback: Option<WbSignals>,
}

/// One simulated clock tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CycleRecord {
    /// Cycle number, starting at 1.
    pub cycle: usize,
    /// Stage occupancy.
    pub stages: StageMap<StageSlot>,
    /// Live datapath signals per occupied stage.
    #[serde(rename = "stageDetails")]
    pub stage_details: StageDetails,
    /// Hazards first observable this cycle.
    pub hazards: Vec<HazardReport>,
}

/// The full simulation output: the ordered cycle records plus run statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Trace {
    /// Cycle records, ordered by cycle number ascending.
    pub records: Vec<CycleRecord>,
    /// Aggregate statistics for the run.
    pub stats: SimStats,
}

impl Trace {
    /// Number of simulated cycles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the trace holds no cycles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the cycle records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CycleRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a CycleRecord;
    type IntoIter = std::slice::Iter<'a, CycleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
