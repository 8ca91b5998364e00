//! Simulation error definitions.
//!
//! This module defines the error taxonomy for the simulator. It provides:
//! 1. **Classification Errors:** Unknown mnemonics that cannot be mapped to a format.
//! 2. **Shape Errors:** Operand lists that do not match the instruction's format.
//! 3. **Input Errors:** Empty programs and requests outside a variant's modeled domain.
//!
//! Classification and operand-shape errors abort a simulation run immediately;
//! a partial trace is never produced, because stage occupancy in later cycles
//! depends on earlier cycles. Hazard-detection edge cases are deliberately NOT
//! errors: they degrade to an internal-consistency hazard report inside the
//! trace (see [`crate::pipeline::hazards`]).

use thiserror::Error;

/// Errors surfaced by program parsing and the simulation entry points.
///
/// Every variant that originates from a specific instruction carries the
/// offending text and its one-based position in the input list, so a caller
/// can point at the exact bad line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The mnemonic is not present in the supported opcode table.
    #[error("unknown instruction `{mnemonic}` (line {line})")]
    UnknownInstruction {
        /// The unrecognized mnemonic token.
        mnemonic: String,
        /// One-based position of the instruction in the input list.
        line: usize,
    },

    /// The operand count or shape does not match the instruction's format.
    #[error("malformed operands in `{text}` (line {line}): {reason}")]
    MalformedOperands {
        /// The full normalized instruction text.
        text: String,
        /// One-based position of the instruction in the input list.
        line: usize,
        /// What the expected operand shape was.
        reason: String,
    },

    /// The instruction list was empty.
    #[error("instruction list is empty")]
    EmptyProgram,

    /// The single-cycle datapath variant does not model this instruction.
    ///
    /// The single-cycle tables are a reduced form covering the R, I, B, and S
    /// formats only; U/J instructions (and the jump/system members of I) have
    /// no single-cycle rendering.
    #[error("the single-cycle datapath does not model {what}")]
    UnsupportedFormat {
        /// Description of the unsupported format or mnemonic.
        what: String,
    },
}

impl SimError {
    /// Rewrites the line position carried by this error, if it has one.
    ///
    /// Classification helpers operate on bare mnemonics without knowing their
    /// program position; the program parser uses this to attach it.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::UnknownInstruction { mnemonic, .. } => Self::UnknownInstruction { mnemonic, line },
            Self::MalformedOperands { text, reason, .. } => Self::MalformedOperands { text, line, reason },
            other => other,
        }
    }
}
