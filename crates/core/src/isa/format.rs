//! Instruction formats and the mnemonic classifier.
//!
//! Every supported mnemonic maps to exactly one of the six RISC-V instruction
//! formats plus two derived flags:
//! 1. **`is_load`** selects the load-specific MEM/WB signal variants and the
//!    one-bubble load-use stall rule.
//! 2. **`is_jump`** selects the jump-specific ID/EX signal variants and forces
//!    an unconditional redirect at EX.

use std::fmt;

use serde::Serialize;

use crate::common::error::SimError;
use crate::isa::opcodes;

/// The six RISC-V instruction formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum InstrFormat {
    /// Register-register ALU operations (`add`, `sub`, `mul`, ...).
    R,
    /// Register-immediate ALU operations, loads, `jalr`, and system calls.
    I,
    /// Stores (`sb`, `sh`, `sw`).
    S,
    /// Conditional branches (`beq`, `bne`, ...).
    B,
    /// Upper-immediate operations (`lui`, `auipc`).
    U,
    /// Unconditional jumps (`jal`).
    J,
}

impl fmt::Display for InstrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R => "R",
            Self::I => "I",
            Self::S => "S",
            Self::B => "B",
            Self::U => "U",
            Self::J => "J",
        };
        f.write_str(name)
    }
}

/// A classified instruction: format plus the derived flags.
///
/// Computed once per instruction and never mutated. The flags distinguish
/// instructions that share a format but drive different datapath variants:
/// loads versus ALU I-types, and `jalr` versus other I-types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InstrClass {
    /// The instruction format.
    pub format: InstrFormat,
    /// Whether this instruction reads data memory (`lb`/`lh`/`lw`/`lbu`/`lhu`).
    pub is_load: bool,
    /// Whether this instruction is an unconditional jump (`jal`/`jalr`).
    pub is_jump: bool,
}

impl InstrClass {
    /// Whether this instruction is a conditional branch.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(self.format, InstrFormat::B)
    }

    /// Whether this instruction redirects the PC when it resolves in EX.
    ///
    /// Jumps always redirect; conditional branches redirect only when the
    /// configured branch policy assumes them taken.
    #[must_use]
    pub const fn is_control(self) -> bool {
        self.is_jump || self.is_branch()
    }
}

/// Maps a lowercase mnemonic to its instruction class.
///
/// Pure lookup against the static opcode table. Unknown mnemonics fail with
/// [`SimError::UnknownInstruction`] rather than defaulting, because the signal
/// tables downstream assume a valid class.
///
/// # Errors
///
/// Returns [`SimError::UnknownInstruction`] (carrying the offending token)
/// when the mnemonic is not in the table.
pub fn classify(mnemonic: &str) -> Result<InstrClass, SimError> {
    opcodes::lookup(mnemonic).map_or_else(
        || {
            Err(SimError::UnknownInstruction {
                mnemonic: mnemonic.to_owned(),
                line: 0,
            })
        },
        |op| Ok(op.class()),
    )
}
