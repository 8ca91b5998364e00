//! Per-stage datapath signal records.
//!
//! Each record is a fixed set of named booleans, one per datapath wire or mux
//! path, saying whether that path carries a meaningful value while an
//! instruction occupies the stage. Records are immutable and fully populated
//! in one call from the tables in [`crate::pipeline::tables`]; there is no
//! partially-initialized signal state anywhere in the simulator.
//!
//! Field names follow the wire names of the rendered datapath diagram and are
//! part of the serialization contract with the renderer.

use serde::Serialize;

/// Live paths in the IF stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IfSignals {
    /// A resolved branch/jump is steering the PC this cycle.
    pub branch_taken: bool,
    /// PC source mux output is live.
    pub mux_pc: bool,
    /// PC + 4 incrementer is live.
    pub pc_increment: bool,
    /// Default (sequential) PC path is selected.
    pub pc_default: bool,
    /// PC value is forwarded to the ID-stage branch adder.
    pub pc_id: bool,
    /// PC drives the instruction memory address port.
    pub pc_im: bool,
    /// Instruction memory output feeds the IF/ID latch.
    pub im_id: bool,
}

/// Live paths in the ID stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IdSignals {
    /// First register read port is active.
    pub id_reg1: bool,
    /// Second register read port is active.
    pub id_reg2: bool,
    /// Write-register index is latched for write-back.
    pub id_reg_write: bool,
    /// Immediate generator is extracting from the instruction word.
    pub id_imm_gen: bool,
    /// Immediate value crosses into the ID/EX latch.
    pub imm_ex: bool,
    /// PC crosses into the ID/EX latch (branch/jump target arithmetic).
    pub id_ex: bool,
    /// First register value crosses into the ID/EX latch.
    pub reg1_ex: bool,
    /// Second register value crosses into the ID/EX latch.
    pub reg2_ex: bool,
}

/// Live paths in the EX stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExSignals {
    /// Branch-target adder is active.
    pub ex_add: bool,
    /// Branch-target adder result crosses into the EX/MEM latch.
    pub add_mem: bool,
    /// First register value feeds ALU operand A.
    pub reg1_alu: bool,
    /// Second register value feeds the operand-B mux.
    pub reg2_mux: bool,
    /// Immediate left-shifter is active (branch offset scaling).
    pub ex_shift: bool,
    /// Immediate feeds the operand-B mux.
    pub ex_mux: bool,
    /// Operand-B mux output feeds the ALU.
    pub mux_alu: bool,
    /// Second register value bypasses to the EX/MEM latch (store data).
    pub reg2_mem: bool,
    /// ALU zero flag crosses into the EX/MEM latch (branch condition).
    pub zero_mem: bool,
    /// ALU result crosses into the EX/MEM latch.
    pub alu_mem: bool,
}

/// Live paths in the MEM stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemSignals {
    /// Branch condition is asserted at the PC-steering logic.
    pub zero_mem2: bool,
    /// ALU result drives the data memory address port.
    pub alu_dm: bool,
    /// Second register value drives the data memory write port.
    pub reg2_dm: bool,
    /// Data memory read value crosses into the MEM/WB latch.
    pub dm_wb: bool,
    /// ALU result crosses into the MEM/WB latch.
    pub alu_wb: bool,
}

/// Live paths in the WB stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WbSignals {
    /// Memory-read value is selected by the write-back mux.
    pub dm_mux: bool,
    /// ALU result is selected by the write-back mux.
    pub alu_mux: bool,
    /// Register file write port is enabled.
    pub reg_write: bool,
}

/// A signal record for any stage.
///
/// Returned by [`crate::pipeline::tables::signals_for`] when the stage is not
/// statically known.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StageSignals {
    /// IF-stage record.
    If(IfSignals),
    /// ID-stage record.
    Id(IdSignals),
    /// EX-stage record.
    Ex(ExSignals),
    /// MEM-stage record.
    Mem(MemSignals),
    /// WB-stage record.
    Wb(WbSignals),
}
