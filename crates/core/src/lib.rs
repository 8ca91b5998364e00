//! Pipelined RISC-V datapath simulator.
//!
//! This crate computes, cycle by cycle, which pipeline stage each instruction
//! of a program occupies, which datapath wires and multiplexers are live in
//! each stage, and which hazards are present. It provides:
//! 1. **Classification:** Mnemonic to instruction-format mapping with load/jump flags.
//! 2. **Signal Tables:** Static `(class, stage)` control logic for the 5-stage pipeline.
//! 3. **Scheduling:** A deterministic clock walker with stall, bubble, and flush handling.
//! 4. **Hazards:** Data, load-use, and control hazard detection and reporting.
//! 5. **Description:** Human-readable per-component annotations for rendering.
//! 6. **Single-Cycle:** A reduced, non-pipelined datapath view for one instruction.
//!
//! The simulator models the classic academic five-stage pipeline (IF, ID, EX,
//! MEM, WB) with no forwarding paths: RAW hazards stall until write-back, and
//! a load-use dependency costs exactly one bubble. No register values are
//! computed; hazards are decided purely from register names.
//!
//! Each [`Simulator::run`] call is a pure function of its input, so
//! independent simulations may run concurrently with no coordination; the
//! static signal tables are shared immutably.
//!
//! ```
//! use pipesim_core::run;
//!
//! let trace = run(&["add x28, x29, x31", "sub x5, x28, x6"]).unwrap();
//! // 6 base cycles plus 2 stall cycles for the x28 dependency.
//! assert_eq!(trace.len(), 8);
//! ```

/// Common types (errors, registers).
pub mod common;
/// Simulator configuration.
pub mod config;
/// Instruction set definitions (formats, opcodes, parsing).
pub mod isa;
/// The five-stage pipeline model.
pub mod pipeline;
/// Single-cycle datapath variant.
pub mod single_cycle;
/// Simulation statistics.
pub mod stats;

/// Error taxonomy for parsing and simulation.
pub use crate::common::error::SimError;
/// Branch-outcome policy and top-level configuration.
pub use crate::config::{BranchPolicy, SimConfig};
/// Mnemonic classification.
pub use crate::isa::format::{InstrClass, InstrFormat, classify};
/// Parsed instruction type.
pub use crate::isa::instruction::Instruction;
/// Pipeline stages.
pub use crate::pipeline::Stage;
/// Per-cycle component annotation entry point.
pub use crate::pipeline::describe::{EnrichedCycleRecord, describe};
/// Hazard reporting types and the detection window.
pub use crate::pipeline::hazards::{HazardKind, HazardReport, Window, detect, needs_stall};
/// Simulation entry points.
pub use crate::pipeline::scheduler::{Simulator, run};
/// Per-stage signal lookup.
pub use crate::pipeline::tables::signals_for;
/// Trace output types.
pub use crate::pipeline::trace::{CycleRecord, StageSlot, Trace};
/// Run statistics.
pub use crate::stats::SimStats;
