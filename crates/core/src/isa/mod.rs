//! Instruction set definitions for the modeled RV32I-style subset.
//!
//! This module covers everything the datapath model needs to know about an
//! instruction before it enters the pipeline:
//! 1. **Formats:** The six RISC-V instruction formats and per-instruction flags.
//! 2. **Opcodes:** The static mnemonic table with classification and ALU metadata.
//! 3. **Instructions:** Parsed instructions with typed operands and register sets.
//!
//! The model performs no numeric execution; the ISA layer exists to answer
//! "which format is this", "which registers does it read and write", and
//! "how should its operation be described".

/// Instruction formats and the classifier.
pub mod format;

/// Parsed instructions and operand shapes.
pub mod instruction;

/// The static mnemonic table.
pub mod opcodes;
