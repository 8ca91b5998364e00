//! The static mnemonic table.
//!
//! One entry per supported mnemonic, grouped by format. Each entry carries the
//! format, the load/jump flags, and the ALU metadata (operator symbol and
//! operation name) used by the EX-stage descriptions.

use crate::isa::format::{InstrClass, InstrFormat};

/// Static metadata for one mnemonic.
#[derive(Debug, PartialEq, Eq)]
pub struct OpInfo {
    /// The lowercase mnemonic.
    pub mnemonic: &'static str,
    /// The instruction format.
    pub format: InstrFormat,
    /// Whether this is a memory load.
    pub is_load: bool,
    /// Whether this is an unconditional jump.
    pub is_jump: bool,
    /// Operator symbol used in ALU descriptions (`+`, `-`, `==`, ...).
    pub alu_symbol: &'static str,
    /// Operation name used in ALU descriptions (`ADD`, `SUB`, ...).
    pub alu_name: &'static str,
}

impl OpInfo {
    /// Returns the instruction class for this entry.
    #[must_use]
    pub const fn class(&self) -> InstrClass {
        InstrClass {
            format: self.format,
            is_load: self.is_load,
            is_jump: self.is_jump,
        }
    }
}

const fn op(
    mnemonic: &'static str,
    format: InstrFormat,
    alu_symbol: &'static str,
    alu_name: &'static str,
) -> OpInfo {
    OpInfo {
        mnemonic,
        format,
        is_load: false,
        is_jump: false,
        alu_symbol,
        alu_name,
    }
}

const fn load(mnemonic: &'static str) -> OpInfo {
    OpInfo {
        mnemonic,
        format: InstrFormat::I,
        is_load: true,
        is_jump: false,
        alu_symbol: "+",
        alu_name: "ADD",
    }
}

const fn jump(mnemonic: &'static str, format: InstrFormat) -> OpInfo {
    OpInfo {
        mnemonic,
        format,
        is_load: false,
        is_jump: true,
        alu_symbol: "+",
        alu_name: "ADD",
    }
}

/// The supported opcode table, grouped by RISC-V format.
pub const TABLE: &[OpInfo] = &[
    // R-type
    op("add", InstrFormat::R, "+", "ADD"),
    op("sub", InstrFormat::R, "-", "SUB"),
    op("and", InstrFormat::R, "&", "AND"),
    op("or", InstrFormat::R, "|", "OR"),
    op("xor", InstrFormat::R, "^", "XOR"),
    op("sll", InstrFormat::R, "<<", "SLL"),
    op("srl", InstrFormat::R, ">>", "SRL"),
    op("sra", InstrFormat::R, ">>", "SRA"),
    op("slt", InstrFormat::R, "<", "SLT"),
    op("sltu", InstrFormat::R, "<", "SLTU"),
    op("mul", InstrFormat::R, "*", "MUL"),
    op("mulh", InstrFormat::R, "*", "MULH"),
    op("mulhsu", InstrFormat::R, "*", "MULHSU"),
    op("mulhu", InstrFormat::R, "*", "MULHU"),
    op("div", InstrFormat::R, "/", "DIV"),
    op("divu", InstrFormat::R, "/", "DIVU"),
    op("rem", InstrFormat::R, "%", "REM"),
    op("remu", InstrFormat::R, "%", "REMU"),
    // I-type (ALU)
    op("addi", InstrFormat::I, "+", "ADD"),
    op("andi", InstrFormat::I, "&", "AND"),
    op("ori", InstrFormat::I, "|", "OR"),
    op("xori", InstrFormat::I, "^", "XOR"),
    op("slli", InstrFormat::I, "<<", "SLL"),
    op("srli", InstrFormat::I, ">>", "SRL"),
    op("srai", InstrFormat::I, ">>", "SRA"),
    op("slti", InstrFormat::I, "<", "SLT"),
    op("sltiu", InstrFormat::I, "<", "SLTU"),
    // li is a pseudo-instruction, treated as `addi rd, x0, imm`.
    op("li", InstrFormat::I, "+", "ADD"),
    // I-type (loads)
    load("lb"),
    load("lh"),
    load("lw"),
    load("lbu"),
    load("lhu"),
    // I-type (jump and system)
    jump("jalr", InstrFormat::I),
    op("ecall", InstrFormat::I, "SYS", "ECALL"),
    op("ebreak", InstrFormat::I, "SYS", "EBREAK"),
    // S-type
    op("sb", InstrFormat::S, "+", "ADD"),
    op("sh", InstrFormat::S, "+", "ADD"),
    op("sw", InstrFormat::S, "+", "ADD"),
    // B-type: the ALU subtracts to compare, so the operation name is SUB.
    op("beq", InstrFormat::B, "==", "SUB"),
    op("bne", InstrFormat::B, "!=", "SUB"),
    op("blt", InstrFormat::B, "<", "SUB"),
    op("bge", InstrFormat::B, ">=", "SUB"),
    op("bltu", InstrFormat::B, "<", "SUB"),
    op("bgeu", InstrFormat::B, ">=", "SUB"),
    // U-type
    op("lui", InstrFormat::U, "<<", "SLL"),
    op("auipc", InstrFormat::U, "+", "ADD"),
    // J-type
    jump("jal", InstrFormat::J),
];

/// Looks up a lowercase mnemonic in the table.
#[must_use]
pub fn lookup(mnemonic: &str) -> Option<&'static OpInfo> {
    TABLE.iter().find(|entry| entry.mnemonic == mnemonic)
}
