//! Instruction Parsing Tests.
//!
//! Verifies operand-shape validation per format, comma/whitespace
//! normalization, memory-operand parsing, and the register read/write sets
//! that drive hazard detection.

use pipesim_core::common::reg::Reg;
use pipesim_core::isa::instruction::parse_program;
use pipesim_core::{Instruction, SimError};
use rstest::rstest;

fn parse(text: &str) -> Instruction {
    Instruction::parse(text, 1).unwrap_or_else(|err| panic!("`{text}` failed to parse: {err}"))
}

fn reg(name: &str) -> Reg {
    Reg::parse(name).unwrap_or_else(|| panic!("bad register `{name}`"))
}

// ══════════════════════════════════════════════════════════
// 1. Shapes and normalization
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("add x28,x29,x31", "add x28, x29, x31")]
#[case("ADD   x28 , x29 ,   x31", "add x28, x29, x31")]
#[case("lw x1, 0(x2)", "lw x1, 0(x2)")]
#[case("sw x5, -16(x6)", "sw x5, -16(x6)")]
#[case("beq x1 x0 40", "beq x1, x0, 40")]
#[case("beq x1, x3, LABEL", "beq x1, x3, LABEL")]
#[case("li x29, 10", "li x29, 10")]
#[case("jal x1, 24", "jal x1, 24")]
#[case("ecall", "ecall")]
fn parses_and_canonicalizes(#[case] input: &str, #[case] canonical: &str) {
    assert_eq!(parse(input).to_string(), canonical);
}

#[test]
fn negative_memory_offsets_parse() {
    let instr = parse("lw x8, -4(x2)");
    assert_eq!(instr.to_string(), "lw x8, -4(x2)");
}

// ══════════════════════════════════════════════════════════
// 2. Malformed operands
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("add x1, x2")] // missing rs2
#[case("beq x1, x0")] // branch missing its offset
#[case("lw x1, x2")] // load without offset(base)
#[case("lw x1, 0(x2), x3")] // too many operands
#[case("sw x1, (x2)")] // missing offset digits
#[case("add x1, x2, x99")] // register out of range
#[case("addi x1, x2, ten")] // non-numeric immediate
#[case("ecall x1")] // system instruction takes nothing
fn malformed_operands_are_rejected(#[case] input: &str) {
    match Instruction::parse(input, 3) {
        Err(SimError::MalformedOperands { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected MalformedOperands for `{input}`, got {other:?}"),
    }
}

#[test]
fn unknown_mnemonic_carries_line() {
    match Instruction::parse("bogus x1, x2", 7) {
        Err(SimError::UnknownInstruction { mnemonic, line }) => {
            assert_eq!(mnemonic, "bogus");
            assert_eq!(line, 7);
        }
        other => panic!("expected UnknownInstruction, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════
// 3. Register read/write sets
// ══════════════════════════════════════════════════════════

#[test]
fn r_type_reads_both_sources_and_writes_rd() {
    let instr = parse("add x28, x29, x31");
    assert_eq!(instr.reads(), vec![reg("x29"), reg("x31")]);
    assert_eq!(instr.writes(), Some(reg("x28")));
}

#[test]
fn load_reads_base_and_writes_destination() {
    let instr = parse("lw x1, 0(x2)");
    assert_eq!(instr.reads(), vec![reg("x2")]);
    assert_eq!(instr.writes(), Some(reg("x1")));
}

#[test]
fn store_reads_base_and_data_and_writes_nothing() {
    let instr = parse("sw x5, 16(x6)");
    assert_eq!(instr.reads(), vec![reg("x6"), reg("x5")]);
    assert_eq!(instr.writes(), None);
}

#[test]
fn branch_reads_both_and_writes_nothing() {
    let instr = parse("beq x1, x3, 8");
    assert_eq!(instr.reads(), vec![reg("x1"), reg("x3")]);
    assert_eq!(instr.writes(), None);
}

#[test]
fn li_reads_nothing() {
    let instr = parse("li x29, 10");
    assert!(instr.reads().is_empty());
    assert_eq!(instr.writes(), Some(reg("x29")));
}

#[test]
fn x0_is_never_a_hazard_endpoint() {
    // Reads of x0 are dropped; writes to x0 are discarded.
    let instr = parse("addi x28, x0, 10");
    assert!(instr.reads().is_empty());
    let instr = parse("add x0, x5, x6");
    assert_eq!(instr.writes(), None);
}

#[test]
fn duplicate_sources_are_reported_once() {
    let instr = parse("add x3, x7, x7");
    assert_eq!(instr.reads(), vec![reg("x7")]);
}

// ══════════════════════════════════════════════════════════
// 4. Whole-program parsing
// ══════════════════════════════════════════════════════════

#[test]
fn empty_program_is_rejected() {
    let none: [&str; 0] = [];
    assert_eq!(parse_program(&none), Err(SimError::EmptyProgram));
}

#[test]
fn program_errors_carry_their_position() {
    let program = ["add x1, x2, x3", "frobnicate x1"];
    match parse_program(&program) {
        Err(SimError::UnknownInstruction { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected UnknownInstruction at line 2, got {other:?}"),
    }
}
