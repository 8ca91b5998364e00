//! Classifier Totality and Flag Tests.
//!
//! Verifies that every mnemonic in the supported opcode table classifies
//! without error, that the derived load/jump flags land on the right
//! instructions, and that anything outside the table is rejected.

use pipesim_core::isa::opcodes;
use pipesim_core::{InstrFormat, SimError, classify};
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Totality over the opcode table
// ══════════════════════════════════════════════════════════

#[test]
fn every_table_mnemonic_classifies() {
    for entry in opcodes::TABLE {
        let class = classify(entry.mnemonic)
            .unwrap_or_else(|err| panic!("`{}` failed to classify: {err}", entry.mnemonic));
        assert_eq!(class.format, entry.format, "format mismatch for `{}`", entry.mnemonic);
    }
}

#[test]
fn table_has_no_duplicate_mnemonics() {
    for (i, entry) in opcodes::TABLE.iter().enumerate() {
        assert!(
            opcodes::TABLE[i + 1..].iter().all(|other| other.mnemonic != entry.mnemonic),
            "duplicate table entry `{}`",
            entry.mnemonic
        );
    }
}

// ══════════════════════════════════════════════════════════
// 2. Format spot checks
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("add", InstrFormat::R)]
#[case("mul", InstrFormat::R)]
#[case("addi", InstrFormat::I)]
#[case("lw", InstrFormat::I)]
#[case("jalr", InstrFormat::I)]
#[case("sw", InstrFormat::S)]
#[case("beq", InstrFormat::B)]
#[case("lui", InstrFormat::U)]
#[case("jal", InstrFormat::J)]
fn classifies_to_expected_format(#[case] mnemonic: &str, #[case] format: InstrFormat) {
    assert_eq!(classify(mnemonic).unwrap().format, format);
}

// ══════════════════════════════════════════════════════════
// 3. Derived flags
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("lb")]
#[case("lh")]
#[case("lw")]
#[case("lbu")]
#[case("lhu")]
fn loads_are_flagged(#[case] mnemonic: &str) {
    let class = classify(mnemonic).unwrap();
    assert!(class.is_load);
    assert_eq!(class.format, InstrFormat::I);
}

#[test]
fn alu_i_types_are_not_loads() {
    assert!(!classify("addi").unwrap().is_load);
    assert!(!classify("li").unwrap().is_load);
}

#[test]
fn jumps_are_flagged() {
    assert!(classify("jal").unwrap().is_jump);
    assert!(classify("jalr").unwrap().is_jump);
    assert!(!classify("beq").unwrap().is_jump);
}

#[test]
fn branches_are_control_but_not_jumps() {
    let beq = classify("beq").unwrap();
    assert!(beq.is_branch());
    assert!(beq.is_control());
    let jal = classify("jal").unwrap();
    assert!(!jal.is_branch());
    assert!(jal.is_control());
}

// ══════════════════════════════════════════════════════════
// 4. Rejection
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("fadd.s")]
#[case("nop")]
#[case("addw")]
#[case("")]
fn unknown_mnemonics_are_rejected(#[case] mnemonic: &str) {
    match classify(mnemonic) {
        Err(SimError::UnknownInstruction { mnemonic: token, .. }) => {
            assert_eq!(token, mnemonic);
        }
        other => panic!("expected UnknownInstruction, got {other:?}"),
    }
}
