//! Component Annotation Tests.
//!
//! Checks the per-component explanation strings attached by `describe`:
//! fetch and decode annotations, memory-port text, the write-back note,
//! and the PC redirect wording after a taken branch.

use crate::common::trace_of;
use pipesim_core::describe;

// ══════════════════════════════════════════════════════════
// 1. Fetch and decode annotations
// ══════════════════════════════════════════════════════════

#[test]
fn fetch_annotation_carries_the_instruction() {
    let trace = trace_of(&["add x28, x29, x31"]);
    let enriched = describe(&trace.records[0]);
    let fetch = enriched.component.fetch.unwrap_or_else(|| panic!("IF component missing"));
    assert_eq!(fetch.pc.value, "PC = PC + 4");
    assert_eq!(fetch.instruction_mem.value, "add x28, x29, x31");
    assert!(fetch.instruction_mem.comment.contains("R-type"));
}

#[test]
fn decode_annotation_names_the_register_ports() {
    let trace = trace_of(&["add x28, x29, x31"]);
    let enriched = describe(&trace.records[1]);
    let decode = enriched.component.decode.unwrap_or_else(|| panic!("ID component missing"));
    assert_eq!(decode.registers.read_register_1.value, "Val(x29)");
    assert_eq!(decode.registers.read_register_2.value, "Val(x31)");
    assert_eq!(decode.registers.write_register.value, "x28");
    assert!(decode.imm_gen.is_none(), "R-type carries no immediate");
}

#[test]
fn load_decode_annotation_uses_the_base_register() {
    let trace = trace_of(&["lw x1, 0(x2)"]);
    let enriched = describe(&trace.records[1]);
    let decode = enriched.component.decode.unwrap_or_else(|| panic!("ID component missing"));
    assert_eq!(decode.registers.read_register_1.value, "Val(x2)");
    assert_eq!(decode.registers.read_register_2.value, "N/A");
    assert!(decode.imm_gen.is_some(), "loads extract their offset");
}

// ══════════════════════════════════════════════════════════
// 2. Execute and memory annotations
// ══════════════════════════════════════════════════════════

#[test]
fn alu_annotation_spells_out_the_operation() {
    let trace = trace_of(&["sub x5, x28, x6"]);
    let enriched = describe(&trace.records[2]);
    let execute = enriched.component.execute.unwrap_or_else(|| panic!("EX component missing"));
    assert!(execute.alu.alu_result.contains("SUB"));
    assert!(execute.alu.alu_result.contains("Val(x28) - Val(x6)"));
}

#[test]
fn branch_annotation_includes_the_target_adder() {
    let trace = trace_of(&["beq x1, x0, 8"]);
    let enriched = describe(&trace.records[2]);
    let execute = enriched.component.execute.unwrap_or_else(|| panic!("EX component missing"));
    assert!(execute.branch_adder.is_some());
    assert!(execute.alu.alu_result.contains("PC + 16"), "halfword offset is doubled");
}

#[test]
fn load_memory_annotation_names_the_address() {
    let trace = trace_of(&["lw x1, 0(x2)"]);
    let enriched = describe(&trace.records[3]);
    let memory = enriched.component.memory.unwrap_or_else(|| panic!("MEM component missing"));
    assert!(memory.data_memory.read_data.contains("Val(x2) + 0"));
    assert!(memory.data_memory.write_data.contains("No data written"));
}

#[test]
fn store_memory_annotation_names_the_stored_value() {
    let trace = trace_of(&["sw x5, 16(x6)"]);
    let enriched = describe(&trace.records[3]);
    let memory = enriched.component.memory.unwrap_or_else(|| panic!("MEM component missing"));
    assert!(memory.data_memory.write_data.contains("Store Val(x5)"));
    assert!(memory.data_memory.write_data.contains("Val(x6) + 16"));
}

// ══════════════════════════════════════════════════════════
// 3. Write-back note
// ══════════════════════════════════════════════════════════

#[test]
fn write_back_note_appears_when_the_writer_retires() {
    let trace = trace_of(&["add x28, x29, x31"]);
    // Cycle 5: add is in WB and no instruction is in ID.
    let enriched = describe(&trace.records[4]);
    let decode = enriched.component.decode.unwrap_or_else(|| panic!("ID note missing"));
    assert!(
        decode.registers.write_register.comment.contains("x28 is now written back"),
        "comment was: {}",
        decode.registers.write_register.comment
    );
}

#[test]
fn no_write_back_note_for_stores() {
    let trace = trace_of(&["sw x5, 16(x6)"]);
    let enriched = describe(&trace.records[4]);
    assert!(enriched.component.decode.is_none());
}

// ══════════════════════════════════════════════════════════
// 4. Redirect wording
// ══════════════════════════════════════════════════════════

#[test]
fn redirect_cycle_shows_the_scaled_branch_target() {
    let trace = trace_of(&["beq x1, x0, 8", "addi x28, x0, 10"]);
    // Cycle 4: the branch is in MEM and the IF path shows the redirect.
    let enriched = describe(&trace.records[3]);
    let fetch = enriched.component.fetch.unwrap_or_else(|| panic!("IF component missing"));
    assert_eq!(fetch.pc.value, "PC = PC + 16");
}

#[test]
fn jalr_redirect_uses_the_base_register() {
    let trace = trace_of(&["jalr x1, x5, 4", "addi x2, x0, 1"]);
    let enriched = describe(&trace.records[3]);
    let fetch = enriched.component.fetch.unwrap_or_else(|| panic!("IF component missing"));
    assert_eq!(fetch.pc.value, "PC = Val(x5) + 4");
}
