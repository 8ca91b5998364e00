//! Scheduler Scenario Tests.
//!
//! Walks complete programs through the simulator and checks the trace
//! cycle by cycle: fill/drain length, stage monotonicity, stall insertion,
//! control-hazard flushes, and determinism.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

use crate::common::{occupant, occupant_index, stage_path, trace_of};
use pipesim_core::{BranchPolicy, HazardKind, SimConfig, Simulator, Stage, Trace, run};

/// Every record must hold at most one real instruction per stage, and one
/// instruction must never appear in two stages at once.
fn assert_occupancy_invariant(trace: &Trace) {
    for record in trace {
        let mut seen = HashSet::new();
        for stage in Stage::ALL {
            if let Some(index) = occupant_index(record, stage) {
                assert!(
                    seen.insert(index),
                    "instruction {index} occupies two stages in cycle {}",
                    record.cycle
                );
            }
        }
    }
}

// ══════════════════════════════════════════════════════════
// 1. Fill and drain
// ══════════════════════════════════════════════════════════

#[test]
fn hazard_free_program_takes_n_plus_4_cycles() {
    let trace = trace_of(&["add x1, x2, x3", "add x4, x5, x6", "add x7, x8, x9"]);
    assert_eq!(trace.len(), 7);
    assert_eq!(trace.stats.stall_cycles, 0);
    assert_eq!(trace.stats.instructions_retired, 3);

    // The final cycle holds only the last instruction, in WB.
    let last = &trace.records[6];
    assert_eq!(occupant_index(last, Stage::Wb), Some(2));
    for stage in [Stage::If, Stage::Id, Stage::Ex, Stage::Mem] {
        assert!(occupant(last, stage).is_none());
    }
    assert_occupancy_invariant(&trace);
}

#[test]
fn single_instruction_takes_five_cycles() {
    let trace = trace_of(&["addi x5, x6, 1"]);
    assert_eq!(trace.len(), 5);
    assert_eq!(stage_path(&trace, 0), Stage::ALL.to_vec());
}

#[test]
fn stage_monotonicity_holds_for_every_instruction() {
    let trace = trace_of(&[
        "add x1, x2, x3",
        "sub x4, x1, x5",
        "lw x6, 0(x4)",
        "or x7, x6, x1",
    ]);
    for index in 0..4 {
        assert_eq!(
            stage_path(&trace, index),
            Stage::ALL.to_vec(),
            "instruction {index} skipped or repeated a stage"
        );
    }
    assert_occupancy_invariant(&trace);
}

// ══════════════════════════════════════════════════════════
// 2. The concrete data-hazard scenario
// ══════════════════════════════════════════════════════════

#[test]
fn add_sub_dependency_takes_eight_cycles() {
    let trace = trace_of(&["add x28, x29, x31", "sub x5, x28, x6"]);
    assert_eq!(trace.len(), 8, "6 base cycles plus 2 stall cycles");
    assert_eq!(trace.stats.stall_cycles, 2);
    assert_eq!(trace.stats.instructions_retired, 2);
    assert_eq!(trace.stats.data_hazards, 1);

    // Cycle 1: add in IF.
    assert_eq!(occupant(&trace.records[0], Stage::If).as_deref(), Some("add x28, x29, x31"));
    // Cycle 2: sub fetched behind it.
    assert_eq!(occupant(&trace.records[1], Stage::If).as_deref(), Some("sub x5, x28, x6"));
    assert_eq!(occupant(&trace.records[1], Stage::Id).as_deref(), Some("add x28, x29, x31"));

    // Cycle 3: the hazard on x28 becomes observable; sub is held in ID.
    let third = &trace.records[2];
    assert_eq!(third.hazards.len(), 1);
    assert_eq!(third.hazards[0].kind, HazardKind::DataHazard);
    assert!(third.hazards[0].description.contains("x28"));
    assert_eq!(occupant(third, Stage::Ex).as_deref(), Some("add x28, x29, x31"));
    assert_eq!(occupant(third, Stage::Id).as_deref(), Some("sub x5, x28, x6"));

    // Cycles 4 and 5: sub stalls in ID while bubbles fill EX; the hazard is
    // not re-reported.
    for record in &trace.records[3..5] {
        assert_eq!(occupant(record, Stage::Id).as_deref(), Some("sub x5, x28, x6"));
        assert_eq!(occupant(record, Stage::Ex).as_deref(), Some("bubble (stall)"));
        assert!(record.hazards.is_empty());
    }

    // sub proceeds once add has written back, retiring in cycle 8.
    assert_eq!(occupant(&trace.records[5], Stage::Ex).as_deref(), Some("sub x5, x28, x6"));
    assert_eq!(occupant(&trace.records[7], Stage::Wb).as_deref(), Some("sub x5, x28, x6"));
    assert_occupancy_invariant(&trace);
}

// ══════════════════════════════════════════════════════════
// 3. Load-use stall injection
// ══════════════════════════════════════════════════════════

#[test]
fn load_use_costs_exactly_one_bubble() {
    let trace = trace_of(&["lw x1, 0(x2)", "add x4, x1, x5"]);
    assert_eq!(trace.len(), 7, "6 base cycles plus 1 stall cycle");
    assert_eq!(trace.stats.stall_cycles, 1);
    assert_eq!(trace.stats.load_use_hazards, 1);

    // Cycle 3: consumer meets the load in EX.
    let third = &trace.records[2];
    assert_eq!(third.hazards.len(), 1);
    assert_eq!(third.hazards[0].kind, HazardKind::LoadUseHazard);

    // Cycle 4: one bubble in EX while the load is in MEM.
    let fourth = &trace.records[3];
    assert_eq!(occupant(fourth, Stage::Ex).as_deref(), Some("bubble (stall)"));
    assert_eq!(occupant(fourth, Stage::Mem).as_deref(), Some("lw x1, 0(x2)"));
    assert_eq!(occupant(fourth, Stage::Id).as_deref(), Some("add x4, x1, x5"));

    // Cycle 5: the consumer advances alongside the load's write-back.
    let fifth = &trace.records[4];
    assert_eq!(occupant(fifth, Stage::Ex).as_deref(), Some("add x4, x1, x5"));
    assert_eq!(occupant(fifth, Stage::Wb).as_deref(), Some("lw x1, 0(x2)"));
}

// ══════════════════════════════════════════════════════════
// 4. Stall propagation upstream
// ══════════════════════════════════════════════════════════

#[test]
fn a_stalled_decode_holds_fetch_in_place() {
    let trace = trace_of(&["add x1, x2, x3", "sub x4, x1, x5", "or x6, x7, x8"]);
    assert_eq!(trace.len(), 9, "7 base cycles plus 2 stall cycles");

    // While sub stalls in ID (cycles 4 and 5), or is held in IF.
    for record in &trace.records[3..5] {
        assert_eq!(occupant(record, Stage::Id).as_deref(), Some("sub x4, x1, x5"));
        assert_eq!(occupant(record, Stage::If).as_deref(), Some("or x6, x7, x8"));
    }
    assert_eq!(stage_path(&trace, 2), Stage::ALL.to_vec());
    assert_occupancy_invariant(&trace);
}

// ══════════════════════════════════════════════════════════
// 5. Control hazards and flushes
// ══════════════════════════════════════════════════════════

#[test]
fn taken_branch_flushes_speculative_instructions() {
    let program = ["beq x1, x0, 8", "addi x28, x0, 10", "sub x5, x6, x7"];
    let trace = trace_of(&program);
    assert_eq!(trace.len(), 7, "flushes do not lengthen the trace");
    assert_eq!(trace.stats.flushes, 1);
    assert_eq!(trace.stats.instructions_flushed, 2);
    assert_eq!(trace.stats.instructions_retired, 1);

    // Cycle 2: speculative-fetch advisory while the branch sits in ID.
    let second = &trace.records[1];
    assert_eq!(second.hazards.len(), 1);
    assert_eq!(second.hazards[0].kind, HazardKind::ControlHazard);

    // Cycle 3: resolution in EX; the ALU zero line asserts.
    let third = &trace.records[2];
    assert!(third.hazards.iter().any(|h| h.description.contains("taken")));
    assert!(third.stage_details.execute.is_some_and(|ex| ex.zero_mem));

    // Cycle 4: both speculative instructions are bubbled in place and the
    // IF path shows the redirect.
    let fourth = &trace.records[3];
    assert_eq!(occupant(fourth, Stage::Id).as_deref(), Some("bubble (flush)"));
    assert_eq!(occupant(fourth, Stage::Ex).as_deref(), Some("bubble (flush)"));
    assert_eq!(occupant(fourth, Stage::Mem).as_deref(), Some("beq x1, x0, 8"));
    let fetch = fourth.stage_details.fetch.unwrap_or_else(|| panic!("IF redirect record missing"));
    assert!(fetch.branch_taken);
    assert!(!fetch.pc_increment);
    assert!(fourth.stage_details.memory.is_some_and(|mem| mem.zero_mem2));

    // The flushed instructions never reappear.
    for record in &trace.records[3..] {
        for stage in Stage::ALL {
            assert!(occupant_index(record, stage).is_none_or(|index| index == 0));
        }
    }
    assert_occupancy_invariant(&trace);
}

#[test]
fn predict_not_taken_policy_runs_straight_through() {
    let config = SimConfig {
        branch_policy: BranchPolicy::AssumeNotTaken,
    };
    let program = ["beq x1, x0, 8", "addi x28, x0, 10", "sub x5, x6, x7"];
    let trace = Simulator::new(config)
        .run(&program)
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(trace.len(), 7);
    assert_eq!(trace.stats.flushes, 0);
    assert_eq!(trace.stats.instructions_retired, 3);
    // The speculative-fetch advisory is still issued.
    assert_eq!(trace.stats.control_hazards, 1);
}

#[test]
fn jumps_redirect_under_any_policy() {
    let config = SimConfig {
        branch_policy: BranchPolicy::AssumeNotTaken,
    };
    let trace = Simulator::new(config)
        .run(&["jal x1, 16", "addi x2, x0, 1"])
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(trace.len(), 6);
    assert_eq!(trace.stats.flushes, 1);
    assert_eq!(trace.stats.instructions_flushed, 1);
    assert_eq!(trace.stats.instructions_retired, 1);
}

#[test]
fn nothing_is_fetched_after_a_redirect() {
    let trace = trace_of(&["beq x1, x0, 8", "add x2, x3, x4", "add x5, x6, x7", "add x8, x9, x10"]);
    // Instruction 3 lies beyond the flushed window and on the not-taken
    // path; it must never be fetched.
    for record in &trace {
        for stage in Stage::ALL {
            assert_ne!(occupant_index(record, stage), Some(3));
        }
    }
}

// ══════════════════════════════════════════════════════════
// 6. Error surface
// ══════════════════════════════════════════════════════════

#[test]
fn bad_programs_produce_no_partial_trace() {
    let result = run(&["add x1, x2, x3", "bogus x4"]);
    assert!(result.is_err(), "a failed run yields an error, not a trace");
}

// ══════════════════════════════════════════════════════════
// 7. Determinism and length properties
// ══════════════════════════════════════════════════════════

const POOL: [&str; 8] = [
    "add x1, x2, x3",
    "sub x4, x1, x2",
    "lw x5, 0(x1)",
    "addi x6, x5, 1",
    "sw x6, 4(x2)",
    "and x7, x6, x5",
    "or x8, x7, x7",
    "li x9, 42",
];

proptest! {
    #[test]
    fn trace_is_deterministic_and_has_predicted_length(
        indices in proptest::collection::vec(0usize..POOL.len(), 1..12)
    ) {
        let program: Vec<&str> = indices.iter().map(|&i| POOL[i]).collect();
        let first = run(&program).unwrap_or_else(|err| panic!("{err}"));
        let second = run(&program).unwrap_or_else(|err| panic!("{err}"));
        prop_assert_eq!(&first, &second);

        // Branch-free pool: length is fill/drain plus stalls, exactly.
        let expected = program.len() + 4 + usize::try_from(first.stats.stall_cycles).unwrap_or(0);
        prop_assert_eq!(first.len(), expected);

        assert_occupancy_invariant(&first);
    }
}
