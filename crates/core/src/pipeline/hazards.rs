//! Hazard kinds, reports, and detection.
//!
//! The detector inspects the instructions resident in ID, EX, and MEM each
//! cycle (plus IF for unresolved-branch advisories) and produces:
//! 1. **Reports:** Advisory diagnostics attached to the cycle record.
//! 2. **Stall decisions:** Whether the ID occupant may advance at the next
//!    cycle boundary.
//!
//! No forwarding paths are modeled: a RAW dependency on an ALU producer is
//! resolved by stalling the consumer in ID until the producer has left MEM,
//! while a dependency on a load is released one cycle earlier (the loaded
//! value exists once MEM completes), which yields the classic single
//! load-use bubble.
//!
//! Detection never fails. A consistency violation between the signal tables
//! and an instruction's operand record is itself reported as a hazard, so
//! the simulator always produces a complete trace.

use serde::Serialize;

use crate::common::reg::Reg;
use crate::isa::instruction::{Instruction, Operands};
use crate::pipeline::Stage;
use crate::pipeline::tables;

/// The kind of a detected hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HazardKind {
    /// Read-after-write dependency on an in-flight producer.
    DataHazard,
    /// RAW dependency where the producer is a load in EX.
    LoadUseHazard,
    /// Unresolved or resolving branch/jump.
    ControlHazard,
    /// A detection invariant was violated; the trace is suspect here.
    InternalConsistency,
}

/// One hazard diagnostic, attached to the cycle in which it first became
/// observable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HazardReport {
    /// The hazard kind.
    pub kind: HazardKind,
    /// Human-readable explanation.
    pub description: String,
    /// The stages involved.
    pub stages: Vec<Stage>,
}

/// Identity of a hazard occurrence, used to report each one exactly once
/// even while the pipeline stalls on it across several cycles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HazardId {
    /// RAW pair: consumer index, producer index, register index.
    Raw(usize, usize, u8),
    /// Unresolved-branch advisory for one branch.
    Unresolved(usize),
    /// Resolution-time report for one branch.
    Resolved(usize),
    /// Table/operand cross-check failure for one instruction.
    Inconsistent(usize),
}

/// A detected hazard with its de-duplication identity.
#[derive(Clone, Debug)]
pub struct Detected {
    /// Identity for first-observation de-duplication.
    pub id: HazardId,
    /// The report to attach to the cycle record.
    pub report: HazardReport,
}

/// One occupied slot in the detection window: program index plus instruction.
pub type Occupant<'a> = Option<(usize, &'a Instruction)>;

/// The per-cycle detection window over the front of the pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct Window<'a> {
    /// Instruction in IF, if any.
    pub fetch: Occupant<'a>,
    /// Instruction in ID, if any.
    pub decode: Occupant<'a>,
    /// Instruction in EX, if any.
    pub execute: Occupant<'a>,
    /// Instruction in MEM, if any.
    pub memory: Occupant<'a>,
}

/// Whether the ID occupant must stall at the next cycle boundary.
///
/// The consumer may not advance while a producer of one of its sources sits
/// in EX, or in MEM unless that producer is a load (whose value exists once
/// its MEM access completes).
#[must_use]
pub fn needs_stall(
    consumer: &Instruction,
    execute: Option<&Instruction>,
    memory: Option<&Instruction>,
) -> bool {
    let sources = consumer.reads();
    let blocks = |producer: &Instruction| {
        producer
            .writes()
            .is_some_and(|rd| sources.contains(&rd))
    };
    if execute.is_some_and(blocks) {
        return true;
    }
    memory.is_some_and(|producer| !producer.class().is_load && blocks(producer))
}

/// Runs detection over one cycle's window.
///
/// Returns every hazard observable this cycle, with identities for
/// de-duplication. RAW pairs are reported against producers in EX and MEM;
/// an unresolved branch in ID with a speculatively fetched successor in IF
/// produces a control advisory.
#[must_use]
pub fn detect(window: &Window<'_>) -> Vec<Detected> {
    let mut found = Vec::new();

    if let Some((consumer_at, consumer)) = window.decode {
        consistency_check(consumer_at, consumer, &mut found);
        for (producer_slot, in_execute) in [(window.execute, true), (window.memory, false)] {
            let Some((producer_at, producer)) = producer_slot else {
                continue;
            };
            // A load past EX no longer blocks anyone: its value exists once
            // the memory access completes. Reports track the blocking rule.
            if producer.class().is_load && !in_execute {
                continue;
            }
            let Some(rd) = producer.writes() else {
                continue;
            };
            if !consumer.reads().contains(&rd) {
                continue;
            }
            found.push(raw_report(consumer_at, producer_at, producer.class().is_load, rd));
        }

        // Predict-not-taken: while a branch sits unresolved in ID, fetch
        // continues sequentially and the fetched instruction is speculative.
        if consumer.class().is_control() && window.fetch.is_some() {
            found.push(Detected {
                id: HazardId::Unresolved(consumer_at),
                report: HazardReport {
                    kind: HazardKind::ControlHazard,
                    description: format!(
                        "Control hazard: `{consumer}` is not resolved yet; the next \
                         sequential instruction is fetched speculatively."
                    ),
                    stages: vec![Stage::If, Stage::Id],
                },
            });
        }
    }

    found
}

/// Builds the resolution-time control report for a taken branch or jump
/// in EX.
#[must_use]
pub fn resolution(at: usize, instr: &Instruction) -> Detected {
    let description = if instr.class().is_jump {
        format!(
            "Control hazard: `{instr}` redirects the PC; speculatively fetched \
             instructions are flushed."
        )
    } else {
        format!(
            "Control hazard: the ALU resolves `{instr}` as taken; speculatively \
             fetched instructions are flushed and the PC is redirected."
        )
    };
    Detected {
        id: HazardId::Resolved(at),
        report: HazardReport {
            kind: HazardKind::ControlHazard,
            description,
            stages: vec![Stage::Ex],
        },
    }
}

fn raw_report(consumer_at: usize, producer_at: usize, load_use: bool, rd: Reg) -> Detected {
    let (kind, description) = if load_use {
        (
            HazardKind::LoadUseHazard,
            format!(
                "Load-use hazard: instruction {} needs {rd} while it is still being \
                 loaded by instruction {}. One bubble lets the load reach memory.",
                consumer_at + 1,
                producer_at + 1,
            ),
        )
    } else {
        (
            HazardKind::DataHazard,
            format!(
                "Data hazard: instruction {} needs {rd} from instruction {} but \
                 Val({rd}) is not ready. Stalling with a bubble until it is \
                 written back.",
                consumer_at + 1,
                producer_at + 1,
            ),
        )
    };
    Detected {
        id: HazardId::Raw(consumer_at, producer_at, rd.index()),
        report: HazardReport {
            kind,
            description,
            stages: vec![Stage::Id, Stage::Ex, Stage::Mem],
        },
    }
}

/// Cross-checks the ID signal table against the instruction's operand record.
///
/// If the table asserts a register read port that the operand record cannot
/// feed, the trace is annotated as suspect instead of aborting. System
/// instructions are exempt: they carry no operands by construction.
fn consistency_check(at: usize, instr: &Instruction, found: &mut Vec<Detected>) {
    if matches!(instr.operands(), Operands::System) {
        return;
    }
    let id = tables::id_signals(instr.class());
    let read_ports = usize::from(id.id_reg1) + usize::from(id.id_reg2);
    // reads() drops x0 and duplicates, so it can legitimately be smaller
    // than the port count, never larger.
    if instr.reads().len() > read_ports {
        found.push(Detected {
            id: HazardId::Inconsistent(at),
            report: HazardReport {
                kind: HazardKind::InternalConsistency,
                description: format!(
                    "Internal consistency: `{instr}` reads more registers than its \
                     decode signals account for; the surrounding cycles may be suspect."
                ),
                stages: vec![Stage::Id],
            },
        });
    }
}
