//! The stage occupancy scheduler.
//!
//! This module walks the simulated clock. Each cycle it:
//! 1. **Snapshots** the current occupancy into a [`CycleRecord`] with per-stage
//!    signals and any newly observable hazards.
//! 2. **Advances** every in-flight instruction one stage, unless the hazard
//!    detector demands a stall (the vacated stage receives a bubble) or a
//!    resolving branch/jump demands a flush (fetched successors are replaced
//!    in place by bubbles and fetch stops).
//!
//! The walk is a pure function of the instruction list and configuration:
//! the same input always yields a byte-identical trace. All cursor state for
//! interactive stepping lives with the caller, outside this crate.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::common::error::SimError;
use crate::config::{BranchPolicy, SimConfig};
use crate::isa::instruction::{self, Instruction};
use crate::pipeline::Stage;
use crate::pipeline::hazards::{self, HazardId, Window};
use crate::pipeline::tables;
use crate::pipeline::trace::{BubbleKind, CycleRecord, StageDetails, StageMap, StageSlot, Trace};
use crate::stats::SimStats;

/// Pipeline array indices, in stage order.
const IF: usize = 0;
const ID: usize = 1;
const EX: usize = 2;
const MEM: usize = 3;
const WB: usize = 4;

/// Internal stage occupant: a program index or a bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Instr(usize),
    Bubble(BubbleKind),
}

/// The pipelined datapath simulator.
///
/// Holds only configuration; every [`run`](Self::run) call is independent,
/// so one `Simulator` may serve concurrent callers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    /// Creates a simulator with the given configuration.
    #[must_use]
    pub const fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Simulates a program, one instruction string per line.
    ///
    /// Returns the complete cycle trace. The trace for a hazard-free,
    /// branch-free program of N instructions is exactly N + 4 cycles
    /// (pipeline fill and drain), extended by one cycle per stall; flushes
    /// do not change the length.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyProgram`] for an empty list, and classification or
    /// operand-shape errors from parsing, each carrying the offending line.
    /// A successful parse always produces a complete trace; hazard anomalies
    /// are reported inside the trace, never as errors.
    pub fn run<S: AsRef<str>>(&self, program: &[S]) -> Result<Trace, SimError> {
        let instrs = instruction::parse_program(program)?;
        Ok(self.simulate(&instrs))
    }

    /// Whether this instruction steers the PC when it resolves in EX.
    const fn redirects(&self, instr: &Instruction) -> bool {
        let class = instr.class();
        class.is_jump
            || (class.is_branch() && matches!(self.config.branch_policy, BranchPolicy::AssumeTaken))
    }

    fn simulate(&self, instrs: &[Instruction]) -> Trace {
        let mut pipe: [Option<Slot>; 5] = [None; 5];
        let mut stats = SimStats::default();
        let mut records: Vec<CycleRecord> = Vec::with_capacity(instrs.len() + 4);
        let mut reported: HashSet<HazardId> = HashSet::new();

        let mut next_fetch = 1;
        let mut fetch_halted = false;
        let mut redirect_view = false;
        pipe[IF] = Some(Slot::Instr(0));

        let mut cycle = 1;
        loop {
            records.push(self.snapshot(cycle, &pipe, instrs, redirect_view, &mut reported, &mut stats));

            // A branch/jump resolves at the end of its EX cycle.
            let resolving = match pipe[EX] {
                Some(Slot::Instr(i)) => self.redirects(&instrs[i]),
                _ => false,
            };

            let mut next: [Option<Slot>; 5] = [None; 5];
            if matches!(pipe[WB], Some(Slot::Instr(_))) {
                stats.instructions_retired += 1;
            }
            next[WB] = pipe[MEM];
            next[MEM] = pipe[EX];

            if resolving {
                // Everything fetched behind the branch is on the wrong path:
                // replace each occupant in place with a flush bubble and stop
                // fetching (the target is outside the supplied program).
                stats.flushes += 1;
                fetch_halted = true;
                redirect_view = true;
                for (stage, target) in [(ID, EX), (IF, ID)] {
                    match pipe[stage] {
                        Some(Slot::Instr(i)) => {
                            debug!(cycle, instruction = %instrs[i], "flush");
                            stats.instructions_flushed += 1;
                            next[target] = Some(Slot::Bubble(BubbleKind::Flush));
                        }
                        Some(Slot::Bubble(kind)) => next[target] = Some(Slot::Bubble(kind)),
                        None => {}
                    }
                }
            } else {
                redirect_view = false;
                match pipe[ID] {
                    Some(Slot::Instr(i)) => {
                        let execute = occupant(&pipe, EX, instrs).map(|(_, instr)| instr);
                        let memory = occupant(&pipe, MEM, instrs).map(|(_, instr)| instr);
                        if hazards::needs_stall(&instrs[i], execute, memory) {
                            debug!(cycle, instruction = %instrs[i], "stall: bubble into EX");
                            stats.stall_cycles += 1;
                            next[ID] = pipe[ID];
                            next[EX] = Some(Slot::Bubble(BubbleKind::Stall));
                        } else {
                            next[EX] = pipe[ID];
                        }
                    }
                    Some(Slot::Bubble(kind)) => next[EX] = Some(Slot::Bubble(kind)),
                    None => {}
                }
                if let Some(slot) = pipe[IF] {
                    // A stalled ID holds IF in place as well.
                    if next[ID].is_none() {
                        next[ID] = Some(slot);
                    } else {
                        next[IF] = Some(slot);
                    }
                }
                if next[IF].is_none() && !fetch_halted && next_fetch < instrs.len() {
                    trace!(cycle, index = next_fetch, "fetch");
                    next[IF] = Some(Slot::Instr(next_fetch));
                    next_fetch += 1;
                }
            }

            pipe = next;
            if pipe.iter().all(Option::is_none) {
                break;
            }
            cycle += 1;
        }

        stats.cycles = records.len() as u64;
        debug!(
            cycles = stats.cycles,
            retired = stats.instructions_retired,
            stalls = stats.stall_cycles,
            "simulation complete"
        );
        Trace { records, stats }
    }

    /// Builds the record for one cycle from the current occupancy.
    fn snapshot(
        &self,
        cycle: usize,
        pipe: &[Option<Slot>; 5],
        instrs: &[Instruction],
        redirect_view: bool,
        reported: &mut HashSet<HazardId>,
        stats: &mut SimStats,
    ) -> CycleRecord {
        let mut stages: StageMap<StageSlot> = StageMap::new();
        let mut details = StageDetails::default();

        for (index, stage) in Stage::ALL.into_iter().enumerate() {
            let Some(slot) = pipe[index] else { continue };
            let rendered = match slot {
                Slot::Instr(i) => StageSlot::Instr {
                    index: i,
                    instr: instrs[i].clone(),
                },
                Slot::Bubble(kind) => StageSlot::Bubble(kind),
            };
            *stages.slot_mut(stage) = Some(rendered);

            if let Slot::Instr(i) = slot {
                let class = instrs[i].class();
                match stage {
                    Stage::If => details.fetch = Some(tables::if_signals(class)),
                    Stage::Id => details.decode = Some(tables::id_signals(class)),
                    Stage::Ex => details.execute = Some(tables::ex_signals(class)),
                    Stage::Mem => details.memory = Some(tables::mem_signals(class)),
                    Stage::Wb => details.writeback = Some(tables::wb_signals(class)),
                }
            }
        }

        // The cycle after a taken resolution: the PC-steering paths are live
        // even though nothing was fetched, and a branch in MEM carries its
        // asserted condition forward.
        if redirect_view {
            details.fetch = Some(tables::IF_REDIRECT);
            let branch_in_mem =
                occupant(pipe, MEM, instrs).is_some_and(|(_, instr)| instr.class().is_branch());
            if branch_in_mem {
                if let Some(mem) = details.memory.as_mut() {
                    mem.zero_mem2 = true;
                }
            }
        }

        let resolving = occupant(pipe, EX, instrs).filter(|(_, instr)| self.redirects(instr));
        if resolving.is_some_and(|(_, instr)| instr.class().is_branch()) {
            if let Some(ex) = details.execute.as_mut() {
                // The ALU zero line asserts as the branch condition holds.
                ex.zero_mem = true;
            }
        }

        let window = Window {
            fetch: occupant(pipe, IF, instrs),
            decode: occupant(pipe, ID, instrs),
            execute: occupant(pipe, EX, instrs),
            memory: occupant(pipe, MEM, instrs),
        };
        let mut reports = Vec::new();
        for detected in hazards::detect(&window) {
            if reported.insert(detected.id) {
                stats.record_hazard(detected.report.kind);
                reports.push(detected.report);
            }
        }
        if let Some((i, instr)) = resolving {
            let detected = hazards::resolution(i, instr);
            if reported.insert(detected.id) {
                stats.record_hazard(detected.report.kind);
                reports.push(detected.report);
            }
        }

        CycleRecord {
            cycle,
            stages,
            stage_details: details,
            hazards: reports,
        }
    }
}

/// The real instruction occupying a stage, if any.
fn occupant<'a>(
    pipe: &[Option<Slot>; 5],
    stage: usize,
    instrs: &'a [Instruction],
) -> Option<(usize, &'a Instruction)> {
    match pipe[stage] {
        Some(Slot::Instr(i)) => Some((i, &instrs[i])),
        _ => None,
    }
}

/// Simulates a program with the default configuration.
///
/// Convenience wrapper over [`Simulator::run`].
///
/// # Errors
///
/// See [`Simulator::run`].
pub fn run<S: AsRef<str>>(program: &[S]) -> Result<Trace, SimError> {
    Simulator::default().run(program)
}
