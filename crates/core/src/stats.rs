//! Simulation statistics collection.
//!
//! This module tracks aggregate metrics for one simulation run:
//! 1. **Cycles and retirement:** Total cycles, retired and flushed instructions.
//! 2. **Stalls and flushes:** Bubble insertions and PC redirects.
//! 3. **Hazard mix:** Counts by hazard kind.

use serde::Serialize;

use crate::pipeline::hazards::HazardKind;

/// Aggregate statistics for one simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total simulated cycles.
    pub cycles: u64,
    /// Instructions that completed WB.
    pub instructions_retired: u64,
    /// Instructions flushed before completing.
    pub instructions_flushed: u64,
    /// Stall bubbles inserted.
    pub stall_cycles: u64,
    /// PC redirects (taken branches and jumps).
    pub flushes: u64,
    /// RAW hazards reported.
    pub data_hazards: u64,
    /// Load-use hazards reported.
    pub load_use_hazards: u64,
    /// Control hazards reported.
    pub control_hazards: u64,
    /// Internal-consistency anomalies reported.
    pub internal_hazards: u64,
}

impl SimStats {
    /// Bumps the counter for one reported hazard.
    pub fn record_hazard(&mut self, kind: HazardKind) {
        match kind {
            HazardKind::DataHazard => self.data_hazards += 1,
            HazardKind::LoadUseHazard => self.load_use_hazards += 1,
            HazardKind::ControlHazard => self.control_hazards += 1,
            HazardKind::InternalConsistency => self.internal_hazards += 1,
        }
    }
}
