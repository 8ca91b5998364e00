//! Simulator configuration.
//!
//! The simulator executes no register values, so the outcome of a conditional
//! branch is a policy rather than a computation. Resolution timing is not
//! configurable: branches and jumps always resolve at the end of their EX
//! cycle.
//!
//! Configuration is supplied as JSON by the embedding layer or built with
//! `SimConfig::default()`.

use serde::Deserialize;

/// Assumed outcome for conditional branches at EX resolution.
///
/// Jumps (`jal`/`jalr`) are unconditional and redirect regardless of policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPolicy {
    /// Conditional branches resolve as taken: fetched successors are flushed
    /// and the PC is redirected (default).
    #[default]
    AssumeTaken,
    /// Conditional branches resolve as not taken: execution continues
    /// sequentially with no flush.
    AssumeNotTaken,
}

/// Top-level simulator configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Assumed conditional-branch outcome.
    pub branch_policy: BranchPolicy,
}
