//! Common types shared across the simulator.
//!
//! This module provides the foundational vocabulary of the crate:
//! 1. **Errors:** The [`error::SimError`] taxonomy returned by parsing and simulation entry points.
//! 2. **Registers:** The [`reg::Reg`] newtype for architectural register names.

/// Simulation error definitions.
pub mod error;

/// Architectural register newtype and parsing.
pub mod reg;
