//! Unit tests for the simulator components.


/// Tests for the ISA layer: classification and instruction parsing.
pub mod isa;
