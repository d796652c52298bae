//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the outbound ports. Production callers plug
//! in their own node transport; the in-memory simulated chain here backs
//! the test suite.

pub mod mock_chain;

pub use mock_chain::*;
