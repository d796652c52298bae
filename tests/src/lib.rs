//! # eth-registrar Test Suite
//!
//! Unified test crate exercising the registrar client end-to-end against
//! the simulated chain adapter.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── auction_flow.rs    # Full open → bid → reveal → finalize flows
//!     └── classification.rs  # Mode windows and normalization invariants
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p registrar-tests
//! ```

pub mod integration;
