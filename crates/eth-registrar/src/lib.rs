//! # eth-registrar - Auction Registrar Client
//!
//! Typed client for the ENS `.eth` auction registrar contract: name
//! normalization, hash derivation, sealed-bid construction and a view model
//! over on-chain auction state.
//!
//! The deployed contract is the source of truth for the auction state
//! machine, bidding cryptography and fund custody. This crate derives
//! identifiers, validates requests before dispatch, and projects raw
//! contract tuples into typed entries with a derived lifecycle mode.
//!
//! ## Layers
//!
//! | Layer | Location | Purpose |
//! |-------|----------|---------|
//! | Domain | `domain/` | Value objects, entities, normalization, classifier |
//! | Ports | `ports/` | `BlockchainRpc` and `NameService` traits |
//! | Adapters | `adapters/` | In-memory simulated chain for tests |
//! | Service | `service.rs` | The `Registrar` request builder |
//!
//! ## Usage Example
//!
//! ```ignore
//! use eth_registrar::prelude::*;
//! use std::sync::Arc;
//!
//! let registrar = Registrar::connect(rpc, &names, RegistrarConfig::default()).await?;
//!
//! // Open an auction, hidden among decoy hashes
//! let params = TxParams::sender(owner);
//! registrar.open_auction("foobarbaz", None, &params).await?;
//!
//! // Seal a bid and submit it with a masking deposit
//! let bid = registrar.create_bid("foobarbaz", owner, value, "secret").await?;
//! registrar.submit_bid(&bid, &params.clone().with_value(deposit)).await?;
//!
//! // Reveal during the reveal window, then finalize
//! registrar.unseal_bid(&bid, &params).await?;
//! registrar.finalize_auction("foobarbaz", &params).await?;
//!
//! let entry = registrar.get_entry("foobarbaz").await?;
//! assert_eq!(entry.mode, Mode::Owned);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod requests;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Configuration
    pub use crate::config::{
        RegistrarConfig, DEFAULT_DECOY_COUNT, DEFAULT_MIN_LENGTH, DEFAULT_TLD,
    };

    // Domain entities
    pub use crate::domain::entities::{
        AuctionOpening, AuctionStatus, Bid, ContractVersion, Deed, Entry, Mode,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, Hash, U256};

    // Domain services
    pub use crate::domain::name::{normalize, validate};
    pub use crate::domain::services::{
        classify_mode, keccak256, label_hash, namehash, REVEAL_WINDOW_SECS,
    };

    // Ports
    pub use crate::ports::outbound::{BlockchainRpc, NameService};

    // Call payloads
    pub use crate::requests::{CallValue, ContractCall, ReturnData, TxParams};

    // Errors
    pub use crate::errors::{RegistrarError, RpcError};

    // Adapters
    pub use crate::adapters::mock_chain::SimulatedChain;

    // Service
    pub use crate::service::Registrar;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
