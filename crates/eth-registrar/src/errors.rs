//! # Error Types
//!
//! All error types for the registrar client.
//!
//! Two layers: [`RegistrarError`] covers local validation failures raised
//! before any network dispatch, and [`RpcError`] covers failures reported by
//! the node or the contract, which are propagated to the caller unmodified.

use crate::domain::value_objects::Address;
use thiserror::Error;

// =============================================================================
// REGISTRAR ERRORS
// =============================================================================

/// Errors surfaced by registrar operations.
///
/// Validation variants (`TooShort`, `InvalidName`, `NoDeposit`, `NotOwner`,
/// `CannotInvalidate`) are raised synchronously before any call leaves the
/// process. External failures arrive wrapped in [`RegistrarError::Rpc`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    /// Name is shorter than the registrar's minimum length.
    #[error("name is too short: {length} < {min}")]
    TooShort {
        /// Character count of the normalized name.
        length: usize,
        /// Minimum length configured for the registrar.
        min: usize,
    },

    /// Name contains characters that survive normalization but are not
    /// allowed, or normalizes to the empty string. Such a name can never be
    /// registered, unlike a merely too-short one.
    #[error("name {name:?} may only contain a-z, 0-9, '-' and '_' after normalization")]
    InvalidName {
        /// The offending input.
        name: String,
    },

    /// A sealed bid was submitted without a deposit covering the bid value.
    #[error("a deposit of at least the bid value must be sent with a sealed bid")]
    NoDeposit,

    /// The transaction sender does not own the deed being transferred.
    #[error("sender {sender} does not own the deed (owner is {owner})")]
    NotOwner {
        /// The `from` address supplied in the transaction parameters.
        sender: Address,
        /// The owner recorded on the deed.
        owner: Address,
    },

    /// Invalidation was requested for a name of valid length.
    #[error("name {name:?} is {length} characters, only names shorter than {min} can be invalidated")]
    CannotInvalidate {
        /// The normalized name.
        name: String,
        /// Character count of the normalized name.
        length: usize,
        /// Minimum length configured for the registrar.
        min: usize,
    },

    /// The operation exists on the contract but is not supported by this
    /// client. Fails loudly rather than silently doing nothing.
    #[error("operation not implemented: {0}")]
    Unimplemented(&'static str),

    /// The name service resolved the registrar's TLD to the zero address.
    #[error("no registrar deployed for TLD {tld:?}")]
    UnresolvedRegistrar {
        /// The top-level domain that failed to resolve.
        tld: String,
    },

    /// The contract returned a tuple that does not match the ABI this
    /// instance was constructed for. Usually a contract-version mismatch.
    #[error("malformed response from {method}: {reason}")]
    BadResponse {
        /// Contract method that produced the response.
        method: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// An external call failed. Propagated verbatim from the adapter; only
    /// the contract knows the authoritative reason for a revert.
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

// =============================================================================
// RPC ERRORS
// =============================================================================

/// Errors reported by the blockchain RPC adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Transport-level failure talking to the node.
    #[error("node transport error: {0}")]
    Transport(String),

    /// The node did not answer within the transport's own timeout.
    #[error("rpc timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout applied by the transport, in milliseconds.
        timeout_ms: u64,
    },

    /// The contract reverted the call or transaction.
    #[error("execution reverted: {0}")]
    Reverted(String),
}

// =============================================================================
// TESTS
// =============================================================================
