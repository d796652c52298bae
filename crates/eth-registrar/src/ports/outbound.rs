//! # Driven Ports (SPI - Outbound)
//!
//! The interfaces the registrar client depends on. External adapters
//! implement these traits to provide:
//! - Blockchain execution (read calls, transactions, balances, chain time)
//! - Name resolution (locating the registrar contract for a TLD)
//!
//! Adapter errors are propagated to callers unmodified; retry policy
//! belongs to the caller, never to this library.

use crate::domain::value_objects::{Address, Hash, U256};
use crate::errors::RpcError;
use crate::requests::{ContractCall, ReturnData, TxParams};
use async_trait::async_trait;

// =============================================================================
// BLOCKCHAIN RPC
// =============================================================================

/// Execution interface to a blockchain node.
///
/// Reads are idempotent and may be issued concurrently without ordering
/// constraints. Each write maps to exactly one external state-changing
/// request; the library never batches, retries or sequences them. Call
/// completion is bounded by the transport's own timeout behavior.
#[async_trait]
pub trait BlockchainRpc: Send + Sync {
    /// Executes a read-only contract call and returns the decoded tuple.
    async fn call_read(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> Result<ReturnData, RpcError>;

    /// Dispatches a state-changing transaction and returns its id.
    ///
    /// Once dispatched, the request cannot be withdrawn.
    async fn send_transaction(
        &self,
        contract: Address,
        call: ContractCall,
        params: &TxParams,
    ) -> Result<Hash, RpcError>;

    /// Ether balance of an account, in wei.
    async fn balance_of(&self, address: Address) -> Result<U256, RpcError>;

    /// Timestamp of the latest block, in unix seconds.
    ///
    /// The time source for mode classification — chain time, not the
    /// caller's wall clock.
    async fn block_timestamp(&self) -> Result<u64, RpcError>;
}

// =============================================================================
// NAME SERVICE
// =============================================================================

/// Name-resolution interface used to locate the registrar contract.
#[async_trait]
pub trait NameService: Send + Sync {
    /// Resolves the owner of a domain node. For a TLD this is the
    /// registrar contract governing it; the zero address means no
    /// registrar is deployed there.
    async fn resolve_owner(&self, domain: &str) -> Result<Address, RpcError>;
}
