//! # Call Payloads
//!
//! Typed payloads exchanged with the blockchain RPC port: contract call
//! descriptions, their decoded return tuples, and transaction parameters.
//! The registrar's ABI is fixed, so a small closed set of value kinds
//! covers every method.

use crate::domain::value_objects::{Address, Hash, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// CALL VALUES
// =============================================================================

/// One ABI value in a call's arguments or return tuple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallValue {
    /// `uint256`.
    Uint(U256),
    /// `address`.
    Addr(Address),
    /// `bytes32`.
    Word(Hash),
    /// `bytes32[]`.
    Words(Vec<Hash>),
    /// `string`.
    Text(String),
}

impl From<U256> for CallValue {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<Address> for CallValue {
    fn from(value: Address) -> Self {
        Self::Addr(value)
    }
}

impl From<Hash> for CallValue {
    fn from(value: Hash) -> Self {
        Self::Word(value)
    }
}

impl From<Vec<Hash>> for CallValue {
    fn from(value: Vec<Hash>) -> Self {
        Self::Words(value)
    }
}

// =============================================================================
// CONTRACT CALL
// =============================================================================

/// A method invocation on a deployed contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    /// ABI method name.
    pub method: &'static str,
    /// Positional arguments.
    pub args: Vec<CallValue>,
}

impl ContractCall {
    /// Builds a call for `method` with the given arguments.
    #[must_use]
    pub fn new(method: &'static str, args: Vec<CallValue>) -> Self {
        Self { method, args }
    }
}

// =============================================================================
// RETURN DATA
// =============================================================================

/// The decoded return tuple of a read-only contract call.
///
/// Accessors are positional and strict about value kinds; a `None` from any
/// of them means the response does not match the ABI this client targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReturnData(pub Vec<CallValue>);

impl ReturnData {
    /// Number of values in the tuple.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the tuple is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `uint256` at position `index`, if present and of that kind.
    #[must_use]
    pub fn uint(&self, index: usize) -> Option<U256> {
        match self.0.get(index) {
            Some(CallValue::Uint(value)) => Some(*value),
            _ => None,
        }
    }

    /// The `address` at position `index`, if present and of that kind.
    #[must_use]
    pub fn address(&self, index: usize) -> Option<Address> {
        match self.0.get(index) {
            Some(CallValue::Addr(value)) => Some(*value),
            _ => None,
        }
    }

    /// The `bytes32` at position `index`, if present and of that kind.
    #[must_use]
    pub fn word(&self, index: usize) -> Option<Hash> {
        match self.0.get(index) {
            Some(CallValue::Word(value)) => Some(*value),
            _ => None,
        }
    }
}

// =============================================================================
// TRANSACTION PARAMETERS
// =============================================================================

/// Parameters attached to a state-changing transaction.
///
/// Mirrors what the node transport accepts; unset fields are left to the
/// node's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxParams {
    /// Sending account.
    pub from: Address,
    /// Ether attached to the transaction, in wei.
    pub value: Option<U256>,
    /// Gas limit override.
    pub gas: Option<u64>,
    /// Gas price override, in wei.
    pub gas_price: Option<U256>,
}

impl TxParams {
    /// Parameters with only the sender set.
    #[must_use]
    pub fn sender(from: Address) -> Self {
        Self {
            from,
            ..Self::default()
        }
    }

    /// Sets the attached value, in wei.
    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
