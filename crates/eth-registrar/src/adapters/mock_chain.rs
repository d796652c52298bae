//! # Simulated Chain Adapter
//!
//! In-memory implementation of the outbound ports for testing: a registrar
//! contract, its deed escrows, account balances and a controllable clock.
//!
//! The simulation mirrors the deployed contract's observable rules — it is
//! the stand-in source of truth the client is exercised against, not a
//! client-side reimplementation for production use. Notably the sealed-bid
//! commitment formula lives here and only here, exactly as it lives inside
//! the real contract.

use crate::domain::entities::ContractVersion;
use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, Hash, U256};
use crate::errors::RpcError;
use crate::ports::outbound::{BlockchainRpc, NameService};
use crate::requests::{CallValue, ContractCall, ReturnData, TxParams};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Total auction length applied by the simulated registrar, in seconds.
pub const AUCTION_LENGTH_SECS: u64 = 5 * 24 * 60 * 60;

/// Unix timestamp the simulated chain starts at.
pub const GENESIS_TIMESTAMP: u64 = 1_500_000_000;

const REGISTRAR_ADDRESS: Address = Address([0xE0; 20]);

// =============================================================================
// CONTRACT-SIDE STATE
// =============================================================================

#[derive(Clone, Copy, Default)]
struct SimEntry {
    status: u8,
    deed: Address,
    registration_date: u64,
    value: U256,
    highest_bid: U256,
    highest_bidder: Address,
}

#[derive(Clone, Copy)]
struct SealedBid {
    escrow: Address,
    #[allow(dead_code)]
    deposit: U256,
}

#[derive(Clone, Copy)]
struct SimDeed {
    owner: Address,
    creation_date: u64,
}

#[derive(Default)]
struct ChainState {
    now: u64,
    entries: HashMap<Hash, SimEntry>,
    sealed: HashMap<(Address, Hash), SealedBid>,
    deeds: HashMap<Address, SimDeed>,
    balances: HashMap<Address, U256>,
    next_id: u64,
}

// =============================================================================
// SIMULATED CHAIN
// =============================================================================

/// In-memory registrar, name service and node clock for tests.
pub struct SimulatedChain {
    version: ContractVersion,
    tld: String,
    state: RwLock<ChainState>,
    reads: AtomicU64,
    transactions: AtomicU64,
}

impl SimulatedChain {
    /// Creates a chain with a registrar of the given generation deployed
    /// for the `eth` TLD.
    #[must_use]
    pub fn new(version: ContractVersion) -> Self {
        Self {
            version,
            tld: "eth".to_string(),
            state: RwLock::new(ChainState {
                now: GENESIS_TIMESTAMP,
                ..ChainState::default()
            }),
            reads: AtomicU64::new(0),
            transactions: AtomicU64::new(0),
        }
    }

    /// Deploys the registrar under a different TLD.
    #[must_use]
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = tld.into();
        self
    }

    /// The address the registrar contract is deployed at.
    #[must_use]
    pub fn registrar_address(&self) -> Address {
        REGISTRAR_ADDRESS
    }

    /// Current chain time, in unix seconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.state.read().unwrap().now
    }

    /// Advances the chain clock.
    pub fn advance_time(&self, secs: u64) {
        self.state.write().unwrap().now += secs;
    }

    /// Sets an account balance, in wei.
    pub fn set_balance(&self, address: Address, amount: U256) {
        self.state.write().unwrap().balances.insert(address, amount);
    }

    /// Read-only calls served so far.
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Transactions accepted so far.
    #[must_use]
    pub fn transaction_count(&self) -> u64 {
        self.transactions.load(Ordering::SeqCst)
    }

    /// The contract's sealed-bid commitment formula:
    /// keccak256(hash ++ owner ++ value ++ salt), tightly packed.
    fn seal(hash: Hash, owner: Address, value: U256, salt: Hash) -> Hash {
        let mut packed = Vec::with_capacity(32 + 20 + 32 + 32);
        packed.extend_from_slice(hash.as_bytes());
        packed.extend_from_slice(owner.as_bytes());
        let mut value_be = [0u8; 32];
        value.to_big_endian(&mut value_be);
        packed.extend_from_slice(&value_be);
        packed.extend_from_slice(salt.as_bytes());
        keccak256(&packed)
    }

    fn fresh_address(state: &mut ChainState) -> Address {
        state.next_id += 1;
        let digest = keccak256(&[b"deed".as_slice(), &state.next_id.to_be_bytes()].concat());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.as_bytes()[12..]);
        Address::new(bytes)
    }

    fn fresh_tx(state: &mut ChainState) -> Hash {
        state.next_id += 1;
        keccak256(&[b"tx".as_slice(), &state.next_id.to_be_bytes()].concat())
    }
}

// =============================================================================
// ARGUMENT DECODING
// =============================================================================

fn malformed(call: &ContractCall, index: usize) -> RpcError {
    RpcError::Reverted(format!("malformed argument {index} for {}", call.method))
}

fn want_word(call: &ContractCall, index: usize) -> Result<Hash, RpcError> {
    match call.args.get(index) {
        Some(CallValue::Word(value)) => Ok(*value),
        _ => Err(malformed(call, index)),
    }
}

fn want_addr(call: &ContractCall, index: usize) -> Result<Address, RpcError> {
    match call.args.get(index) {
        Some(CallValue::Addr(value)) => Ok(*value),
        _ => Err(malformed(call, index)),
    }
}

fn want_uint(call: &ContractCall, index: usize) -> Result<U256, RpcError> {
    match call.args.get(index) {
        Some(CallValue::Uint(value)) => Ok(*value),
        _ => Err(malformed(call, index)),
    }
}

fn want_words(call: &ContractCall, index: usize) -> Result<Vec<Hash>, RpcError> {
    match call.args.get(index) {
        Some(CallValue::Words(value)) => Ok(value.clone()),
        _ => Err(malformed(call, index)),
    }
}

fn want_text(call: &ContractCall, index: usize) -> Result<String, RpcError> {
    match call.args.get(index) {
        Some(CallValue::Text(value)) => Ok(value.clone()),
        _ => Err(malformed(call, index)),
    }
}

// =============================================================================
// PORT IMPLEMENTATIONS
// =============================================================================

#[async_trait]
impl BlockchainRpc for SimulatedChain {
    async fn call_read(
        &self,
        contract: Address,
        call: ContractCall,
    ) -> Result<ReturnData, RpcError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().unwrap();

        if contract == REGISTRAR_ADDRESS {
            return match call.method {
                "entries" => {
                    let hash = want_word(&call, 0)?;
                    let entry = state.entries.get(&hash).copied().unwrap_or_default();
                    Ok(ReturnData(vec![
                        CallValue::Uint(U256::from(entry.status)),
                        CallValue::Addr(entry.deed),
                        CallValue::Uint(U256::from(entry.registration_date)),
                        CallValue::Uint(entry.value),
                        CallValue::Uint(entry.highest_bid),
                    ]))
                }
                "shaBid" => {
                    let hash = want_word(&call, 0)?;
                    let owner = want_addr(&call, 1)?;
                    let value = want_uint(&call, 2)?;
                    let salt = want_word(&call, 3)?;
                    Ok(ReturnData(vec![CallValue::Word(Self::seal(
                        hash, owner, value, salt,
                    ))]))
                }
                "sealedBids" => {
                    let escrow = match self.version {
                        ContractVersion::Legacy => {
                            let seal = want_word(&call, 0)?;
                            state
                                .sealed
                                .iter()
                                .find(|((_, s), _)| *s == seal)
                                .map(|(_, bid)| bid.escrow)
                        }
                        ContractVersion::Hardened => {
                            let owner = want_addr(&call, 0)?;
                            let seal = want_word(&call, 1)?;
                            state.sealed.get(&(owner, seal)).map(|bid| bid.escrow)
                        }
                    };
                    Ok(ReturnData(vec![CallValue::Addr(
                        escrow.unwrap_or(Address::ZERO),
                    )]))
                }
                other => Err(RpcError::Reverted(format!("unknown read method {other}"))),
            };
        }

        if let Some(deed) = state.deeds.get(&contract) {
            return match call.method {
                "owner" => Ok(ReturnData(vec![CallValue::Addr(deed.owner)])),
                "creationDate" => Ok(ReturnData(vec![CallValue::Uint(U256::from(
                    deed.creation_date,
                ))])),
                other => Err(RpcError::Reverted(format!("unknown deed method {other}"))),
            };
        }

        Err(RpcError::Reverted(format!("no contract at {contract}")))
    }

    async fn send_transaction(
        &self,
        contract: Address,
        call: ContractCall,
        params: &TxParams,
    ) -> Result<Hash, RpcError> {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().unwrap();

        if contract != REGISTRAR_ADDRESS {
            return Err(RpcError::Reverted(format!("no contract at {contract}")));
        }

        match call.method {
            "startAuctions" => {
                let now = state.now;
                for hash in want_words(&call, 0)? {
                    let entry = state.entries.entry(hash).or_default();
                    if entry.status == 0 {
                        entry.status = 1;
                        entry.registration_date = now + AUCTION_LENGTH_SECS;
                        entry.value = U256::zero();
                        entry.highest_bid = U256::zero();
                        entry.highest_bidder = Address::ZERO;
                    }
                }
            }
            "newBid" => {
                let seal = want_word(&call, 0)?;
                let deposit = params
                    .value
                    .filter(|v| !v.is_zero())
                    .ok_or_else(|| RpcError::Reverted("bid must carry a deposit".to_string()))?;
                let escrow = Self::fresh_address(&mut state);
                state
                    .sealed
                    .insert((params.from, seal), SealedBid { escrow, deposit });
            }
            "unsealBid" => {
                let hash = want_word(&call, 0)?;
                let (owner, value, salt) = match self.version {
                    ContractVersion::Legacy => (
                        want_addr(&call, 1)?,
                        want_uint(&call, 2)?,
                        want_word(&call, 3)?,
                    ),
                    ContractVersion::Hardened => {
                        (params.from, want_uint(&call, 1)?, want_word(&call, 2)?)
                    }
                };
                let seal = Self::seal(hash, owner, value, salt);
                state
                    .sealed
                    .remove(&(owner, seal))
                    .ok_or_else(|| RpcError::Reverted("no sealed bid for seal".to_string()))?;
                let entry = state
                    .entries
                    .get_mut(&hash)
                    .ok_or_else(|| RpcError::Reverted("no auction for hash".to_string()))?;
                if entry.status != 1 {
                    return Err(RpcError::Reverted("not an active auction".to_string()));
                }
                if value > entry.highest_bid {
                    // Vickrey pricing: the winner pays the runner-up's bid.
                    entry.value = if entry.highest_bid.is_zero() {
                        value
                    } else {
                        entry.highest_bid
                    };
                    entry.highest_bid = value;
                    entry.highest_bidder = owner;
                }
            }
            "finalizeAuction" => {
                let hash = want_word(&call, 0)?;
                let now = state.now;
                let entry = state
                    .entries
                    .get(&hash)
                    .copied()
                    .ok_or_else(|| RpcError::Reverted("no auction for hash".to_string()))?;
                if entry.status != 1 {
                    return Err(RpcError::Reverted("not an active auction".to_string()));
                }
                if now <= entry.registration_date {
                    return Err(RpcError::Reverted("auction is still running".to_string()));
                }
                if entry.highest_bidder.is_zero() {
                    return Err(RpcError::Reverted("no revealed bids".to_string()));
                }
                let deed_address = Self::fresh_address(&mut state);
                state.deeds.insert(
                    deed_address,
                    SimDeed {
                        owner: entry.highest_bidder,
                        creation_date: now,
                    },
                );
                state.balances.insert(deed_address, entry.value);
                if let Some(entry) = state.entries.get_mut(&hash) {
                    entry.status = 2;
                    entry.deed = deed_address;
                }
            }
            "transfer" => {
                let hash = want_word(&call, 0)?;
                let new_owner = want_addr(&call, 1)?;
                let deed_address = state
                    .entries
                    .get(&hash)
                    .map(|entry| entry.deed)
                    .filter(|deed| !deed.is_zero())
                    .ok_or_else(|| RpcError::Reverted("no deed for hash".to_string()))?;
                let deed = state
                    .deeds
                    .get_mut(&deed_address)
                    .ok_or_else(|| RpcError::Reverted("deed record missing".to_string()))?;
                if deed.owner != params.from {
                    return Err(RpcError::Reverted(
                        "only the deed owner can transfer".to_string(),
                    ));
                }
                deed.owner = new_owner;
            }
            "invalidateName" => {
                let name = want_text(&call, 0)?;
                let hash = keccak256(name.as_bytes());
                let forbidden = match self.version {
                    ContractVersion::Hardened => 3,
                    ContractVersion::Legacy => 0,
                };
                let entry = state
                    .entries
                    .get_mut(&hash)
                    .ok_or_else(|| RpcError::Reverted("unknown name".to_string()))?;
                let deed = entry.deed;
                entry.status = forbidden;
                entry.deed = Address::ZERO;
                state.deeds.remove(&deed);
            }
            other => {
                return Err(RpcError::Reverted(format!("unknown method {other}")));
            }
        }

        Ok(Self::fresh_tx(&mut state))
    }

    async fn balance_of(&self, address: Address) -> Result<U256, RpcError> {
        Ok(self
            .state
            .read()
            .unwrap()
            .balances
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn block_timestamp(&self) -> Result<u64, RpcError> {
        Ok(self.state.read().unwrap().now)
    }
}

#[async_trait]
impl NameService for SimulatedChain {
    async fn resolve_owner(&self, domain: &str) -> Result<Address, RpcError> {
        if domain == self.tld {
            Ok(REGISTRAR_ADDRESS)
        } else {
            Ok(Address::ZERO)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
