//! # Registrar Service
//!
//! The client's entry point: validates inputs, shapes contract calls and
//! dispatches them through the outbound ports. All auction logic and fund
//! custody live in the deployed contract; this service only derives
//! identifiers, builds requests and projects responses into view models.
//!
//! Every operation is an `async fn` — the returned future is the completion
//! handle. Local validation failures resolve before anything leaves the
//! process; external failures are propagated verbatim.

use crate::config::RegistrarConfig;
use crate::domain::entities::{AuctionOpening, AuctionStatus, Bid, ContractVersion, Deed, Entry};
use crate::domain::name;
use crate::domain::services::{keccak256, label_hash, namehash};
use crate::domain::value_objects::{Address, Hash, U256};
use crate::errors::RegistrarError;
use crate::ports::outbound::{BlockchainRpc, NameService};
use crate::requests::{CallValue, ContractCall, ReturnData, TxParams};

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// =============================================================================
// RESPONSE DECODING HELPERS
// =============================================================================

fn required_uint(
    data: &ReturnData,
    method: &'static str,
    index: usize,
) -> Result<U256, RegistrarError> {
    data.uint(index).ok_or_else(|| RegistrarError::BadResponse {
        method,
        reason: format!("expected uint at position {index}"),
    })
}

fn required_address(
    data: &ReturnData,
    method: &'static str,
    index: usize,
) -> Result<Address, RegistrarError> {
    data.address(index)
        .ok_or_else(|| RegistrarError::BadResponse {
            method,
            reason: format!("expected address at position {index}"),
        })
}

fn required_word(
    data: &ReturnData,
    method: &'static str,
    index: usize,
) -> Result<Hash, RegistrarError> {
    data.word(index).ok_or_else(|| RegistrarError::BadResponse {
        method,
        reason: format!("expected bytes32 at position {index}"),
    })
}

fn uint_to_u64(value: U256, method: &'static str) -> Result<u64, RegistrarError> {
    if value > U256::from(u64::MAX) {
        return Err(RegistrarError::BadResponse {
            method,
            reason: format!("uint out of range: {value}"),
        });
    }
    Ok(value.low_u64())
}

fn uint_to_u8(value: U256, method: &'static str) -> Result<u8, RegistrarError> {
    if value > U256::from(u8::MAX) {
        return Err(RegistrarError::BadResponse {
            method,
            reason: format!("status out of range: {value}"),
        });
    }
    Ok(value.low_u64() as u8)
}

// =============================================================================
// REGISTRAR
// =============================================================================

/// Client for a deployed `.eth`-style auction registrar.
///
/// Construct with [`Registrar::connect`]; the instance returned is fully
/// usable. Configuration is fixed for the lifetime of the instance — one
/// instance targets one registrar at one contract generation.
pub struct Registrar<R: BlockchainRpc> {
    rpc: Arc<R>,
    config: RegistrarConfig,
    address: Address,
    root_node: Hash,
}

impl<R: BlockchainRpc> std::fmt::Debug for Registrar<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("address", &self.address)
            .field("root_node", &self.root_node)
            .finish_non_exhaustive()
    }
}

impl<R: BlockchainRpc> Registrar<R> {
    /// Resolves the registrar's contract address through the name service
    /// and returns a connected client.
    ///
    /// This is the single asynchronous bootstrap step: nothing else may be
    /// invoked before it completes, and nothing else needs the name
    /// service afterwards.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::UnresolvedRegistrar`] when the TLD resolves to the
    /// zero address; [`RegistrarError::Rpc`] on resolution failure.
    #[instrument(skip_all, fields(tld = %config.tld))]
    pub async fn connect<N: NameService + ?Sized>(
        rpc: Arc<R>,
        names: &N,
        config: RegistrarConfig,
    ) -> Result<Self, RegistrarError> {
        let address = names.resolve_owner(&config.tld).await?;
        if address.is_zero() {
            return Err(RegistrarError::UnresolvedRegistrar {
                tld: config.tld.clone(),
            });
        }
        let root_node = namehash(&config.tld);
        info!(registrar = %address, "connected to auction registrar");
        Ok(Self {
            rpc,
            config,
            address,
            root_node,
        })
    }

    /// The registrar contract's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The namehash node of the registrar's TLD.
    #[must_use]
    pub fn root_node(&self) -> Hash {
        self.root_node
    }

    /// The configuration this instance was constructed with.
    #[must_use]
    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Returns the entry for a name or a pre-computed hash.
    ///
    /// A `0x`-prefixed 64-digit hex string is taken as a hash; anything
    /// else is normalized as a name first. Hash queries cannot recover the
    /// label, so their entries carry `name: None` and skip the short-name
    /// classification branch.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::InvalidName`] for names that cannot be
    /// normalized; adapter and decoding failures otherwise.
    pub async fn get_entry(&self, input: &str) -> Result<Entry, RegistrarError> {
        if input.starts_with("0x") {
            if let Some(hash) = Hash::from_hex(input) {
                return self.fetch_entry(hash, None).await;
            }
        }
        let canonical = name::normalize(input)?;
        let hash = label_hash(&canonical);
        self.fetch_entry(hash, Some(canonical)).await
    }

    /// Returns the entry for a pre-computed hash.
    ///
    /// # Errors
    ///
    /// Adapter and decoding failures.
    pub async fn get_entry_by_hash(&self, hash: Hash) -> Result<Entry, RegistrarError> {
        self.fetch_entry(hash, None).await
    }

    async fn fetch_entry(
        &self,
        hash: Hash,
        name: Option<String>,
    ) -> Result<Entry, RegistrarError> {
        let data = self
            .rpc
            .call_read(self.address, ContractCall::new("entries", vec![hash.into()]))
            .await?;

        let status_raw = uint_to_u8(required_uint(&data, "entries", 0)?, "entries")?;
        let status = AuctionStatus::from_raw(self.config.version, status_raw);
        let deed_address = required_address(&data, "entries", 1)?;
        let registration_date = uint_to_u64(required_uint(&data, "entries", 2)?, "entries")?;
        let value = required_uint(&data, "entries", 3)?;
        let highest_bid = required_uint(&data, "entries", 4)?;

        // Zero deed address: no escrow exists, skip the extra round-trips.
        let deed = if deed_address.is_zero() {
            Deed::vacant()
        } else {
            self.fetch_deed(deed_address).await?
        };

        let now = self.rpc.block_timestamp().await?;
        Ok(Entry::assemble(
            name,
            hash,
            status,
            deed,
            registration_date,
            value,
            highest_bid,
            self.config.min_length,
            now,
        ))
    }

    async fn fetch_deed(&self, address: Address) -> Result<Deed, RegistrarError> {
        let data = self
            .rpc
            .call_read(address, ContractCall::new("creationDate", vec![]))
            .await?;
        let creation_date = uint_to_u64(required_uint(&data, "creationDate", 0)?, "creationDate")?;

        let data = self
            .rpc
            .call_read(address, ContractCall::new("owner", vec![]))
            .await?;
        let owner = required_address(&data, "owner", 0)?;

        let balance = self.rpc.balance_of(address).await?;
        Ok(Deed {
            address,
            balance,
            creation_date,
            owner,
        })
    }

    /// Queries whether the sealed-bid escrow for this bid still exists.
    /// A revealed or withdrawn bid reads back as the zero address.
    ///
    /// # Errors
    ///
    /// Adapter and decoding failures.
    pub async fn is_bid_revealed(&self, bid: &Bid) -> Result<bool, RegistrarError> {
        let call = match self.config.version {
            ContractVersion::Legacy => ContractCall::new("sealedBids", vec![bid.sealed.into()]),
            ContractVersion::Hardened => {
                ContractCall::new("sealedBids", vec![bid.owner.into(), bid.sealed.into()])
            }
        };
        let data = self.rpc.call_read(self.address, call).await?;
        Ok(required_address(&data, "sealedBids", 0)?.is_zero())
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Opens an auction for `name`, hidden among decoy hashes.
    ///
    /// Bidding intent is obscured by opening several auctions in one call:
    /// the real hash is placed at a random position among the decoys
    /// (supplied, or freshly generated). Returns the transaction id and
    /// the full dispatched hash set.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::TooShort`] or [`RegistrarError::InvalidName`]
    /// before dispatch; adapter failures after.
    #[instrument(skip(self, decoys, params), fields(name = %name))]
    pub async fn open_auction(
        &self,
        name: &str,
        decoys: Option<Vec<Hash>>,
        params: &TxParams,
    ) -> Result<AuctionOpening, RegistrarError> {
        let canonical = name::validate(name, self.config.min_length)?;
        let hash = label_hash(&canonical);

        let mut rng = rand::thread_rng();
        let mut hashes = decoys.unwrap_or_else(|| {
            (0..self.config.decoy_count)
                .map(|_| Hash::new(rng.gen()))
                .collect()
        });
        hashes.push(hash);
        let last = hashes.len() - 1;
        let slot = rng.gen_range(0..hashes.len());
        hashes.swap(last, slot);

        debug!(batch = hashes.len(), "dispatching auction batch");
        let transaction = self
            .rpc
            .send_transaction(
                self.address,
                ContractCall::new("startAuctions", vec![hashes.clone().into()]),
                params,
            )
            .await?;
        info!(%hash, %transaction, "auction opened");
        Ok(AuctionOpening {
            transaction,
            hashes,
        })
    }

    /// Builds a sealed [`Bid`] for `name`.
    ///
    /// The commitment is obtained from the contract's read-only `shaBid`
    /// call — the formula is part of the contract's trust boundary and is
    /// never computed client-side. The caller must retain the returned
    /// record: the contract cannot reproduce it, and a lost secret is
    /// unrecoverable.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::TooShort`] or [`RegistrarError::InvalidName`]
    /// before dispatch; adapter failures after.
    pub async fn create_bid(
        &self,
        name: &str,
        owner: Address,
        value: U256,
        secret: &str,
    ) -> Result<Bid, RegistrarError> {
        let canonical = name::validate(name, self.config.min_length)?;
        let hash = label_hash(&canonical);
        let hex_secret = keccak256(secret.as_bytes());

        let data = self
            .rpc
            .call_read(
                self.address,
                ContractCall::new(
                    "shaBid",
                    vec![hash.into(), owner.into(), value.into(), hex_secret.into()],
                ),
            )
            .await?;
        let sealed = required_word(&data, "shaBid", 0)?;

        Ok(Bid {
            name: canonical,
            hash,
            owner,
            value,
            secret: secret.to_string(),
            hex_secret,
            sealed,
        })
    }

    /// Submits a sealed bid with its deposit.
    ///
    /// The deposit (`params.value`) must be present and at least the bid
    /// value; otherwise the call fails locally with
    /// [`RegistrarError::NoDeposit`] instead of dispatching a transaction
    /// the contract would reject.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::NoDeposit`] before dispatch; adapter failures
    /// after.
    #[instrument(skip(self, bid, params), fields(name = %bid.name))]
    pub async fn submit_bid(&self, bid: &Bid, params: &TxParams) -> Result<Hash, RegistrarError> {
        let deposit = params.value.ok_or(RegistrarError::NoDeposit)?;
        if deposit < bid.value {
            return Err(RegistrarError::NoDeposit);
        }
        let transaction = self
            .rpc
            .send_transaction(
                self.address,
                ContractCall::new("newBid", vec![bid.sealed.into()]),
                params,
            )
            .await?;
        info!(%transaction, "sealed bid submitted");
        Ok(transaction)
    }

    /// Reveals a previously submitted bid.
    ///
    /// # Errors
    ///
    /// Adapter failures; the contract rejects reveals without a matching
    /// sealed bid.
    pub async fn unseal_bid(&self, bid: &Bid, params: &TxParams) -> Result<Hash, RegistrarError> {
        self.dispatch_unseal(bid.hash, bid.owner, bid.value, bid.hex_secret, params)
            .await
    }

    /// Reveals a bid from its parts, for callers that persisted the bid
    /// parameters rather than the [`Bid`] record.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::InvalidName`] before dispatch; adapter failures
    /// after.
    pub async fn unseal_bid_parts(
        &self,
        name: &str,
        owner: Address,
        value: U256,
        secret: &str,
        params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        let canonical = name::normalize(name)?;
        self.dispatch_unseal(
            label_hash(&canonical),
            owner,
            value,
            keccak256(secret.as_bytes()),
            params,
        )
        .await
    }

    async fn dispatch_unseal(
        &self,
        hash: Hash,
        owner: Address,
        value: U256,
        salt: Hash,
        params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        // The hardened ABI credits msg.sender; a mismatched sender cannot
        // match the escrow record.
        if self.config.version == ContractVersion::Hardened && params.from != owner {
            warn!(%owner, sender = %params.from, "reveal sender differs from bid owner");
        }
        let args = match self.config.version {
            ContractVersion::Legacy => {
                vec![hash.into(), owner.into(), value.into(), salt.into()]
            }
            ContractVersion::Hardened => vec![hash.into(), value.into(), salt.into()],
        };
        self.rpc
            .send_transaction(self.address, ContractCall::new("unsealBid", args), params)
            .await
            .map_err(Into::into)
    }

    /// Finalizes an auction after its registration date, assigning the
    /// name to the highest revealed bidder.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::InvalidName`] before dispatch; adapter failures
    /// after.
    #[instrument(skip(self, params), fields(name = %name))]
    pub async fn finalize_auction(
        &self,
        name: &str,
        params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        let canonical = name::normalize(name)?;
        let hash = label_hash(&canonical);
        let transaction = self
            .rpc
            .send_transaction(
                self.address,
                ContractCall::new("finalizeAuction", vec![hash.into()]),
                params,
            )
            .await?;
        info!(%hash, %transaction, "auction finalized");
        Ok(transaction)
    }

    /// Transfers a name and its deed to a new owner.
    ///
    /// The current deed owner is fetched and compared to `params.from`
    /// first — a mismatch fails locally with [`RegistrarError::NotOwner`]
    /// rather than paying for a dispatch the contract is certain to
    /// revert. The contract re-enforces ownership regardless.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::InvalidName`] or [`RegistrarError::NotOwner`]
    /// before dispatch; adapter failures after.
    #[instrument(skip(self, params), fields(name = %name, new_owner = %new_owner))]
    pub async fn transfer(
        &self,
        name: &str,
        new_owner: Address,
        params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        let canonical = name::normalize(name)?;
        let hash = label_hash(&canonical);

        let entry = self.fetch_entry(hash, Some(canonical)).await?;
        if entry.deed.is_vacant() || entry.deed.owner != params.from {
            return Err(RegistrarError::NotOwner {
                sender: params.from,
                owner: entry.deed.owner,
            });
        }

        self.rpc
            .send_transaction(
                self.address,
                ContractCall::new("transfer", vec![hash.into(), new_owner.into()]),
                params,
            )
            .await
            .map_err(Into::into)
    }

    /// Invalidates a registered name that is shorter than the minimum
    /// length. Valid-length names fail locally with
    /// [`RegistrarError::CannotInvalidate`].
    ///
    /// # Errors
    ///
    /// [`RegistrarError::InvalidName`] or
    /// [`RegistrarError::CannotInvalidate`] before dispatch; adapter
    /// failures after.
    pub async fn invalidate_name(
        &self,
        name: &str,
        params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        let canonical = name::normalize(name)?;
        let length = canonical.chars().count();
        if length >= self.config.min_length {
            return Err(RegistrarError::CannotInvalidate {
                name: canonical,
                length,
                min: self.config.min_length,
            });
        }
        // The ABI takes the unhashed name so the contract can verify the
        // length claim itself.
        self.rpc
            .send_transaction(
                self.address,
                ContractCall::new("invalidateName", vec![CallValue::Text(canonical)]),
                params,
            )
            .await
            .map_err(Into::into)
    }

    // =========================================================================
    // UNSUPPORTED OPERATIONS
    // =========================================================================

    /// Releasing a deed is not supported by this client.
    ///
    /// # Errors
    ///
    /// Always [`RegistrarError::Unimplemented`] — loudly, so a caller can
    /// never mistake a no-op for success.
    pub async fn release_deed(
        &self,
        _name: &str,
        _params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        Err(RegistrarError::Unimplemented("releaseDeed"))
    }

    /// Migrating a deed to a successor registrar is not supported by this
    /// client.
    ///
    /// # Errors
    ///
    /// Always [`RegistrarError::Unimplemented`].
    pub async fn transfer_registrars(
        &self,
        _name: &str,
        _params: &TxParams,
    ) -> Result<Hash, RegistrarError> {
        Err(RegistrarError::Unimplemented("transferRegistrars"))
    }

    /// Cancelling an unrevealed bid is not supported by this client.
    ///
    /// # Errors
    ///
    /// Always [`RegistrarError::Unimplemented`].
    pub async fn cancel_bid(&self, _bid: &Bid, _params: &TxParams) -> Result<Hash, RegistrarError> {
        Err(RegistrarError::Unimplemented("cancelBid"))
    }
}

// =============================================================================
// TESTS
// =============================================================================
