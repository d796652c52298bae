//! # Core Domain Entities
//!
//! View-model types for registrar state: auction entries, deeds, sealed
//! bids, and the derived lifecycle mode. Entries and deeds are read-only
//! projections of on-chain state, recomputed fresh on every query — auction
//! state can change each block, so none of these are ever cached.

use crate::domain::services::classify_mode;
use crate::domain::value_objects::{Address, Hash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CONTRACT VERSION
// =============================================================================

/// Which deployed generation of the registrar contract this client targets.
///
/// The generations expose incompatible shapes for `unsealBid` and
/// `sealedBids`, and enumerate `status` differently. One registrar instance
/// targets exactly one generation; responses that do not fit it surface as
/// errors rather than being silently coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractVersion {
    /// The first deployed interface: three status values,
    /// `unsealBid(hash, owner, value, salt)`, `sealedBids(seal)`.
    Legacy,
    /// The hardened redeployment: six status values,
    /// `unsealBid(hash, value, salt)`, `sealedBids(owner, seal)`.
    Hardened,
}

// =============================================================================
// AUCTION STATUS
// =============================================================================

/// On-chain auction state for a hash, as returned by `entries`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    /// No auction has been started.
    Open,
    /// An auction is running.
    Auction,
    /// The auction finished and the name is owned.
    Owned,
    /// The name is disallowed (e.g. invalidated as too short).
    Forbidden,
    /// The auction is in its reveal period.
    Reveal,
    /// The name has not yet been released for auction.
    NotYetAvailable,
    /// A status value outside the targeted contract generation's
    /// enumeration. Kept explicit so contract evolution is detectable.
    Unrecognized(u8),
}

impl AuctionStatus {
    /// Decodes a raw status value according to the targeted contract
    /// generation. Out-of-range values decode to
    /// [`AuctionStatus::Unrecognized`], never to a silent default.
    #[must_use]
    pub fn from_raw(version: ContractVersion, raw: u8) -> Self {
        match (version, raw) {
            (_, 0) => Self::Open,
            (_, 1) => Self::Auction,
            (_, 2) => Self::Owned,
            (ContractVersion::Hardened, 3) => Self::Forbidden,
            (ContractVersion::Hardened, 4) => Self::Reveal,
            (ContractVersion::Hardened, 5) => Self::NotYetAvailable,
            (_, other) => Self::Unrecognized(other),
        }
    }

    /// The raw on-chain encoding of this status.
    #[must_use]
    pub fn as_raw(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Auction => 1,
            Self::Owned => 2,
            Self::Forbidden => 3,
            Self::Reveal => 4,
            Self::NotYetAvailable => 5,
            Self::Unrecognized(raw) => *raw,
        }
    }
}

// =============================================================================
// MODE
// =============================================================================

/// Derived lifecycle classification for an entry.
///
/// Not stored by the contract — a client-side convenience computed from the
/// name length, status, registration date and current chain time. Transitions
/// are time-driven, so the mode is recomputed on every read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The name has not yet been released for auction.
    NotYetAvailable,
    /// No auction yet; one can be opened.
    Open,
    /// Auction running, bids accepted (more than the reveal window remains).
    Auction,
    /// Reveal period: bids must be unsealed now.
    Reveal,
    /// Registration date passed recently; the auction can be finalized.
    Finalize,
    /// The finalization window elapsed; a new auction could be opened.
    FinalizeOpen,
    /// The name is owned.
    Owned,
    /// The name is too short to ever be owned, and no deed exists.
    Forbidden,
    /// The name is too short but a deed exists — it was registered before
    /// the minimum-length rule applied and can be invalidated.
    ForbiddenCanInvalidate,
    /// The entry carried a status outside the targeted generation's
    /// enumeration.
    Unrecognized(u8),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYetAvailable => write!(f, "not-yet-available"),
            Self::Open => write!(f, "open"),
            Self::Auction => write!(f, "auction"),
            Self::Reveal => write!(f, "reveal"),
            Self::Finalize => write!(f, "finalize"),
            Self::FinalizeOpen => write!(f, "finalize-open"),
            Self::Owned => write!(f, "owned"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::ForbiddenCanInvalidate => write!(f, "forbidden-can-invalidate"),
            Self::Unrecognized(raw) => write!(f, "unrecognized({raw})"),
        }
    }
}

// =============================================================================
// DEED
// =============================================================================

/// Read-only projection of an on-chain escrow record.
///
/// Present only when the entry's status indicates an active or finalized
/// escrow; otherwise the zero-address sentinel [`Deed::vacant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    /// Address of the deed contract.
    pub address: Address,
    /// Ether balance held in escrow, in wei.
    pub balance: U256,
    /// Unix timestamp the deed was created.
    pub creation_date: u64,
    /// Account the deed belongs to.
    pub owner: Address,
}

impl Deed {
    /// The "no deed" sentinel: zero address, all other fields zero.
    #[must_use]
    pub fn vacant() -> Self {
        Self {
            address: Address::ZERO,
            balance: U256::zero(),
            creation_date: 0,
            owner: Address::ZERO,
        }
    }

    /// Returns true if this is the no-deed sentinel.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.address.is_zero()
    }
}

// =============================================================================
// ENTRY
// =============================================================================

/// Read-only projection of on-chain auction state for one hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The normalized name, when the entry was queried by name. Queries by
    /// pre-computed hash cannot recover the label, so this stays `None`.
    pub name: Option<String>,
    /// The contract-facing identifier.
    pub hash: Hash,
    /// On-chain auction status.
    pub status: AuctionStatus,
    /// Escrow record, or [`Deed::vacant`] when none exists.
    pub deed: Deed,
    /// Unix timestamp the auction closes (or closed).
    pub registration_date: u64,
    /// Winning bid value actually locked in the deed, in wei.
    pub value: U256,
    /// Highest bid revealed so far, in wei.
    pub highest_bid: U256,
    /// Derived lifecycle classification.
    pub mode: Mode,
}

impl Entry {
    /// Builds an entry from the raw contract tuple, classifying its mode
    /// from the name length, status, registration date and chain time.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        name: Option<String>,
        hash: Hash,
        status: AuctionStatus,
        deed: Deed,
        registration_date: u64,
        value: U256,
        highest_bid: U256,
        min_length: usize,
        now: u64,
    ) -> Self {
        let label_len = name.as_deref().map(|n| n.chars().count());
        let mode = classify_mode(
            label_len,
            min_length,
            status,
            registration_date,
            now,
            deed.is_vacant(),
        );
        Self {
            name,
            hash,
            status,
            deed,
            registration_date,
            value,
            highest_bid,
            mode,
        }
    }
}

// =============================================================================
// BID
// =============================================================================

/// An immutable sealed-bid record.
///
/// Owned exclusively by the caller that created it. The contract never
/// returns these values, so the caller must retain the record across the
/// commit/reveal boundary — a lost secret is unrecoverable.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// The normalized name the bid targets.
    pub name: String,
    /// Label hash of the normalized name.
    pub hash: Hash,
    /// Account the name will belong to if the bid wins.
    pub owner: Address,
    /// True bid value in wei, hidden until reveal.
    pub value: U256,
    /// The caller-supplied secret, verbatim.
    pub secret: String,
    /// Keccak-256 of the secret, as sent to the contract.
    pub hex_secret: Hash,
    /// The sealed-bid commitment, obtained from the contract's `shaBid`.
    pub sealed: Hash,
}

// The secret stays out of logs; everything else prints normally.
impl fmt::Debug for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bid")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .field("owner", &self.owner)
            .field("value", &self.value)
            .field("secret", &"<redacted>")
            .field("hex_secret", &self.hex_secret)
            .field("sealed", &self.sealed)
            .finish()
    }
}

// =============================================================================
// AUCTION OPENING
// =============================================================================

/// Result of opening an auction with decoys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionOpening {
    /// Transaction id of the dispatched `startAuctions` call.
    pub transaction: Hash,
    /// Every hash the call opened, decoys included, in dispatch order.
    /// The real hash sits at a random position among them.
    pub hashes: Vec<Hash>,
}

// =============================================================================
// TESTS
// =============================================================================
