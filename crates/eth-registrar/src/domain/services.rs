//! # Domain Services
//!
//! Pure derivation functions: hashing, namehash node computation, and the
//! lifecycle-mode classifier. Deterministic, no I/O, no async.
//!
//! The one hash this module deliberately does NOT compute is the sealed-bid
//! commitment: that formula belongs to the contract's trust boundary and is
//! always queried through its read-only `shaBid` method.

use crate::domain::entities::{AuctionStatus, Mode};
use crate::domain::value_objects::Hash;
use sha3::{Digest, Keccak256};

/// Length of the reveal window at the end of an auction, in seconds.
pub const REVEAL_WINDOW_SECS: u64 = 24 * 60 * 60;

// =============================================================================
// HASHING
// =============================================================================

/// Keccak-256 of arbitrary bytes.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    Hash::new(out)
}

/// The contract-facing identifier for a normalized name label.
///
/// One Keccak-256 pass over the UTF-8 bytes, raw 32-byte output, no marker
/// prefix. Callers must normalize first: the hash of an un-normalized name
/// is never meaningful.
#[must_use]
pub fn label_hash(canonical: &str) -> Hash {
    keccak256(canonical.as_bytes())
}

/// Recursive namehash node derivation for a dotted domain.
///
/// `node("") = 0x00..00`, `node(l.rest) = keccak256(node(rest) ++ keccak256(l))`.
/// Used to derive the registrar's root node from its TLD.
#[must_use]
pub fn namehash(domain: &str) -> Hash {
    let mut node = [0u8; 32];
    if domain.is_empty() {
        return Hash::new(node);
    }
    for label in domain.rsplit('.') {
        let mut packed = [0u8; 64];
        packed[..32].copy_from_slice(&node);
        packed[32..].copy_from_slice(label_hash(label).as_bytes());
        node = keccak256(&packed).0;
    }
    Hash::new(node)
}

// =============================================================================
// MODE CLASSIFICATION
// =============================================================================

/// Classifies an entry's lifecycle mode.
///
/// A deterministic function of name length, status, registration date and
/// current chain time. The time-window boundaries live here and nowhere
/// else, so callers never re-derive the arithmetic.
///
/// `label_len` is `None` when the entry was queried by a pre-computed hash;
/// the label length is unknowable then and the short-name branch is skipped.
#[must_use]
pub fn classify_mode(
    label_len: Option<usize>,
    min_length: usize,
    status: AuctionStatus,
    registration_date: u64,
    now: u64,
    deed_vacant: bool,
) -> Mode {
    // A name too short to ever be legitimately owned. A deed can still
    // exist if it was registered before the minimum-length rule applied.
    if let Some(len) = label_len {
        if len < min_length {
            return if deed_vacant {
                Mode::Forbidden
            } else {
                Mode::ForbiddenCanInvalidate
            };
        }
    }

    match status {
        AuctionStatus::Open => Mode::Open,
        AuctionStatus::Auction => {
            if registration_date > now && registration_date - now > REVEAL_WINDOW_SECS {
                Mode::Auction
            } else if now < registration_date {
                Mode::Reveal
            } else if now - registration_date < REVEAL_WINDOW_SECS {
                Mode::Finalize
            } else {
                Mode::FinalizeOpen
            }
        }
        AuctionStatus::Owned => Mode::Owned,
        AuctionStatus::Forbidden => Mode::Forbidden,
        AuctionStatus::Reveal => Mode::Reveal,
        AuctionStatus::NotYetAvailable => Mode::NotYetAvailable,
        AuctionStatus::Unrecognized(raw) => Mode::Unrecognized(raw),
    }
}

// =============================================================================
// TESTS
// =============================================================================
