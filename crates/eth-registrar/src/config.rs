//! # Registrar Configuration
//!
//! Configuration fixed at construction. There is no global mutable state:
//! process-wide defaults exist only as named constants here.

use crate::domain::entities::ContractVersion;
use serde::{Deserialize, Serialize};

/// Default top-level domain governed by the public registrar.
pub const DEFAULT_TLD: &str = "eth";

/// Default minimum name length enforced by the public registrar.
pub const DEFAULT_MIN_LENGTH: usize = 7;

/// Default number of decoy hashes opened alongside the real one.
pub const DEFAULT_DECOY_COUNT: usize = 10;

/// Registrar client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Top-level domain the registrar governs.
    pub tld: String,

    /// Minimum name length the registrar accepts. Shorter names can never
    /// be legitimately owned.
    pub min_length: usize,

    /// How many decoy hashes to open alongside the real one when no
    /// explicit decoy set is supplied.
    pub decoy_count: usize,

    /// The deployed contract generation this instance targets.
    pub version: ContractVersion,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            tld: DEFAULT_TLD.to_string(),
            min_length: DEFAULT_MIN_LENGTH,
            decoy_count: DEFAULT_DECOY_COUNT,
            version: ContractVersion::Hardened,
        }
    }
}

impl RegistrarConfig {
    /// Create a config for testing (fewer decoys, same public rules).
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            decoy_count: 2,
            ..Self::default()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
