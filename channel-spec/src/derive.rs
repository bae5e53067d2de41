//! # Address Derivation
//!
//! Program-owned account addresses are derived from a seed tuple and the base
//! identity:
//!
//! ```text
//! candidate = SHA-256(seed_0 || ... || seed_n || [bump] || base || "ProgramDerivedAddress")
//! ```
//!
//! A candidate that is a valid Ed25519 point is rejected (it could have a
//! private key). The bump search walks from 255 down to 1 and keeps the first
//! candidate off the curve.
//!
//! | kind            | seeds                                           |
//! |-----------------|-------------------------------------------------|
//! | execution       | "execution", requester, execution id            |
//! | deployment      | "deployment", keccak256(image id)               |
//! | execution-claim | "execution-claim", requester, execution id, claimer |

use crate::address::Address;
use crate::error::DerivationError;
use crate::{BASE_IDENTITY, DERIVATION_DOMAIN, MAX_SEEDS, MAX_SEED_LEN};
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Curve Check
// ============================================================================

/// Decides whether a candidate address is a curve point
///
/// The rule belongs to the chain; [`Ed25519Curve`] is the production check.
pub trait CurveCheck {
    fn is_on_curve(&self, candidate: &[u8; 32]) -> bool;
}

/// Compressed Ed25519 point decompression
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Curve;

impl CurveCheck for Ed25519Curve {
    fn is_on_curve(&self, candidate: &[u8; 32]) -> bool {
        ed25519_dalek::VerifyingKey::from_bytes(candidate).is_ok()
    }
}

// ============================================================================
// Address Kinds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    Execution,
    Deployment,
    ExecutionClaim,
}

impl AddressKind {
    pub const ALL: [AddressKind; 3] = [
        AddressKind::Execution,
        AddressKind::Deployment,
        AddressKind::ExecutionClaim,
    ];

    /// Leading seed identifying the kind
    pub const fn prefix(self) -> &'static [u8] {
        match self {
            AddressKind::Execution => b"execution",
            AddressKind::Deployment => b"deployment",
            AddressKind::ExecutionClaim => b"execution-claim",
        }
    }

    /// Caller-supplied seed parts following the prefix
    pub const fn part_count(self) -> usize {
        match self {
            AddressKind::Execution => 2,
            AddressKind::Deployment => 1,
            AddressKind::ExecutionClaim => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AddressKind::Execution => "execution",
            AddressKind::Deployment => "deployment",
            AddressKind::ExecutionClaim => "execution-claim",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AddressKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "execution" => Ok(AddressKind::Execution),
            "deployment" => Ok(AddressKind::Deployment),
            "execution-claim" | "claim" => Ok(AddressKind::ExecutionClaim),
            other => Err(format!("unknown address kind: {other}")),
        }
    }
}

/// Address plus the bump seed that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Address,
    pub bump: u8,
}

/// Keccak-256 of an image id, used as the deployment seed
pub fn image_id_hash(image_id: &str) -> [u8; 32] {
    Keccak256::digest(image_id.as_bytes()).into()
}

// ============================================================================
// Deriver
// ============================================================================

/// Derives program-owned addresses under one base identity
#[derive(Debug, Clone)]
pub struct AddressDeriver<C = Ed25519Curve> {
    base: Address,
    curve: C,
}

impl AddressDeriver<Ed25519Curve> {
    pub fn new() -> Self {
        Self::with_base(BASE_IDENTITY)
    }

    pub fn with_base(base: Address) -> Self {
        Self {
            base,
            curve: Ed25519Curve,
        }
    }
}

impl Default for AddressDeriver<Ed25519Curve> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CurveCheck> AddressDeriver<C> {
    pub fn with_curve(base: Address, curve: C) -> Self {
        Self { base, curve }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    /// Hash a complete seed tuple (bump included) into an address
    pub fn create_address(&self, seeds: &[&[u8]]) -> Result<Address, DerivationError> {
        if seeds.len() > MAX_SEEDS {
            return Err(DerivationError::TooManySeeds {
                count: seeds.len(),
                limit: MAX_SEEDS,
            });
        }
        let mut hasher = Sha256::new();
        for (index, seed) in seeds.iter().enumerate() {
            if seed.len() > MAX_SEED_LEN {
                return Err(DerivationError::SeedTooLong {
                    index,
                    len: seed.len(),
                    limit: MAX_SEED_LEN,
                });
            }
            hasher.update(seed);
        }
        hasher.update(self.base.as_bytes());
        hasher.update(DERIVATION_DOMAIN);

        let candidate: [u8; 32] = hasher.finalize().into();
        if self.curve.is_on_curve(&candidate) {
            return Err(DerivationError::OnCurve);
        }
        Ok(Address(candidate))
    }

    /// Search bumps from 255 down to 1 for an off-curve address
    pub fn find_address(&self, seeds: &[&[u8]]) -> Result<DerivedAddress, DerivationError> {
        if seeds.len() + 1 > MAX_SEEDS {
            return Err(DerivationError::TooManySeeds {
                count: seeds.len() + 1,
                limit: MAX_SEEDS,
            });
        }

        for bump in (1..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
            with_bump.extend_from_slice(seeds);
            with_bump.push(&bump_seed);
            match self.create_address(&with_bump) {
                Ok(address) => return Ok(DerivedAddress { address, bump }),
                Err(DerivationError::OnCurve) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(DerivationError::NoViableBump)
    }

    /// Derive an address of `kind` from its caller-supplied parts
    ///
    /// Deployment takes the raw image id and hashes it; the other kinds use
    /// their parts verbatim.
    pub fn derive(&self, kind: AddressKind, parts: &[&[u8]]) -> Result<DerivedAddress, DerivationError> {
        if parts.len() != kind.part_count() {
            return Err(DerivationError::SeedCountMismatch {
                kind: kind.name(),
                expected: kind.part_count(),
                found: parts.len(),
            });
        }

        let image_hash;
        let mut seeds: Vec<&[u8]> = Vec::with_capacity(parts.len() + 1);
        seeds.push(kind.prefix());
        match kind {
            AddressKind::Deployment => {
                image_hash = Keccak256::digest(parts[0]);
                seeds.push(image_hash.as_slice());
            }
            AddressKind::Execution | AddressKind::ExecutionClaim => seeds.extend_from_slice(parts),
        }

        let derived = self.find_address(&seeds)?;
        tracing::debug!(
            kind = kind.name(),
            address = %derived.address,
            bump = derived.bump,
            "derived address"
        );
        Ok(derived)
    }

    pub fn execution_address(
        &self,
        requester: &Address,
        execution_id: &str,
    ) -> Result<DerivedAddress, DerivationError> {
        self.derive(
            AddressKind::Execution,
            &[requester.as_bytes(), execution_id.as_bytes()],
        )
    }

    pub fn deployment_address(&self, image_id: &str) -> Result<DerivedAddress, DerivationError> {
        self.derive(AddressKind::Deployment, &[image_id.as_bytes()])
    }

    pub fn execution_claim_address(
        &self,
        requester: &Address,
        execution_id: &str,
        claimer: &Address,
    ) -> Result<DerivedAddress, DerivationError> {
        self.derive(
            AddressKind::ExecutionClaim,
            &[requester.as_bytes(), execution_id.as_bytes(), claimer.as_bytes()],
        )
    }
}
