//! # Prover Channel Wire Format
//!
//! Binary protocol shared by off-chain callers and the on-chain prover
//! channel program.
//!
//! ## Key Features
//! - Table codec over the `flatbuffers` runtime (slot-indexed fields, per-slot defaults)
//! - Record shapes for execution requests, deployments, claims and status reports
//! - Envelope selecting exactly one record by discriminant
//! - Deterministic derivation of program-owned account addresses
//! - Decoding of persisted account records

pub mod address;
pub mod claim;
pub mod config;
pub mod deploy;
pub mod derive;
pub mod envelope;
pub mod error;
pub mod execution;
pub mod input;
pub mod serde_hex;
pub mod status;
pub mod table;
pub mod types;

pub use address::{AccountReference, AccountRole, Address};
pub use claim::{Claim, ClaimState};
pub use config::{CodecConfig, ConfigError};
pub use deploy::Deployment;
pub use derive::{AddressDeriver, AddressKind, CurveCheck, DerivedAddress, Ed25519Curve};
pub use envelope::{ChannelInstruction, Envelope};
pub use error::{BuildError, ChannelError, DecodeError, DerivationError};
pub use execution::{AccountRecord, ExecutionRequest};
pub use input::Input;
pub use status::StatusReport;
pub use table::{Scalar, TableBuilder, TableReader, WireStruct};
pub use types::{ExitCode, InputType, IxType, ProgramInputType, StatusType};

/// Length of an account address in bytes
pub const ADDRESS_LEN: usize = 32;

/// Program identity under which every derived address and default account
/// reference lives: `BoNsHRcyLLNdtnoDf8hiCNZpyehMC4FDMxs6NTxFi3ew`
pub const BASE_IDENTITY: Address = Address([
    0xa0, 0x76, 0x4f, 0xbf, 0xe3, 0x87, 0x36, 0xdf, 0x83, 0x4c, 0xe6, 0x39, 0x9e, 0xf5, 0x8a,
    0xde, 0x06, 0xb6, 0x1d, 0x9e, 0x54, 0x87, 0x4f, 0x1d, 0x63, 0x5e, 0xe7, 0xdb, 0xbe, 0x44,
    0x23, 0x88,
]);

/// System (default) account: `11111111111111111111111111111111`
pub const SYSTEM_ACCOUNT: Address = Address([0u8; ADDRESS_LEN]);

/// Number of fixed account slots ahead of the InputSet accounts in an
/// execute instruction. The first InputSet account sits at this index.
pub const INPUT_SET_ACCOUNT_BASE: usize = 6;

/// Size of a callback extra-account record on the wire
pub const ACCOUNT_RECORD_SIZE: usize = 40;

/// Alignment of a callback extra-account record inside a vector
pub const ACCOUNT_RECORD_ALIGN: usize = 8;

/// Size of a persisted claim state record
pub const CLAIM_STATE_SIZE: usize = 48;

/// Suffix appended to every derivation preimage
pub const DERIVATION_DOMAIN: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed component
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seed components, bump included
pub const MAX_SEEDS: usize = 16;

/// Expected size of a status proof
pub const PROOF_LEN: usize = 256;

/// Expected size of the digests carried by a status report
pub const DIGEST_LEN: usize = 32;
