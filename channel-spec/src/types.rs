//! # Wire Enumerations
//!
//! Every enumeration is a single byte on the wire. Values this version does not
//! know decode to `Unrecognized(n)` so newer writers stay readable; only the
//! envelope discriminant rejects unknown values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an execution input is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    Unknown,
    PublicData,
    PublicAccountData,
    PublicUrl,
    Private,
    /// Payload is a one-byte index into the instruction's account list
    InputSet,
    PublicProof,
    PrivateUrl,
    Unrecognized(u8),
}

impl InputType {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => InputType::Unknown,
            1 => InputType::PublicData,
            3 => InputType::PublicAccountData,
            4 => InputType::PublicUrl,
            5 => InputType::Private,
            6 => InputType::InputSet,
            7 => InputType::PublicProof,
            8 => InputType::PrivateUrl,
            other => InputType::Unrecognized(other),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            InputType::Unknown => 0,
            InputType::PublicData => 1,
            InputType::PublicAccountData => 3,
            InputType::PublicUrl => 4,
            InputType::Private => 5,
            InputType::InputSet => 6,
            InputType::PublicProof => 7,
            InputType::PrivateUrl => 8,
            InputType::Unrecognized(other) => other,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            InputType::Unknown => "Unknown",
            InputType::PublicData => "PublicData",
            InputType::PublicAccountData => "PublicAccountData",
            InputType::PublicUrl => "PublicUrl",
            InputType::Private => "Private",
            InputType::InputSet => "InputSet",
            InputType::PublicProof => "PublicProof",
            InputType::PrivateUrl => "PrivateUrl",
            InputType::Unrecognized(_) => "Unrecognized",
        }
    }

    /// Parse the names used in manifests and on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "Unknown" => InputType::Unknown,
            "PublicData" => InputType::PublicData,
            "PublicAccountData" => InputType::PublicAccountData,
            "PublicUrl" => InputType::PublicUrl,
            "Private" => InputType::Private,
            "InputSet" => InputType::InputSet,
            "PublicProof" => InputType::PublicProof,
            "PrivateUrl" => InputType::PrivateUrl,
            _ => return None,
        };
        Some(ty)
    }
}

impl Default for InputType {
    fn default() -> Self {
        InputType::Unknown
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Unrecognized(n) => write!(f, "Unrecognized({n})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Input kinds a deployed program declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramInputType {
    Public,
    Private,
    Unrecognized(u8),
}

impl ProgramInputType {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => ProgramInputType::Public,
            2 => ProgramInputType::Private,
            other => ProgramInputType::Unrecognized(other),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            ProgramInputType::Public => 1,
            ProgramInputType::Private => 2,
            ProgramInputType::Unrecognized(other) => other,
        }
    }
}

impl fmt::Display for ProgramInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramInputType::Public => f.write_str("Public"),
            ProgramInputType::Private => f.write_str("Private"),
            ProgramInputType::Unrecognized(n) => write!(f, "Unrecognized({n})"),
        }
    }
}

/// Outcome reported by a prover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Unknown,
    Completed,
    Failed,
    Unrecognized(u8),
}

impl StatusType {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => StatusType::Unknown,
            1 => StatusType::Completed,
            2 => StatusType::Failed,
            other => StatusType::Unrecognized(other),
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            StatusType::Unknown => 0,
            StatusType::Completed => 1,
            StatusType::Failed => 2,
            StatusType::Unrecognized(other) => other,
        }
    }
}

impl Default for StatusType {
    fn default() -> Self {
        StatusType::Unknown
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusType::Unknown => f.write_str("Unknown"),
            StatusType::Completed => f.write_str("Completed"),
            StatusType::Failed => f.write_str("Failed"),
            StatusType::Unrecognized(n) => write!(f, "Unrecognized({n})"),
        }
    }
}

/// Exit code a prover attaches to a status report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitCode {
    Success,
    VerifyError,
    ProvingError,
    InputError,
    Expired,
    Unrecognized(u32),
}

impl ExitCode {
    pub const fn from_u32(value: u32) -> Self {
        match value {
            0 => ExitCode::Success,
            1 => ExitCode::VerifyError,
            2 => ExitCode::ProvingError,
            3 => ExitCode::InputError,
            4 => ExitCode::Expired,
            other => ExitCode::Unrecognized(other),
        }
    }

    pub const fn to_u32(self) -> u32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::VerifyError => 1,
            ExitCode::ProvingError => 2,
            ExitCode::InputError => 3,
            ExitCode::Expired => 4,
            ExitCode::Unrecognized(other) => other,
        }
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        ExitCode::Success
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => f.write_str("Success"),
            ExitCode::VerifyError => f.write_str("VerifyError"),
            ExitCode::ProvingError => f.write_str("ProvingError"),
            ExitCode::InputError => f.write_str("InputError"),
            ExitCode::Expired => f.write_str("Expired"),
            ExitCode::Unrecognized(n) => write!(f, "Unrecognized({n})"),
        }
    }
}

/// Envelope discriminant
///
/// Closed set: an unknown value cannot be decoded because there is no payload
/// slot to read for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IxType {
    ExecuteV1,
    StatusV1,
    DeployV1,
    ClaimV1,
}

impl IxType {
    pub const ALL: [IxType; 4] = [
        IxType::ExecuteV1,
        IxType::StatusV1,
        IxType::DeployV1,
        IxType::ClaimV1,
    ];

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(IxType::ExecuteV1),
            1 => Some(IxType::StatusV1),
            2 => Some(IxType::DeployV1),
            3 => Some(IxType::ClaimV1),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            IxType::ExecuteV1 => 0,
            IxType::StatusV1 => 1,
            IxType::DeployV1 => 2,
            IxType::ClaimV1 => 3,
        }
    }

    /// Envelope slot carrying this discriminant's payload
    pub const fn payload_slot(self) -> usize {
        self.to_u8() as usize + 1
    }

    pub const fn name(self) -> &'static str {
        match self {
            IxType::ExecuteV1 => "execute_v1",
            IxType::StatusV1 => "status_v1",
            IxType::DeployV1 => "deploy_v1",
            IxType::ClaimV1 => "claim_v1",
        }
    }
}

impl fmt::Display for IxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IxType::ExecuteV1 => "ExecuteV1",
            IxType::StatusV1 => "StatusV1",
            IxType::DeployV1 => "DeployV1",
            IxType::ClaimV1 => "ClaimV1",
        };
        f.write_str(name)
    }
}
