//! # State Decoder
//!
//! Decodes the records the program persists in its accounts, and the
//! instruction data callers send it. Pure functions over byte slices; the
//! bytes come from whatever fetched the account.

use crate::error::{DisassemblerError, Result};
use channel_spec::{
    ChannelInstruction, ClaimState, CodecConfig, Deployment, ExecutionRequest,
};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Account record shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    /// Execution request account: an `ExecutionRequestV1` table
    ExecutionRequest,
    /// Deployment account: a `DeployV1` table
    Deployment,
    /// Execution claim account: fixed 48-byte claim state
    Claim,
}

impl AccountKind {
    pub const ALL: [AccountKind; 3] = [
        AccountKind::ExecutionRequest,
        AccountKind::Deployment,
        AccountKind::Claim,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            AccountKind::ExecutionRequest => "execution-request",
            AccountKind::Deployment => "deployment",
            AccountKind::Claim => "claim",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccountKind {
    type Err = DisassemblerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "execution-request" | "execution" => Ok(AccountKind::ExecutionRequest),
            "deployment" => Ok(AccountKind::Deployment),
            "claim" | "execution-claim" => Ok(AccountKind::Claim),
            other => Err(DisassemblerError::UnknownAccountKind(other.to_string())),
        }
    }
}

/// Decoded account contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "camelCase")]
pub enum AccountState {
    ExecutionRequest(ExecutionRequest),
    Deployment(Deployment),
    Claim(ClaimState),
}

impl AccountState {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountState::ExecutionRequest(_) => AccountKind::ExecutionRequest,
            AccountState::Deployment(_) => AccountKind::Deployment,
            AccountState::Claim(_) => AccountKind::Claim,
        }
    }
}

/// Decode account bytes with default limits
pub fn decode(kind: AccountKind, bytes: &[u8]) -> Result<AccountState> {
    decode_with_config(kind, bytes, CodecConfig::DEFAULT)
}

pub fn decode_with_config(kind: AccountKind, bytes: &[u8], config: CodecConfig) -> Result<AccountState> {
    let state = match kind {
        AccountKind::ExecutionRequest => {
            ExecutionRequest::from_bytes_with_config(bytes, config).map(AccountState::ExecutionRequest)
        }
        AccountKind::Deployment => {
            Deployment::from_bytes_with_config(bytes, config).map(AccountState::Deployment)
        }
        AccountKind::Claim => ClaimState::from_bytes(bytes).map(AccountState::Claim),
    };
    state.map_err(|e| {
        tracing::debug!(%kind, len = bytes.len(), error = %e, "account decode failed");
        e.into()
    })
}

/// Decode instruction data into the typed instruction
pub fn decode_instruction(data: &[u8]) -> Result<ChannelInstruction> {
    decode_instruction_with_config(data, CodecConfig::DEFAULT)
}

pub fn decode_instruction_with_config(data: &[u8], config: CodecConfig) -> Result<ChannelInstruction> {
    ChannelInstruction::from_bytes_with_config(data, config).map_err(|e| {
        tracing::debug!(len = data.len(), error = %e, "instruction decode failed");
        e.into()
    })
}
