//! # Instruction Envelope
//!
//! The instruction data handed to the program is a `ChannelInstruction` table:
//! a discriminant in slot 0 and the serialized record in the one byte-vector
//! slot that discriminant selects. Sibling slots stay absent.
//!
//! [`ChannelInstruction`] is the typed view: one variant per discriminant, so
//! a payload can never be read under the wrong record shape.

use crate::claim::Claim;
use crate::config::CodecConfig;
use crate::deploy::Deployment;
use crate::error::{BuildError, DecodeError};
use crate::execution::ExecutionRequest;
use crate::status::StatusReport;
use crate::table::{TableBuilder, TableReader};
use crate::types::IxType;
use serde::Serialize;

const SLOT_IX_TYPE: usize = 0;
const FIELD_COUNT: usize = 5;

/// Discriminant plus raw record bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub ix_type: IxType,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(ix_type: IxType, payload: Vec<u8>) -> Self {
        Self { ix_type, payload }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        wrap(self.ix_type, &self.payload)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_bytes_with_config(bytes, CodecConfig::DEFAULT)
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: CodecConfig) -> Result<Self, DecodeError> {
        let table = TableReader::root_with_config(bytes, config)?;
        let raw = table.scalar(SLOT_IX_TYPE, 0u8)?;
        let ix_type = IxType::from_u8(raw).ok_or(DecodeError::UnknownDiscriminant(raw))?;
        let payload = table
            .vector(ix_type.payload_slot())?
            .ok_or(DecodeError::MissingField(ix_type.name()))?;
        Ok(Self {
            ix_type,
            payload: payload.to_vec(),
        })
    }
}

/// Install `payload` in the slot selected by `ix_type`
pub fn wrap(ix_type: IxType, payload: &[u8]) -> Result<Vec<u8>, BuildError> {
    let mut table = TableBuilder::new(FIELD_COUNT);
    table
        .push_scalar(SLOT_IX_TYPE, ix_type.to_u8(), 0)
        .push_vector(ix_type.payload_slot(), payload)?;
    table.finish()
}

/// Read the discriminant, then only the slot it selects
pub fn unwrap(bytes: &[u8]) -> Result<(IxType, Vec<u8>), DecodeError> {
    let envelope = Envelope::from_bytes(bytes)?;
    Ok((envelope.ix_type, envelope.payload))
}

// ============================================================================
// Typed instruction
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "record", rename_all = "camelCase")]
pub enum ChannelInstruction {
    Execute(ExecutionRequest),
    Status(StatusReport),
    Deploy(Deployment),
    Claim(Claim),
}

impl ChannelInstruction {
    pub fn ix_type(&self) -> IxType {
        match self {
            ChannelInstruction::Execute(_) => IxType::ExecuteV1,
            ChannelInstruction::Status(_) => IxType::StatusV1,
            ChannelInstruction::Deploy(_) => IxType::DeployV1,
            ChannelInstruction::Claim(_) => IxType::ClaimV1,
        }
    }

    /// Serialize the record and wrap it
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let payload = match self {
            ChannelInstruction::Execute(request) => request.to_bytes()?,
            ChannelInstruction::Status(report) => report.to_bytes()?,
            ChannelInstruction::Deploy(deployment) => deployment.to_bytes()?,
            ChannelInstruction::Claim(claim) => claim.to_bytes()?,
        };
        wrap(self.ix_type(), &payload)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_bytes_with_config(bytes, CodecConfig::DEFAULT)
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: CodecConfig) -> Result<Self, DecodeError> {
        let envelope = Envelope::from_bytes_with_config(bytes, config)?;
        let payload = &envelope.payload;
        let instruction = match envelope.ix_type {
            IxType::ExecuteV1 => {
                ChannelInstruction::Execute(ExecutionRequest::from_bytes_with_config(payload, config)?)
            }
            IxType::StatusV1 => {
                ChannelInstruction::Status(StatusReport::from_bytes_with_config(payload, config)?)
            }
            IxType::DeployV1 => {
                ChannelInstruction::Deploy(Deployment::from_bytes_with_config(payload, config)?)
            }
            IxType::ClaimV1 => ChannelInstruction::Claim(Claim::from_bytes_with_config(payload, config)?),
        };
        Ok(instruction)
    }
}

impl From<ExecutionRequest> for ChannelInstruction {
    fn from(request: ExecutionRequest) -> Self {
        ChannelInstruction::Execute(request)
    }
}

impl From<StatusReport> for ChannelInstruction {
    fn from(report: StatusReport) -> Self {
        ChannelInstruction::Status(report)
    }
}

impl From<Deployment> for ChannelInstruction {
    fn from(deployment: Deployment) -> Self {
        ChannelInstruction::Deploy(deployment)
    }
}

impl From<Claim> for ChannelInstruction {
    fn from(claim: Claim) -> Self {
        ChannelInstruction::Claim(claim)
    }
}
