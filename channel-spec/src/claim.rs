//! Claim record and persisted claim state

use crate::address::Address;
use crate::config::CodecConfig;
use crate::error::{BuildError, DecodeError};
use crate::table::{TableBuilder, TableReader};
use crate::{ADDRESS_LEN, CLAIM_STATE_SIZE};
use serde::{Deserialize, Serialize};

const SLOT_EXECUTION_ID: usize = 0;
const SLOT_BLOCK_COMMITMENT: usize = 1;
const FIELD_COUNT: usize = 2;

/// `ClaimV1` table: a prover reserves an execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub execution_id: String,
    pub block_commitment: u64,
}

impl Claim {
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        self.to_table()?.finish()
    }

    pub(crate) fn to_table(&self) -> Result<TableBuilder, BuildError> {
        if self.execution_id.is_empty() {
            return Err(BuildError::EmptyField("execution_id"));
        }
        let mut table = TableBuilder::new(FIELD_COUNT);
        table
            .push_string(SLOT_EXECUTION_ID, &self.execution_id)?
            .push_scalar(SLOT_BLOCK_COMMITMENT, self.block_commitment, 0);
        Ok(table)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_bytes_with_config(bytes, CodecConfig::DEFAULT)
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: CodecConfig) -> Result<Self, DecodeError> {
        let table = TableReader::root_with_config(bytes, config)?;
        Self::from_table(&table)
    }

    pub(crate) fn from_table(table: &TableReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            execution_id: table
                .required_string(SLOT_EXECUTION_ID, "execution_id")?
                .to_owned(),
            block_commitment: table.scalar(SLOT_BLOCK_COMMITMENT, 0u64)?,
        })
    }
}

/// Claim state persisted in the execution-claim account
///
/// Fixed layout, no table:
/// ```text
/// [claimer: 32][claimed_at: u64 LE][block_commitment: u64 LE]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimState {
    pub claimer: Address,
    pub claimed_at: u64,
    pub block_commitment: u64,
}

impl ClaimState {
    pub fn to_bytes(&self) -> [u8; CLAIM_STATE_SIZE] {
        let mut bytes = [0u8; CLAIM_STATE_SIZE];
        bytes[..ADDRESS_LEN].copy_from_slice(self.claimer.as_bytes());
        bytes[ADDRESS_LEN..ADDRESS_LEN + 8].copy_from_slice(&self.claimed_at.to_le_bytes());
        bytes[ADDRESS_LEN + 8..].copy_from_slice(&self.block_commitment.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != CLAIM_STATE_SIZE {
            return Err(DecodeError::InvalidRecordSize {
                expected: CLAIM_STATE_SIZE,
                found: bytes.len(),
            });
        }

        let mut claimer = [0u8; ADDRESS_LEN];
        let mut claimed_at = [0u8; 8];
        let mut block_commitment = [0u8; 8];
        claimer.copy_from_slice(&bytes[..ADDRESS_LEN]);
        claimed_at.copy_from_slice(&bytes[ADDRESS_LEN..ADDRESS_LEN + 8]);
        block_commitment.copy_from_slice(&bytes[ADDRESS_LEN + 8..]);

        Ok(Self {
            claimer: Address(claimer),
            claimed_at: u64::from_le_bytes(claimed_at),
            block_commitment: u64::from_le_bytes(block_commitment),
        })
    }
}
