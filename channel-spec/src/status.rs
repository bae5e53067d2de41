//! # Status Record
//!
//! `StatusV1` table posted by a prover once an execution finishes, carrying
//! the proof and the digests the program checks it against.

use crate::config::CodecConfig;
use crate::error::{BuildError, DecodeError};
use crate::table::{TableBuilder, TableReader};
use crate::types::{ExitCode, StatusType};
use crate::{DIGEST_LEN, PROOF_LEN};
use serde::{Deserialize, Serialize};

const SLOT_EXECUTION_ID: usize = 0;
const SLOT_STATUS: usize = 1;
const SLOT_PROOF: usize = 2;
const SLOT_EXECUTION_DIGEST: usize = 3;
const SLOT_INPUT_DIGEST: usize = 4;
const SLOT_COMMITTED_OUTPUTS: usize = 5;
const SLOT_ASSUMPTION_DIGEST: usize = 6;
const SLOT_EXIT_CODE_SYSTEM: usize = 7;
const SLOT_EXIT_CODE_USER: usize = 8;
const FIELD_COUNT: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub execution_id: String,
    pub status: StatusType,
    #[serde(default, with = "crate::serde_hex::option")]
    pub proof: Option<Vec<u8>>,
    #[serde(default, with = "crate::serde_hex::option")]
    pub execution_digest: Option<Vec<u8>>,
    #[serde(default, with = "crate::serde_hex::option")]
    pub input_digest: Option<Vec<u8>>,
    #[serde(default, with = "crate::serde_hex::option")]
    pub committed_outputs: Option<Vec<u8>>,
    #[serde(default, with = "crate::serde_hex::option")]
    pub assumption_digest: Option<Vec<u8>>,
    #[serde(default)]
    pub exit_code_system: ExitCode,
    #[serde(default)]
    pub exit_code_user: ExitCode,
}

impl StatusReport {
    /// Report with no proof attached
    pub fn new(execution_id: impl Into<String>, status: StatusType) -> Self {
        Self {
            execution_id: execution_id.into(),
            status,
            proof: None,
            execution_digest: None,
            input_digest: None,
            committed_outputs: None,
            assumption_digest: None,
            exit_code_system: ExitCode::Success,
            exit_code_user: ExitCode::Success,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        self.to_table()?.finish()
    }

    pub(crate) fn to_table(&self) -> Result<TableBuilder, BuildError> {
        if self.execution_id.is_empty() {
            return Err(BuildError::EmptyField("execution_id"));
        }
        check_len("proof", &self.proof, PROOF_LEN)?;
        check_len("execution_digest", &self.execution_digest, DIGEST_LEN)?;
        check_len("input_digest", &self.input_digest, DIGEST_LEN)?;
        check_len("assumption_digest", &self.assumption_digest, DIGEST_LEN)?;

        let mut table = TableBuilder::new(FIELD_COUNT);
        table
            .push_string(SLOT_EXECUTION_ID, &self.execution_id)?
            .push_scalar(SLOT_STATUS, self.status.to_u8(), 0);

        let vectors = [
            (SLOT_PROOF, &self.proof),
            (SLOT_EXECUTION_DIGEST, &self.execution_digest),
            (SLOT_INPUT_DIGEST, &self.input_digest),
            (SLOT_COMMITTED_OUTPUTS, &self.committed_outputs),
            (SLOT_ASSUMPTION_DIGEST, &self.assumption_digest),
        ];
        for (slot, value) in vectors {
            if let Some(bytes) = value {
                table.push_vector(slot, bytes)?;
            }
        }

        table
            .push_scalar(SLOT_EXIT_CODE_SYSTEM, self.exit_code_system.to_u32(), 0)
            .push_scalar(SLOT_EXIT_CODE_USER, self.exit_code_user.to_u32(), 0);
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
        let bytes = |slot| -> Result<Option<Vec<u8>>, DecodeError> {
            Ok(table.vector(slot)?.map(<[u8]>::to_vec))
        };
        Ok(Self {
            execution_id: table
                .required_string(SLOT_EXECUTION_ID, "execution_id")?
                .to_owned(),
            status: StatusType::from_u8(table.scalar(SLOT_STATUS, 0u8)?),
            proof: bytes(SLOT_PROOF)?,
            execution_digest: bytes(SLOT_EXECUTION_DIGEST)?,
            input_digest: bytes(SLOT_INPUT_DIGEST)?,
            committed_outputs: bytes(SLOT_COMMITTED_OUTPUTS)?,
            assumption_digest: bytes(SLOT_ASSUMPTION_DIGEST)?,
            exit_code_system: ExitCode::from_u32(table.scalar(SLOT_EXIT_CODE_SYSTEM, 0u32)?),
            exit_code_user: ExitCode::from_u32(table.scalar(SLOT_EXIT_CODE_USER, 0u32)?),
        })
    }
}

fn check_len(field: &'static str, value: &Option<Vec<u8>>, expected: usize) -> Result<(), BuildError> {
    match value {
        Some(bytes) if bytes.len() != expected => Err(BuildError::InvalidLength {
            field,
            expected,
            found: bytes.len(),
        }),
        _ => Ok(()),
    }
}
