//! # Execution Request Record
//!
//! `ExecutionRequestV1` table (slots 0-10) and the fixed-size account record
//! used for callback extra accounts. The same bytes are the payload of an
//! execute instruction and the contents of the execution request account.

use crate::address::Address;
use crate::config::CodecConfig;
use crate::error::{BuildError, DecodeError};
use crate::input::Input;
use crate::table::{TableBuilder, TableReader, WireStruct};
use crate::{ACCOUNT_RECORD_ALIGN, ACCOUNT_RECORD_SIZE, ADDRESS_LEN};
use flatbuffers::{
    Follow, InvalidFlatbuffer, Push, PushAlignment, SimpleToVerifyInSlice, Verifiable, Verifier,
};
use serde::{Deserialize, Serialize};

const SLOT_TIP: usize = 0;
const SLOT_EXECUTION_ID: usize = 1;
const SLOT_IMAGE_ID: usize = 2;
const SLOT_CALLBACK_PROGRAM_ID: usize = 3;
const SLOT_CALLBACK_INSTRUCTION_PREFIX: usize = 4;
const SLOT_FORWARD_OUTPUT: usize = 5;
const SLOT_VERIFY_INPUT_HASH: usize = 6;
const SLOT_INPUT: usize = 7;
const SLOT_INPUT_DIGEST: usize = 8;
const SLOT_MAX_BLOCK_HEIGHT: usize = 9;
const SLOT_CALLBACK_EXTRA_ACCOUNTS: usize = 10;
const FIELD_COUNT: usize = 11;

/// Offset of the address inside an account record
const ACCOUNT_ADDRESS_OFFSET: usize = 1;

// ============================================================================
// Account Record
// ============================================================================

/// Callback extra account, 40 bytes on the wire:
///
/// ```text
/// [writable: u8][address: 32][padding: 7]
/// ```
///
/// The record is 8-aligned inside its vector, so the padding sits at the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountRecord {
    pub writable: bool,
    pub address: Address,
}

impl AccountRecord {
    pub fn new(address: Address, writable: bool) -> Self {
        Self { writable, address }
    }

    pub fn to_bytes(&self) -> [u8; ACCOUNT_RECORD_SIZE] {
        let mut bytes = [0u8; ACCOUNT_RECORD_SIZE];
        bytes[0] = u8::from(self.writable);
        bytes[ACCOUNT_ADDRESS_OFFSET..ACCOUNT_ADDRESS_OFFSET + ADDRESS_LEN]
            .copy_from_slice(self.address.as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != ACCOUNT_RECORD_SIZE {
            return Err(DecodeError::InvalidRecordSize {
                expected: ACCOUNT_RECORD_SIZE,
                found: bytes.len(),
            });
        }
        let address =
            Address::from_slice(&bytes[ACCOUNT_ADDRESS_OFFSET..ACCOUNT_ADDRESS_OFFSET + ADDRESS_LEN])
                .ok_or(DecodeError::InvalidAddressLength(ADDRESS_LEN))?;
        Ok(Self {
            writable: bytes[0] != 0,
            address,
        })
    }
}

/// Wire image of an [`AccountRecord`] inside the extra-accounts vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct AccountRecordBytes([u8; ACCOUNT_RECORD_SIZE]);

impl From<&AccountRecord> for AccountRecordBytes {
    fn from(record: &AccountRecord) -> Self {
        Self(record.to_bytes())
    }
}

impl Push for AccountRecordBytes {
    type Output = AccountRecordBytes;

    #[inline]
    unsafe fn push(&self, dst: &mut [u8], _written_len: usize) {
        dst.copy_from_slice(&self.0);
    }

    #[inline]
    fn alignment() -> PushAlignment {
        PushAlignment::new(ACCOUNT_RECORD_ALIGN)
    }
}

impl<'a> Follow<'a> for AccountRecordBytes {
    type Inner = AccountRecordBytes;

    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        let mut bytes = [0u8; ACCOUNT_RECORD_SIZE];
        bytes.copy_from_slice(&buf[loc..loc + ACCOUNT_RECORD_SIZE]);
        Self(bytes)
    }
}

impl Verifiable for AccountRecordBytes {
    #[inline]
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.in_buffer::<Self>(pos)
    }
}

impl SimpleToVerifyInSlice for AccountRecordBytes {}

impl WireStruct for AccountRecordBytes {}

// ============================================================================
// Execution Request
// ============================================================================

/// Request for a proven execution of a deployed image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub tip: u64,
    pub execution_id: String,
    pub image_id: String,
    #[serde(default, with = "crate::serde_hex::option")]
    pub callback_program_id: Option<Vec<u8>>,
    #[serde(default, with = "crate::serde_hex::option")]
    pub callback_instruction_prefix: Option<Vec<u8>>,
    pub forward_output: bool,
    pub verify_input_hash: bool,
    pub inputs: Vec<Input>,
    #[serde(default, with = "crate::serde_hex::option")]
    pub input_digest: Option<Vec<u8>>,
    pub max_block_height: u64,
    #[serde(default)]
    pub callback_extra_accounts: Vec<AccountRecord>,
}

impl Default for ExecutionRequest {
    fn default() -> Self {
        Self {
            tip: 0,
            execution_id: String::new(),
            image_id: String::new(),
            callback_program_id: None,
            callback_instruction_prefix: None,
            forward_output: false,
            verify_input_hash: true,
            inputs: Vec::new(),
            input_digest: None,
            max_block_height: 0,
            callback_extra_accounts: Vec::new(),
        }
    }
}

impl ExecutionRequest {
    /// Serialize as a standalone buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        self.to_table()?.finish()
    }

    pub(crate) fn to_table(&self) -> Result<TableBuilder, BuildError> {
        if self.execution_id.is_empty() {
            return Err(BuildError::EmptyField("execution_id"));
        }
        if self.image_id.is_empty() {
            return Err(BuildError::EmptyField("image_id"));
        }

        let mut table = TableBuilder::new(FIELD_COUNT);
        table
            .push_scalar(SLOT_TIP, self.tip, 0)
            .push_string(SLOT_EXECUTION_ID, &self.execution_id)?
            .push_string(SLOT_IMAGE_ID, &self.image_id)?;
        if let Some(program_id) = &self.callback_program_id {
            table.push_vector(SLOT_CALLBACK_PROGRAM_ID, program_id)?;
        }
        if let Some(prefix) = &self.callback_instruction_prefix {
            table.push_vector(SLOT_CALLBACK_INSTRUCTION_PREFIX, prefix)?;
        }
        table
            .push_scalar(SLOT_FORWARD_OUTPUT, self.forward_output, false)
            .push_scalar(SLOT_VERIFY_INPUT_HASH, self.verify_input_hash, true);

        let inputs = self
            .inputs
            .iter()
            .map(Input::to_table)
            .collect::<Result<Vec<_>, _>>()?;
        table.push_tables(SLOT_INPUT, inputs)?;

        if let Some(digest) = &self.input_digest {
            table.push_vector(SLOT_INPUT_DIGEST, digest)?;
        }
        table.push_scalar(SLOT_MAX_BLOCK_HEIGHT, self.max_block_height, 0);

        // A callback always carries its account list, empty or not
        if self.callback_program_id.is_some() || !self.callback_extra_accounts.is_empty() {
            let records = self
                .callback_extra_accounts
                .iter()
                .map(AccountRecordBytes::from)
                .collect();
            table.push_structs(SLOT_CALLBACK_EXTRA_ACCOUNTS, records)?;
        }

        Ok(table)
    }

    /// Parse with default decode limits
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_bytes_with_config(bytes, CodecConfig::DEFAULT)
    }

    pub fn from_bytes_with_config(bytes: &[u8], config: CodecConfig) -> Result<Self, DecodeError> {
        let table = TableReader::root_with_config(bytes, config)?;
        Self::from_table(&table)
    }

    pub(crate) fn from_table(table: &TableReader<'_>) -> Result<Self, DecodeError> {
        let inputs = table
            .tables(SLOT_INPUT)?
            .unwrap_or_default()
            .iter()
            .map(Input::from_table)
            .collect::<Result<Vec<_>, _>>()?;

        let callback_extra_accounts = table
            .structs::<AccountRecordBytes>(SLOT_CALLBACK_EXTRA_ACCOUNTS)?
            .unwrap_or_default()
            .into_iter()
            .map(AccountRecord::from_bytes)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tip: table.scalar(SLOT_TIP, 0u64)?,
            execution_id: table
                .required_string(SLOT_EXECUTION_ID, "execution_id")?
                .to_owned(),
            image_id: table.required_string(SLOT_IMAGE_ID, "image_id")?.to_owned(),
            callback_program_id: table.vector(SLOT_CALLBACK_PROGRAM_ID)?.map(<[u8]>::to_vec),
            callback_instruction_prefix: table
                .vector(SLOT_CALLBACK_INSTRUCTION_PREFIX)?
                .map(<[u8]>::to_vec),
            forward_output: table.scalar(SLOT_FORWARD_OUTPUT, false)?,
            verify_input_hash: table.scalar(SLOT_VERIFY_INPUT_HASH, true)?,
            inputs,
            input_digest: table.vector(SLOT_INPUT_DIGEST)?.map(<[u8]>::to_vec),
            max_block_height: table.scalar(SLOT_MAX_BLOCK_HEIGHT, 0u64)?,
            callback_extra_accounts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputType;

    fn sample() -> ExecutionRequest {
        ExecutionRequest {
            tip: 12_000,
            execution_id: "exec-1".to_string(),
            image_id: "abc123".to_string(),
            callback_program_id: Some(vec![9u8; 32]),
            callback_instruction_prefix: Some(vec![1, 2, 3]),
            forward_output: true,
            verify_input_hash: true,
            inputs: vec![
                Input::public(b"hello".to_vec()),
                Input::new(InputType::InputSet, vec![6]),
            ],
            input_digest: Some(vec![7u8; 32]),
            max_block_height: 1_000,
            callback_extra_accounts: vec![
                AccountRecord::new(Address([1u8; 32]), true),
                AccountRecord::new(Address([2u8; 32]), false),
            ],
        }
    }

    #[test]
    fn test_account_record_layout() {
        let record = AccountRecord::new(Address([0xEE; 32]), true);
        let bytes = record.to_bytes();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..33], &[0xEE; 32]);
        assert_eq!(&bytes[33..], &[0u8; 7]);
        assert_eq!(AccountRecord::from_bytes(&bytes).unwrap(), record);

        assert!(matches!(
            AccountRecord::from_bytes(&bytes[..39]),
            Err(DecodeError::InvalidRecordSize { expected: 40, found: 39 })
        ));
    }

    #[test]
    fn test_roundtrip() {
        let request = sample();
        let bytes = request.to_bytes().unwrap();
        assert_eq!(ExecutionRequest::from_bytes(&bytes).unwrap(), request);
    }

    #[test]
    fn test_minimal_roundtrip_uses_defaults() {
        let request = ExecutionRequest {
            execution_id: "e".to_string(),
            image_id: "i".to_string(),
            ..Default::default()
        };
        let bytes = request.to_bytes().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        assert!(!table.has_field(SLOT_TIP));
        assert!(!table.has_field(SLOT_FORWARD_OUTPUT));
        assert!(!table.has_field(SLOT_VERIFY_INPUT_HASH));
        assert!(!table.has_field(SLOT_MAX_BLOCK_HEIGHT));
        assert!(!table.has_field(SLOT_CALLBACK_EXTRA_ACCOUNTS));
        assert!(table.has_field(SLOT_INPUT));

        let parsed = ExecutionRequest::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, request);
        assert!(parsed.verify_input_hash);
    }

    #[test]
    fn test_verify_input_hash_false_is_written() {
        let request = ExecutionRequest {
            execution_id: "e".to_string(),
            image_id: "i".to_string(),
            verify_input_hash: false,
            ..Default::default()
        };
        let bytes = request.to_bytes().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        assert!(table.has_field(SLOT_VERIFY_INPUT_HASH));
        assert!(!ExecutionRequest::from_bytes(&bytes).unwrap().verify_input_hash);
    }

    #[test]
    fn test_empty_ids_rejected() {
        let request = ExecutionRequest {
            image_id: "i".to_string(),
            ..Default::default()
        };
        assert_eq!(
            request.to_bytes(),
            Err(BuildError::EmptyField("execution_id"))
        );

        let request = ExecutionRequest {
            execution_id: "e".to_string(),
            ..Default::default()
        };
        assert_eq!(request.to_bytes(), Err(BuildError::EmptyField("image_id")));
    }

    #[test]
    fn test_missing_execution_id_on_decode() {
        let mut table = TableBuilder::new(FIELD_COUNT);
        table.push_string(SLOT_IMAGE_ID, "i").unwrap();
        let bytes = table.finish().unwrap();
        assert_eq!(
            ExecutionRequest::from_bytes(&bytes),
            Err(DecodeError::MissingField("execution_id"))
        );
    }

    #[test]
    fn test_truncated_buffer() {
        let bytes = sample().to_bytes().unwrap();
        for cut in [0, 3, bytes.len() / 2] {
            assert!(ExecutionRequest::from_bytes(&bytes[..cut]).is_err());
        }
    }

    #[test]
    fn test_callback_without_extra_accounts_writes_empty_list() {
        let request = ExecutionRequest {
            execution_id: "e".to_string(),
            image_id: "i".to_string(),
            callback_program_id: Some(vec![7u8; 32]),
            ..Default::default()
        };
        let bytes = request.to_bytes().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        assert!(table.has_field(SLOT_CALLBACK_EXTRA_ACCOUNTS));
        assert_eq!(
            table
                .structs::<AccountRecordBytes>(SLOT_CALLBACK_EXTRA_ACCOUNTS)
                .unwrap(),
            Some(Vec::new())
        );

        let parsed = ExecutionRequest::from_bytes(&bytes).unwrap();
        assert!(parsed.callback_extra_accounts.is_empty());
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_extra_accounts_are_record_aligned() {
        let bytes = sample().to_bytes().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        let records = table
            .structs::<AccountRecordBytes>(SLOT_CALLBACK_EXTRA_ACCOUNTS)
            .unwrap()
            .unwrap();
        assert_eq!(records.len(), 2);
        for (record, address) in records.iter().zip([[1u8; 32], [2u8; 32]]) {
            let start = record.as_ptr() as usize - bytes.as_ptr() as usize;
            assert_eq!(start % ACCOUNT_RECORD_ALIGN, 0);
            assert_eq!(&record[1..33], &address);
        }
        assert_eq!(records[0][0], 1);
        assert_eq!(records[1][0], 0);
    }

    #[test]
    fn test_json_view() {
        let request = sample();
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"executionId\":\"exec-1\""));
        assert!(json.contains("\"inputDigest\":\"0707"));
        let back: ExecutionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
