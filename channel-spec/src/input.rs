//! Execution input element

use crate::address::Address;
use crate::error::DecodeError;
use crate::table::{TableBuilder, TableReader};
use crate::types::InputType;
use serde::{Deserialize, Serialize};

const SLOT_INPUT_TYPE: usize = 0;
const SLOT_DATA: usize = 1;
const FIELD_COUNT: usize = 2;

/// Tagged input value
///
/// For [`InputType::InputSet`] the payload on the wire is a one-byte account
/// index, not the referenced data. Before assembly it holds the referenced
/// account, either as a base58 string or as the raw 32 address bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub input_type: InputType,
    #[serde(with = "crate::serde_hex")]
    pub data: Vec<u8>,
}

impl Input {
    pub fn new(input_type: InputType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            input_type,
            data: data.into(),
        }
    }

    pub fn public(data: impl Into<Vec<u8>>) -> Self {
        Self::new(InputType::PublicData, data)
    }

    pub fn private(data: impl Into<Vec<u8>>) -> Self {
        Self::new(InputType::Private, data)
    }

    pub fn public_proof(data: impl Into<Vec<u8>>) -> Self {
        Self::new(InputType::PublicProof, data)
    }

    pub fn url(url: &str) -> Self {
        Self::new(InputType::PublicUrl, url.as_bytes())
    }

    pub fn private_url(url: &str) -> Self {
        Self::new(InputType::PrivateUrl, url.as_bytes())
    }

    /// Contents of an on-chain account, fetched by the prover
    pub fn public_account(address: Address) -> Self {
        Self::new(InputType::PublicAccountData, address.to_bytes())
    }

    /// Inputs stored in an input set account
    pub fn input_set(address: Address) -> Self {
        Self::new(InputType::InputSet, address.to_string().into_bytes())
    }

    pub(crate) fn to_table(&self) -> Result<TableBuilder, crate::error::BuildError> {
        let mut table = TableBuilder::new(FIELD_COUNT);
        table
            .push_scalar(SLOT_INPUT_TYPE, self.input_type.to_u8(), 0)
            .push_vector(SLOT_DATA, &self.data)?;
        Ok(table)
    }

    pub(crate) fn from_table(table: &TableReader<'_>) -> Result<Self, DecodeError> {
        let input_type = InputType::from_u8(table.scalar(SLOT_INPUT_TYPE, 0u8)?);
        let data = table.vector(SLOT_DATA)?.unwrap_or_default().to_vec();
        Ok(Self { input_type, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(input: &Input) -> Input {
        let bytes = input.to_table().unwrap().finish().unwrap();
        let table = TableReader::root(&bytes).unwrap();
        Input::from_table(&table).unwrap()
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Input::public(b"x".to_vec()).input_type, InputType::PublicData);
        assert_eq!(Input::private(vec![1]).input_type, InputType::Private);
        assert_eq!(Input::public_proof(vec![1]).input_type, InputType::PublicProof);
        assert_eq!(Input::url("https://a.b").data, b"https://a.b".to_vec());
        assert_eq!(Input::private_url("https://a.b").input_type, InputType::PrivateUrl);

        let account = Input::public_account(Address([3u8; 32]));
        assert_eq!(account.data, vec![3u8; 32]);

        let set = Input::input_set(crate::BASE_IDENTITY);
        assert_eq!(set.data, b"BoNsHRcyLLNdtnoDf8hiCNZpyehMC4FDMxs6NTxFi3ew".to_vec());
    }

    #[test]
    fn test_table_roundtrip() {
        let input = Input::public(b"hello".to_vec());
        assert_eq!(roundtrip(&input), input);

        let unknown = Input::new(InputType::Unknown, Vec::new());
        assert_eq!(roundtrip(&unknown), unknown);
    }

    #[test]
    fn test_unrecognized_type_survives() {
        let input = Input::new(InputType::Unrecognized(42), vec![1, 2]);
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn test_serde_hex() {
        let input = Input::public(vec![0xAB, 0xCD]);
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"inputType":"PublicData","data":"abcd"}"#);
        let back: Input = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }
}
