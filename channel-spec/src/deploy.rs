//! # Deployment Record
//!
//! `DeployV1` table. Registers an image (by id and download URL) under the
//! deployment address derived from the image id.

use crate::address::Address;
use crate::config::CodecConfig;
use crate::error::{BuildError, DecodeError};
use crate::table::{TableBuilder, TableReader};
use crate::types::ProgramInputType;
use serde::{Deserialize, Serialize};
use url::Url;

const SLOT_URL: usize = 0;
const SLOT_SIZE: usize = 1;
const SLOT_IMAGE_ID: usize = 2;
const SLOT_PROGRAM_NAME: usize = 3;
const SLOT_INPUTS: usize = 4;
const SLOT_OWNER: usize = 5;
const FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub url: String,
    pub size: u64,
    pub image_id: String,
    pub program_name: String,
    pub inputs: Vec<ProgramInputType>,
    pub owner: Address,
}

impl Deployment {
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        self.to_table()?.finish()
    }

    pub(crate) fn to_table(&self) -> Result<TableBuilder, BuildError> {
        validate_url(&self.url)?;
        if self.image_id.is_empty() {
            return Err(BuildError::EmptyField("image_id"));
        }

        let inputs: Vec<u8> = self.inputs.iter().map(|ty| ty.to_u8()).collect();
        let mut table = TableBuilder::new(FIELD_COUNT);
        table
            .push_string(SLOT_URL, &self.url)?
            .push_scalar(SLOT_SIZE, self.size, 0)
            .push_string(SLOT_IMAGE_ID, &self.image_id)?
            .push_string(SLOT_PROGRAM_NAME, &self.program_name)?
            .push_vector(SLOT_INPUTS, &inputs)?
            .push_vector(SLOT_OWNER, self.owner.as_bytes())?;
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
        let owner = table
            .vector(SLOT_OWNER)?
            .ok_or(DecodeError::MissingField("owner"))?;
        let owner =
            Address::from_slice(owner).ok_or(DecodeError::InvalidAddressLength(owner.len()))?;

        Ok(Self {
            url: table.required_string(SLOT_URL, "url")?.to_owned(),
            size: table.scalar(SLOT_SIZE, 0u64)?,
            image_id: table.required_string(SLOT_IMAGE_ID, "image_id")?.to_owned(),
            program_name: table.string(SLOT_PROGRAM_NAME)?.unwrap_or_default().to_owned(),
            inputs: table
                .vector(SLOT_INPUTS)?
                .unwrap_or_default()
                .iter()
                .map(|&value| ProgramInputType::from_u8(value))
                .collect(),
            owner,
        })
    }
}

/// Check that `url` is an absolute `http` or `https` URL with a host
pub fn validate_url(url: &str) -> Result<(), BuildError> {
    let invalid = |reason: String| BuildError::InvalidUrl(format!("{url}: {reason}"));

    let parsed = Url::parse(url).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    if parsed.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}
