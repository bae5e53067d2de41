//! JSON manifests for the assembling commands
//!
//! Keys are camelCase. Bytes are hex, addresses base58. Every field may be
//! left out and supplied as a flag instead; flags win when both are present.

use anyhow::{anyhow, bail, Context, Result};
use channel_assembler::CallbackConfig;
use channel_spec::deploy::validate_url;
use channel_spec::{AccountReference, AccountRole, Address, Input, InputType, ProgramInputType};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid manifest {}", path.display()))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteManifest {
    pub requester: Option<Address>,
    pub payer: Option<Address>,
    pub image_id: Option<String>,
    pub execution_id: Option<String>,
    pub inputs: Vec<InputEntry>,
    pub tip: Option<u64>,
    pub expiration: Option<u64>,
    pub verify_input_hash: Option<bool>,
    #[serde(with = "channel_spec::serde_hex::option")]
    pub input_digest: Option<Vec<u8>>,
    pub forward_output: Option<bool>,
    pub callback: Option<CallbackEntry>,
    pub extra_accounts: Vec<AccountReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployManifest {
    pub deployer: Option<Address>,
    pub payer: Option<Address>,
    pub image_id: Option<String>,
    pub url: Option<String>,
    pub size: Option<u64>,
    pub program_name: Option<String>,
    pub inputs: Vec<ProgramInputType>,
    pub owner: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackEntry {
    pub program_id: Address,
    #[serde(default, with = "channel_spec::serde_hex")]
    pub instruction_prefix: Vec<u8>,
    #[serde(default)]
    pub extra_accounts: Vec<AccountReference>,
}

impl From<CallbackEntry> for CallbackConfig {
    fn from(entry: CallbackEntry) -> Self {
        CallbackConfig {
            program_id: entry.program_id,
            instruction_prefix: entry.instruction_prefix,
            extra_accounts: entry.extra_accounts,
        }
    }
}

/// One execution input as written by hand: `{"type": "PublicData", "value": "68656c6c6f"}`
///
/// The value is read according to the type: an address for `InputSet` and
/// `PublicAccountData`, the URL itself for the URL kinds, hex otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputEntry {
    #[serde(rename = "type")]
    pub input_type: String,
    pub value: String,
}

impl InputEntry {
    pub fn to_input(&self) -> Result<Input> {
        let ty = InputType::from_name(&self.input_type)
            .ok_or_else(|| anyhow!("unknown input type `{}`", self.input_type))?;
        let input = match ty {
            InputType::InputSet => Input::input_set(parse_address(&self.value)?),
            InputType::PublicAccountData => Input::public_account(parse_address(&self.value)?),
            InputType::PublicUrl => {
                validate_url(&self.value)?;
                Input::url(&self.value)
            }
            InputType::PrivateUrl => {
                validate_url(&self.value)?;
                Input::private_url(&self.value)
            }
            other => Input::new(other, parse_hex(&self.value)?),
        };
        Ok(input)
    }
}

/// `TYPE:VALUE`, e.g. `PublicData:68656c6c6f` or `InputSet:<address>`
impl FromStr for InputEntry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (ty, value) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected TYPE:VALUE, got `{s}`"))?;
        Ok(InputEntry {
            input_type: ty.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s).map_err(|e| anyhow!("invalid address `{s}`: {e}"))
}

pub fn parse_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim_start_matches("0x")).with_context(|| format!("invalid hex `{s}`"))
}

/// `ADDRESS[:r|w|ws]`, read-only when the role is omitted
pub fn parse_account(s: &str) -> Result<AccountReference> {
    let (address, role) = match s.split_once(':') {
        Some((address, role)) => (address, role),
        None => (s, "r"),
    };
    let role = match role {
        "r" => AccountRole::ReadOnly,
        "w" => AccountRole::Writable,
        "ws" => AccountRole::WritableSigner,
        other => bail!("unknown account role `{other}` (expected r, w or ws)"),
    };
    Ok(AccountReference::new(parse_address(address)?, role))
}

pub fn parse_program_input(s: &str) -> Result<ProgramInputType> {
    match s.to_ascii_lowercase().as_str() {
        "public" => Ok(ProgramInputType::Public),
        "private" => Ok(ProgramInputType::Private),
        _ => bail!("unknown program input type `{s}` (expected public or private)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET: &str = "BoNsHRcyLLNdtnoDf8hiCNZpyehMC4FDMxs6NTxFi3ew";

    #[test]
    fn test_input_entry_from_flag() {
        let entry: InputEntry = "PublicData:68656c6c6f".parse().unwrap();
        assert_eq!(entry.to_input().unwrap(), Input::public(b"hello".to_vec()));

        let entry: InputEntry = "PublicUrl:https://a.b/c".parse().unwrap();
        assert_eq!(entry.to_input().unwrap(), Input::url("https://a.b/c"));

        let entry: InputEntry = format!("InputSet:{SET}").parse().unwrap();
        assert_eq!(entry.to_input().unwrap().data, SET.as_bytes());

        let entry: InputEntry = "PrivateUrl:http://host:notaport/x".parse().unwrap();
        assert!(entry.to_input().is_err());

        assert!("PublicData".parse::<InputEntry>().is_err());
        assert!("Bogus:00".parse::<InputEntry>().unwrap().to_input().is_err());
    }

    #[test]
    fn test_parse_account() {
        let account = parse_account(&format!("{SET}:ws")).unwrap();
        assert_eq!(account.role, AccountRole::WritableSigner);
        assert_eq!(parse_account(SET).unwrap().role, AccountRole::ReadOnly);
        assert!(parse_account(&format!("{SET}:x")).is_err());
    }

    #[test]
    fn test_execute_manifest() {
        let json = format!(
            r#"{{
                "requester": "{SET}",
                "imageId": "abc123",
                "executionId": "exec-1",
                "inputs": [{{"type": "PublicData", "value": "0x6869"}}],
                "inputDigest": "{}",
                "callback": {{"programId": "{SET}", "instructionPrefix": "0102"}}
            }}"#,
            "00".repeat(32)
        );
        let manifest: ExecuteManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest.image_id.as_deref(), Some("abc123"));
        assert_eq!(manifest.inputs[0].to_input().unwrap(), Input::public(b"hi".to_vec()));
        assert_eq!(manifest.input_digest, Some(vec![0u8; 32]));
        assert!(manifest.payer.is_none());

        let callback: CallbackConfig = manifest.callback.unwrap().into();
        assert_eq!(callback.instruction_prefix, vec![1, 2]);
        assert!(callback.extra_accounts.is_empty());
    }

    #[test]
    fn test_deploy_manifest() {
        let json = format!(
            r#"{{"deployer": "{SET}", "url": "https://x.y/z", "size": 9, "inputs": ["Public", "Private"]}}"#
        );
        let manifest: DeployManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest.size, Some(9));
        assert_eq!(
            manifest.inputs,
            vec![ProgramInputType::Public, ProgramInputType::Private]
        );
        assert!(manifest.owner.is_none());
    }

    #[test]
    fn test_parse_program_input() {
        assert_eq!(parse_program_input("Public").unwrap(), ProgramInputType::Public);
        assert!(parse_program_input("secret").is_err());
    }
}
