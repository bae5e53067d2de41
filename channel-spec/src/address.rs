//! # Addresses and Account References
//!
//! A 32-byte account address, rendered as base58, and the role an account
//! plays in an instruction.

use crate::error::BuildError;
use crate::ADDRESS_LEN;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 32-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, which must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; ADDRESS_LEN] = bytes.try_into().ok()?;
        Some(Self(raw))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| BuildError::InvalidAddress(format!("{s}: {e}")))?;
        Self::from_slice(&decoded).ok_or_else(|| {
            BuildError::InvalidAddress(format!("{s}: decodes to {} bytes", decoded.len()))
        })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Access an instruction grants over one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountRole {
    ReadOnly,
    Writable,
    WritableSigner,
}

impl AccountRole {
    #[inline]
    pub fn is_writable(self) -> bool {
        matches!(self, AccountRole::Writable | AccountRole::WritableSigner)
    }

    #[inline]
    pub fn is_signer(self) -> bool {
        matches!(self, AccountRole::WritableSigner)
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountRole::ReadOnly => "r",
            AccountRole::Writable => "w",
            AccountRole::WritableSigner => "ws",
        };
        f.write_str(name)
    }
}

/// One entry of an instruction's ordered account list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountReference {
    pub address: Address,
    pub role: AccountRole,
}

impl AccountReference {
    pub fn new(address: Address, role: AccountRole) -> Self {
        Self { address, role }
    }

    pub fn readonly(address: Address) -> Self {
        Self::new(address, AccountRole::ReadOnly)
    }

    pub fn writable(address: Address) -> Self {
        Self::new(address, AccountRole::Writable)
    }

    pub fn writable_signer(address: Address) -> Self {
        Self::new(address, AccountRole::WritableSigner)
    }
}

impl fmt::Display for AccountReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BASE_IDENTITY, SYSTEM_ACCOUNT};

    #[test]
    fn test_base_identity_base58() {
        assert_eq!(
            BASE_IDENTITY.to_string(),
            "BoNsHRcyLLNdtnoDf8hiCNZpyehMC4FDMxs6NTxFi3ew"
        );
        let parsed: Address = "BoNsHRcyLLNdtnoDf8hiCNZpyehMC4FDMxs6NTxFi3ew".parse().unwrap();
        assert_eq!(parsed, BASE_IDENTITY);
    }

    #[test]
    fn test_system_account_base58() {
        assert_eq!(SYSTEM_ACCOUNT.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            "abc".parse::<Address>(),
            Err(BuildError::InvalidAddress(_))
        ));
        assert!(matches!(
            "0OIl".parse::<Address>(),
            Err(BuildError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_from_slice() {
        assert_eq!(Address::from_slice(&[7u8; 32]), Some(Address([7u8; 32])));
        assert_eq!(Address::from_slice(&[7u8; 31]), None);
    }

    #[test]
    fn test_roles() {
        assert!(!AccountRole::ReadOnly.is_writable());
        assert!(AccountRole::Writable.is_writable());
        assert!(!AccountRole::Writable.is_signer());
        assert!(AccountRole::WritableSigner.is_signer());
    }

    #[test]
    fn test_serde_base58() {
        let json = serde_json::to_string(&BASE_IDENTITY).unwrap();
        assert_eq!(json, "\"BoNsHRcyLLNdtnoDf8hiCNZpyehMC4FDMxs6NTxFi3ew\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BASE_IDENTITY);

        let reference = AccountReference::writable_signer(BASE_IDENTITY);
        let json = serde_json::to_string(&reference).unwrap();
        assert!(json.contains("\"writableSigner\""));
    }
}
