//! Assembled instruction handed to the submission layer

use channel_spec::{AccountReference, Address};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDescriptor {
    pub program_address: Address,
    pub accounts: Vec<AccountReference>,
    #[serde(with = "channel_spec::serde_hex")]
    pub data: Vec<u8>,
}

impl InstructionDescriptor {
    /// Position of `address` in the account list
    pub fn account_index(&self, address: &Address) -> Option<usize> {
        self.accounts.iter().position(|a| &a.address == address)
    }

    pub fn signers(&self) -> impl Iterator<Item = &Address> {
        self.accounts
            .iter()
            .filter(|a| a.role.is_signer())
            .map(|a| &a.address)
    }
}
