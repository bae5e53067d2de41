//! # InputSet Account Co-encoding
//!
//! An InputSet input names an account rather than carrying data. During
//! assembly the account is appended to the instruction's account list and the
//! input's payload becomes the one-byte index of that account. With the
//! six-slot execute prefix the first InputSet account lands at index 6, the
//! next at 7, in input order.

use channel_spec::{AccountReference, Address, BuildError, Input, InputType, ADDRESS_LEN};

/// Ordered account list under construction
///
/// Order is part of the protocol: entries are never sorted or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountList {
    accounts: Vec<AccountReference>,
}

impl AccountList {
    pub fn new(prefix: Vec<AccountReference>) -> Self {
        Self { accounts: prefix }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Append and return the index of the new entry
    pub fn push(&mut self, account: AccountReference) -> usize {
        self.accounts.push(account);
        self.accounts.len() - 1
    }

    pub fn extend(&mut self, accounts: impl IntoIterator<Item = AccountReference>) {
        self.accounts.extend(accounts);
    }

    pub fn as_slice(&self) -> &[AccountReference] {
        &self.accounts
    }

    pub fn into_vec(self) -> Vec<AccountReference> {
        self.accounts
    }
}

/// Account named by an InputSet payload: a base58 address string, or the
/// raw 32 address bytes
pub fn resolve_input_set(data: &[u8]) -> Option<Address> {
    if let Some(address) = std::str::from_utf8(data)
        .ok()
        .and_then(|s| s.parse::<Address>().ok())
    {
        return Some(address);
    }
    if data.len() == ADDRESS_LEN {
        return Address::from_slice(data);
    }
    None
}

/// Replace every InputSet payload with the index of its appended account
///
/// Consumes the account list and returns it with one ReadOnly entry added per
/// InputSet input, alongside the rewritten inputs. Other inputs pass through
/// unchanged.
pub fn rewrite_inputs(
    inputs: &[Input],
    mut accounts: AccountList,
) -> Result<(Vec<Input>, AccountList), BuildError> {
    let mut rewritten = Vec::with_capacity(inputs.len());
    for (position, input) in inputs.iter().enumerate() {
        if input.input_type != InputType::InputSet {
            rewritten.push(input.clone());
            continue;
        }

        let address = resolve_input_set(&input.data).ok_or_else(|| BuildError::InvalidInputSet {
            position,
            reason: format!("{} bytes are not an address", input.data.len()),
        })?;
        let index = accounts.len();
        let index_byte = u8::try_from(index).map_err(|_| BuildError::AccountIndexOverflow(index))?;
        accounts.push(AccountReference::readonly(address));

        tracing::debug!(position, index, %address, "input set account appended");
        rewritten.push(Input::new(InputType::InputSet, vec![index_byte]));
    }
    Ok((rewritten, accounts))
}
