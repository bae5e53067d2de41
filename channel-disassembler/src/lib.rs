//! # Prover Channel Disassembler
//!
//! Decode the program's persisted account records and instruction data, and
//! render them as text.
//!
//! ## Account kinds
//!
//! - **execution-request**: the `ExecutionRequestV1` table stored at the
//!   execution address
//! - **deployment**: the `DeployV1` table stored at the deployment address
//! - **claim**: the fixed 48-byte claim state at the execution-claim address
//!
//! ## Example
//!
//! ```rust
//! use channel_disassembler::{decode, AccountKind, AccountState};
//! use channel_spec::{Address, ClaimState};
//!
//! let bytes = ClaimState {
//!     claimer: Address([1u8; 32]),
//!     claimed_at: 100,
//!     block_commitment: 120,
//! }
//! .to_bytes();
//!
//! match decode(AccountKind::Claim, &bytes).unwrap() {
//!     AccountState::Claim(state) => assert_eq!(state.claimed_at, 100),
//!     _ => unreachable!(),
//! }
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use decoder::{
    decode, decode_instruction, decode_instruction_with_config, decode_with_config, AccountKind,
    AccountState,
};
pub use disassembler::{disassemble, disassemble_account};
pub use formatter::{format_instruction, format_state};
