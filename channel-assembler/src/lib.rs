//! Prover Channel Instruction Assembler
//!
//! Turn operation parameters into complete instructions: program address,
//! ordered account list and envelope-wrapped record bytes.
//!
//! ## Example
//!
//! ```rust
//! use channel_assembler::{assemble, DeployParams, Operation};
//! use channel_spec::{Address, ProgramInputType};
//!
//! let deployer = Address([7u8; 32]);
//! let params = DeployParams {
//!     deployer,
//!     payer: deployer,
//!     image_id: "abc123".to_string(),
//!     url: "https://example.com/abc123".to_string(),
//!     size: 1024,
//!     program_name: "simple".to_string(),
//!     inputs: vec![ProgramInputType::Public],
//!     owner: deployer,
//! };
//!
//! let instruction = assemble(&Operation::Deploy(params), &[]).unwrap();
//! assert_eq!(instruction.accounts.len(), 4);
//! ```

pub mod error;
pub mod input_set;
pub mod operation;
pub mod encoder;
pub mod instruction;
pub mod assembler;

pub use error::{AssemblerError, Result};
pub use assembler::{assemble, Assembler};
pub use input_set::{resolve_input_set, rewrite_inputs, AccountList};
pub use instruction::InstructionDescriptor;
pub use operation::{
    CallbackConfig, ClaimParams, DeployParams, ExecuteParams, ExecutionConfig, Operation,
    StatusParams,
};
