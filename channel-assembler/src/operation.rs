//! Operations the program understands, as caller-facing parameters

use channel_spec::{
    AccountReference, AccountRecord, Address, BuildError, Input, IxType, ProgramInputType,
    StatusReport, DIGEST_LEN,
};

/// How the prover treats the inputs and outputs of an execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    pub verify_input_hash: bool,
    pub input_digest: Option<Vec<u8>>,
    pub forward_output: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            verify_input_hash: true,
            input_digest: None,
            forward_output: false,
        }
    }
}

impl ExecutionConfig {
    pub fn validate(&self) -> Result<(), BuildError> {
        match &self.input_digest {
            None if self.verify_input_hash => Err(BuildError::MissingInputDigest),
            Some(digest) if digest.len() != DIGEST_LEN => Err(BuildError::InvalidLength {
                field: "input_digest",
                expected: DIGEST_LEN,
                found: digest.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// Program invoked with the execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackConfig {
    pub program_id: Address,
    pub instruction_prefix: Vec<u8>,
    /// Accounts the callback needs, in the order it expects them
    pub extra_accounts: Vec<AccountReference>,
}

impl CallbackConfig {
    pub(crate) fn account_records(&self) -> Vec<AccountRecord> {
        self.extra_accounts
            .iter()
            .map(|account| AccountRecord::new(account.address, account.role.is_writable()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteParams {
    pub requester: Address,
    pub payer: Address,
    pub image_id: String,
    pub execution_id: String,
    pub inputs: Vec<Input>,
    pub tip: u64,
    /// Last block at which the request may be fulfilled
    pub expiration: u64,
    pub config: ExecutionConfig,
    pub callback: Option<CallbackConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
    pub deployer: Address,
    pub payer: Address,
    pub image_id: String,
    pub url: String,
    pub size: u64,
    pub program_name: String,
    pub inputs: Vec<ProgramInputType>,
    pub owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimParams {
    pub claimer: Address,
    pub payer: Address,
    pub requester: Address,
    pub execution_id: String,
    pub block_commitment: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParams {
    pub prover: Address,
    pub requester: Address,
    /// Callback program recorded in the request, if any
    pub callback_program: Option<Address>,
    pub report: StatusReport,
}

/// One instruction to assemble
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Execute(ExecuteParams),
    Status(StatusParams),
    Deploy(DeployParams),
    Claim(ClaimParams),
}

impl Operation {
    pub fn ix_type(&self) -> IxType {
        match self {
            Operation::Execute(_) => IxType::ExecuteV1,
            Operation::Status(_) => IxType::StatusV1,
            Operation::Deploy(_) => IxType::DeployV1,
            Operation::Claim(_) => IxType::ClaimV1,
        }
    }
}

impl From<ExecuteParams> for Operation {
    fn from(params: ExecuteParams) -> Self {
        Operation::Execute(params)
    }
}

impl From<StatusParams> for Operation {
    fn from(params: StatusParams) -> Self {
        Operation::Status(params)
    }
}

impl From<DeployParams> for Operation {
    fn from(params: DeployParams) -> Self {
        Operation::Deploy(params)
    }
}

impl From<ClaimParams> for Operation {
    fn from(params: ClaimParams) -> Self {
        Operation::Claim(params)
    }
}
