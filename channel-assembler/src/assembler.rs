//! Main assembler logic
//!
//! Each operation has a fixed account prefix. Execute appends the InputSet
//! accounts right after its prefix, so caller extras always come last and never
//! shift an InputSet index.

use crate::encoder::{claim, deployment, encode, execution_request};
use crate::error::Result;
use crate::input_set::{rewrite_inputs, AccountList};
use crate::instruction::InstructionDescriptor;
use crate::operation::{ClaimParams, DeployParams, ExecuteParams, Operation, StatusParams};
use channel_spec::{
    AccountReference, AddressDeriver, BuildError, ChannelInstruction, CodecConfig, CurveCheck,
    Ed25519Curve, SYSTEM_ACCOUNT,
};

pub struct Assembler<C = Ed25519Curve> {
    deriver: AddressDeriver<C>,
    config: CodecConfig,
}

impl Assembler<Ed25519Curve> {
    pub fn new() -> Self {
        Self {
            deriver: AddressDeriver::new(),
            config: CodecConfig::DEFAULT,
        }
    }
}

impl Default for Assembler<Ed25519Curve> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CurveCheck> Assembler<C> {
    pub fn with_deriver(deriver: AddressDeriver<C>, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { deriver, config })
    }

    pub fn deriver(&self) -> &AddressDeriver<C> {
        &self.deriver
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    /// Assemble one instruction, appending `extras` after the operation's own
    /// accounts
    pub fn assemble(
        &self,
        operation: &Operation,
        extras: &[AccountReference],
    ) -> Result<InstructionDescriptor> {
        let (instruction, mut accounts) = match operation {
            Operation::Execute(params) => self.execute(params)?,
            Operation::Status(params) => self.status(params)?,
            Operation::Deploy(params) => self.deploy(params)?,
            Operation::Claim(params) => self.claim(params)?,
        };
        accounts.extend(extras.iter().copied());

        let descriptor = InstructionDescriptor {
            program_address: self.deriver.base(),
            accounts: accounts.into_vec(),
            data: encode(&instruction)?,
        };
        tracing::debug!(
            ix_type = %operation.ix_type(),
            accounts = descriptor.accounts.len(),
            data_len = descriptor.data.len(),
            "assembled instruction"
        );
        Ok(descriptor)
    }

    fn execute(&self, params: &ExecuteParams) -> Result<(ChannelInstruction, AccountList)> {
        if params.inputs.len() > self.config.max_inputs {
            return Err(BuildError::TooManyInputs {
                found: params.inputs.len(),
                limit: self.config.max_inputs,
            }
            .into());
        }

        let execution = self
            .deriver
            .execution_address(&params.requester, &params.execution_id)?;
        let deployment = self.deriver.deployment_address(&params.image_id)?;
        let callback_program = params
            .callback
            .as_ref()
            .map_or(self.deriver.base(), |cb| cb.program_id);

        let prefix = AccountList::new(vec![
            AccountReference::writable_signer(params.requester),
            AccountReference::writable_signer(params.payer),
            AccountReference::writable(execution.address),
            AccountReference::readonly(deployment.address),
            AccountReference::readonly(callback_program),
            AccountReference::readonly(SYSTEM_ACCOUNT),
        ]);
        let (inputs, accounts) = rewrite_inputs(&params.inputs, prefix)?;
        let record = execution_request(params, inputs)?;
        Ok((ChannelInstruction::Execute(record), accounts))
    }

    fn deploy(&self, params: &DeployParams) -> Result<(ChannelInstruction, AccountList)> {
        let deployment_address = self.deriver.deployment_address(&params.image_id)?;
        let accounts = AccountList::new(vec![
            AccountReference::writable_signer(params.deployer),
            AccountReference::writable_signer(params.payer),
            AccountReference::writable(deployment_address.address),
            AccountReference::readonly(SYSTEM_ACCOUNT),
        ]);
        Ok((ChannelInstruction::Deploy(deployment(params)), accounts))
    }

    fn claim(&self, params: &ClaimParams) -> Result<(ChannelInstruction, AccountList)> {
        let execution = self
            .deriver
            .execution_address(&params.requester, &params.execution_id)?;
        let claim_address = self.deriver.execution_claim_address(
            &params.requester,
            &params.execution_id,
            &params.claimer,
        )?;
        let accounts = AccountList::new(vec![
            AccountReference::writable(execution.address),
            AccountReference::readonly(params.requester),
            AccountReference::writable(claim_address.address),
            AccountReference::writable_signer(params.claimer),
            AccountReference::writable_signer(params.payer),
            AccountReference::readonly(SYSTEM_ACCOUNT),
        ]);
        Ok((ChannelInstruction::Claim(claim(params)), accounts))
    }

    fn status(&self, params: &StatusParams) -> Result<(ChannelInstruction, AccountList)> {
        let execution = self
            .deriver
            .execution_address(&params.requester, &params.report.execution_id)?;
        let accounts = AccountList::new(vec![
            AccountReference::writable(params.requester),
            AccountReference::writable(execution.address),
            AccountReference::readonly(params.callback_program.unwrap_or(self.deriver.base())),
            AccountReference::writable_signer(params.prover),
        ]);
        Ok((ChannelInstruction::Status(params.report.clone()), accounts))
    }
}

/// Assemble with the default identity and limits
pub fn assemble(operation: &Operation, extras: &[AccountReference]) -> Result<InstructionDescriptor> {
    Assembler::new().assemble(operation, extras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblerError;
    use crate::operation::ExecutionConfig;
    use channel_spec::{
        AccountRole, Address, Envelope, ExecutionRequest, Input, IxType, StatusReport, StatusType,
        BASE_IDENTITY,
    };

    const REQ: Address = Address([0x21; 32]);
    const SET1: Address = Address([0x51; 32]);

    fn execute_params() -> ExecuteParams {
        ExecuteParams {
            requester: REQ,
            payer: REQ,
            image_id: "abc123".to_string(),
            execution_id: "exec-1".to_string(),
            inputs: vec![Input::public(b"hello".to_vec()), Input::input_set(SET1)],
            tip: 0,
            expiration: 0,
            config: ExecutionConfig {
                input_digest: Some(vec![0u8; 32]),
                ..Default::default()
            },
            callback: None,
        }
    }

    #[test]
    fn test_execute_accounts() {
        let assembler = Assembler::new();
        let descriptor = assembler
            .assemble(&execute_params().into(), &[])
            .unwrap();

        let deriver = assembler.deriver();
        let exec = deriver.execution_address(&REQ, "exec-1").unwrap().address;
        let deploy = deriver.deployment_address("abc123").unwrap().address;
        let addresses: Vec<Address> = descriptor.accounts.iter().map(|a| a.address).collect();
        assert_eq!(
            addresses,
            vec![REQ, REQ, exec, deploy, BASE_IDENTITY, SYSTEM_ACCOUNT, SET1]
        );
        let roles: Vec<AccountRole> = descriptor.accounts.iter().map(|a| a.role).collect();
        assert_eq!(
            roles,
            vec![
                AccountRole::WritableSigner,
                AccountRole::WritableSigner,
                AccountRole::Writable,
                AccountRole::ReadOnly,
                AccountRole::ReadOnly,
                AccountRole::ReadOnly,
                AccountRole::ReadOnly,
            ]
        );
        assert_eq!(descriptor.program_address, BASE_IDENTITY);

        let envelope = Envelope::from_bytes(&descriptor.data).unwrap();
        assert_eq!(envelope.ix_type, IxType::ExecuteV1);
        let request = ExecutionRequest::from_bytes(&envelope.payload).unwrap();
        assert_eq!(request.inputs[0], Input::public(b"hello".to_vec()));
        assert_eq!(request.inputs[1].data, vec![6]);
    }

    #[test]
    fn test_extras_follow_input_sets() {
        let extra = AccountReference::writable(Address([0x77; 32]));
        let descriptor = assemble(&execute_params().into(), &[extra]).unwrap();
        assert_eq!(descriptor.accounts.len(), 8);
        assert_eq!(descriptor.accounts[6].address, SET1);
        assert_eq!(descriptor.accounts[7], extra);
    }

    #[test]
    fn test_too_many_inputs() {
        let config = CodecConfig::new(8, 1 << 20, 2).unwrap();
        let assembler = Assembler::with_deriver(AddressDeriver::new(), config).unwrap();
        let params = ExecuteParams {
            inputs: vec![Input::public(vec![1]); 3],
            ..execute_params()
        };
        assert!(matches!(
            assembler.assemble(&params.into(), &[]),
            Err(AssemblerError::Build(BuildError::TooManyInputs { found: 3, limit: 2 }))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CodecConfig {
            max_inputs: 0,
            ..CodecConfig::DEFAULT
        };
        assert!(matches!(
            Assembler::with_deriver(AddressDeriver::new(), config),
            Err(AssemblerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_status_accounts() {
        let prover = Address([0x99; 32]);
        let params = StatusParams {
            prover,
            requester: REQ,
            callback_program: None,
            report: StatusReport::new("exec-1", StatusType::Failed),
        };
        let assembler = Assembler::new();
        let descriptor = assembler.assemble(&params.into(), &[]).unwrap();
        let exec = assembler
            .deriver()
            .execution_address(&REQ, "exec-1")
            .unwrap()
            .address;
        assert_eq!(
            descriptor.accounts,
            vec![
                AccountReference::writable(REQ),
                AccountReference::writable(exec),
                AccountReference::readonly(BASE_IDENTITY),
                AccountReference::writable_signer(prover),
            ]
        );
        assert_eq!(
            Envelope::from_bytes(&descriptor.data).unwrap().ix_type,
            IxType::StatusV1
        );
    }
}
