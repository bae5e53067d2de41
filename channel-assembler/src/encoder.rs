//! Operation parameters to wire records

use crate::operation::{ClaimParams, DeployParams, ExecuteParams};
use channel_spec::{BuildError, ChannelInstruction, Claim, Deployment, ExecutionRequest, Input};

/// Execution request record; `inputs` are the already rewritten inputs
pub fn execution_request(
    params: &ExecuteParams,
    inputs: Vec<Input>,
) -> Result<ExecutionRequest, BuildError> {
    params.config.validate()?;
    let callback = params.callback.as_ref();
    Ok(ExecutionRequest {
        tip: params.tip,
        execution_id: params.execution_id.clone(),
        image_id: params.image_id.clone(),
        callback_program_id: callback.map(|cb| cb.program_id.to_bytes().to_vec()),
        callback_instruction_prefix: callback.map(|cb| cb.instruction_prefix.clone()),
        forward_output: params.config.forward_output,
        verify_input_hash: params.config.verify_input_hash,
        inputs,
        input_digest: params.config.input_digest.clone(),
        max_block_height: params.expiration,
        callback_extra_accounts: callback.map(|cb| cb.account_records()).unwrap_or_default(),
    })
}

pub fn deployment(params: &DeployParams) -> Deployment {
    Deployment {
        url: params.url.clone(),
        size: params.size,
        image_id: params.image_id.clone(),
        program_name: params.program_name.clone(),
        inputs: params.inputs.clone(),
        owner: params.owner,
    }
}

pub fn claim(params: &ClaimParams) -> Claim {
    Claim {
        execution_id: params.execution_id.clone(),
        block_commitment: params.block_commitment,
    }
}

/// Serialize the record and wrap it in the envelope
pub fn encode(instruction: &ChannelInstruction) -> Result<Vec<u8>, BuildError> {
    instruction.to_bytes()
}
