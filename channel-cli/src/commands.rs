//! Subcommand handlers. Each returns the text to print.

use anyhow::{anyhow, bail, Context, Result};
use channel_assembler::{
    assemble, CallbackConfig, ClaimParams, DeployParams, ExecuteParams, ExecutionConfig,
    InstructionDescriptor, Operation, StatusParams,
};
use channel_disassembler::{decode as decode_account, decode_instruction, disassemble, format_state, AccountKind};
use channel_spec::{AddressDeriver, AddressKind, ExitCode, StatusReport, StatusType};
use serde::Serialize;

use crate::manifest::{
    self, parse_account, parse_address, parse_hex, parse_program_input, DeployManifest,
    ExecuteManifest,
};
use crate::{
    ClaimArgs, DecodeArgs, DeployArgs, DeriveArgs, DeriveTarget, ExecuteArgs, InspectArgs,
    OutputFormat, StatusArgs,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DerivedView {
    kind: String,
    address: String,
    bump: u8,
}

pub fn derive(args: DeriveArgs) -> Result<String> {
    let deriver = match &args.base {
        Some(base) => AddressDeriver::with_base(parse_address(base)?),
        None => AddressDeriver::new(),
    };

    let (kind, derived) = match &args.target {
        DeriveTarget::Execution {
            requester,
            execution_id,
        } => (
            AddressKind::Execution,
            deriver.execution_address(&parse_address(requester)?, execution_id)?,
        ),
        DeriveTarget::Deployment { image_id } => {
            (AddressKind::Deployment, deriver.deployment_address(image_id)?)
        }
        DeriveTarget::Claim {
            requester,
            execution_id,
            claimer,
        } => (
            AddressKind::ExecutionClaim,
            deriver.execution_claim_address(
                &parse_address(requester)?,
                execution_id,
                &parse_address(claimer)?,
            )?,
        ),
    };

    let view = DerivedView {
        kind: kind.to_string(),
        address: derived.address.to_string(),
        bump: derived.bump,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn deploy(args: DeployArgs) -> Result<String> {
    let manifest: DeployManifest = match &args.manifest {
        Some(path) => manifest::load(path)?,
        None => DeployManifest::default(),
    };

    let deployer = match &args.deployer {
        Some(s) => parse_address(s)?,
        None => manifest.deployer.context("missing --deployer")?,
    };
    let payer = match &args.payer {
        Some(s) => parse_address(s)?,
        None => manifest.payer.unwrap_or(deployer),
    };
    let owner = match &args.owner {
        Some(s) => parse_address(s)?,
        None => manifest.owner.unwrap_or(deployer),
    };
    let inputs = if args.inputs.is_empty() {
        manifest.inputs
    } else {
        args.inputs
            .iter()
            .map(|s| parse_program_input(s))
            .collect::<Result<Vec<_>>>()?
    };

    let params = DeployParams {
        deployer,
        payer,
        image_id: args
            .image_id
            .or(manifest.image_id)
            .context("missing --image-id")?,
        url: args.url.or(manifest.url).context("missing --url")?,
        size: args.size.or(manifest.size).context("missing --size")?,
        program_name: args.program_name.or(manifest.program_name).unwrap_or_default(),
        inputs,
        owner,
    };
    render(&assemble(&Operation::Deploy(params), &[])?, args.format)
}

pub fn execute(args: ExecuteArgs) -> Result<String> {
    let manifest: ExecuteManifest = match &args.manifest {
        Some(path) => manifest::load(path)?,
        None => ExecuteManifest::default(),
    };

    let requester = match &args.requester {
        Some(s) => parse_address(s)?,
        None => manifest.requester.context("missing --requester")?,
    };
    let payer = match &args.payer {
        Some(s) => parse_address(s)?,
        None => manifest.payer.unwrap_or(requester),
    };

    let entries = if args.inputs.is_empty() {
        &manifest.inputs
    } else {
        &args.inputs
    };
    let inputs = entries
        .iter()
        .map(|entry| entry.to_input())
        .collect::<Result<Vec<_>>>()?;

    let input_digest = match &args.input_digest {
        Some(s) => Some(parse_hex(s)?),
        None => manifest.input_digest,
    };
    let config = ExecutionConfig {
        verify_input_hash: !args.no_verify_input_hash && manifest.verify_input_hash.unwrap_or(true),
        input_digest,
        forward_output: args.forward_output || manifest.forward_output.unwrap_or(false),
    };

    let callback = match &args.callback_program {
        Some(program) => Some(CallbackConfig {
            program_id: parse_address(program)?,
            instruction_prefix: args
                .callback_prefix
                .as_deref()
                .map(parse_hex)
                .transpose()?
                .unwrap_or_default(),
            extra_accounts: args
                .callback_accounts
                .iter()
                .map(|s| parse_account(s))
                .collect::<Result<Vec<_>>>()?,
        }),
        None => manifest.callback.map(CallbackConfig::from),
    };

    let extras = if args.extras.is_empty() {
        manifest.extra_accounts
    } else {
        args.extras
            .iter()
            .map(|s| parse_account(s))
            .collect::<Result<Vec<_>>>()?
    };

    let params = ExecuteParams {
        requester,
        payer,
        image_id: args
            .image_id
            .or(manifest.image_id)
            .context("missing --image-id")?,
        execution_id: args
            .execution_id
            .or(manifest.execution_id)
            .context("missing --execution-id")?,
        inputs,
        tip: args.tip.or(manifest.tip).unwrap_or(0),
        expiration: args.expiration.or(manifest.expiration).unwrap_or(0),
        config,
        callback,
    };
    render(&assemble(&Operation::Execute(params), &extras)?, args.format)
}

pub fn claim(args: ClaimArgs) -> Result<String> {
    let claimer = parse_address(&args.claimer)?;
    let params = ClaimParams {
        claimer,
        payer: args
            .payer
            .as_deref()
            .map(parse_address)
            .transpose()?
            .unwrap_or(claimer),
        requester: parse_address(&args.requester)?,
        execution_id: args.execution_id,
        block_commitment: args.block_commitment,
    };
    render(&assemble(&Operation::Claim(params), &[])?, args.format)
}

pub fn status(args: StatusArgs) -> Result<String> {
    let mut report: StatusReport = match &args.report {
        Some(path) => manifest::load(path)?,
        None => {
            let id = args
                .execution_id
                .clone()
                .context("missing --execution-id or --report")?;
            StatusReport::new(id, StatusType::Unknown)
        }
    };

    if let Some(id) = args.execution_id {
        report.execution_id = id;
    }
    if let Some(status) = &args.status {
        report.status = parse_status(status)?;
    }
    if let Some(code) = args.exit_code_system {
        report.exit_code_system = ExitCode::from_u32(code);
    }
    if let Some(code) = args.exit_code_user {
        report.exit_code_user = ExitCode::from_u32(code);
    }
    let bytes = |field: &Option<String>| field.as_deref().map(parse_hex).transpose();
    if let Some(proof) = bytes(&args.proof)? {
        report.proof = Some(proof);
    }
    if let Some(digest) = bytes(&args.execution_digest)? {
        report.execution_digest = Some(digest);
    }
    if let Some(digest) = bytes(&args.input_digest)? {
        report.input_digest = Some(digest);
    }
    if let Some(outputs) = bytes(&args.committed_outputs)? {
        report.committed_outputs = Some(outputs);
    }
    if let Some(digest) = bytes(&args.assumption_digest)? {
        report.assumption_digest = Some(digest);
    }

    let params = StatusParams {
        prover: parse_address(&args.prover)?,
        requester: parse_address(&args.requester)?,
        callback_program: args
            .callback_program
            .as_deref()
            .map(parse_address)
            .transpose()?,
        report,
    };
    render(&assemble(&Operation::Status(params), &[])?, args.format)
}

pub fn decode(args: DecodeArgs) -> Result<String> {
    let kind: AccountKind = args.kind.parse()?;
    let bytes = parse_hex(&args.data)?;
    let state = decode_account(kind, &bytes)?;
    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&state)?),
        OutputFormat::Text => Ok(format_state(&state)),
        OutputFormat::Hex => bail!("hex output is not available for decode"),
    }
}

pub fn inspect(args: InspectArgs) -> Result<String> {
    let bytes = parse_hex(&args.data)?;
    match args.format {
        OutputFormat::Text => Ok(disassemble(&bytes)?),
        OutputFormat::Json => {
            let instruction = decode_instruction(&bytes)?;
            Ok(serde_json::to_string_pretty(&instruction)?)
        }
        OutputFormat::Hex => bail!("hex output is not available for inspect"),
    }
}

fn parse_status(s: &str) -> Result<StatusType> {
    match s.to_ascii_lowercase().as_str() {
        "unknown" => Ok(StatusType::Unknown),
        "completed" => Ok(StatusType::Completed),
        "failed" => Ok(StatusType::Failed),
        other => Err(anyhow!("unknown status `{other}` (expected completed or failed)")),
    }
}

fn render(instruction: &InstructionDescriptor, format: OutputFormat) -> Result<String> {
    tracing::debug!(
        accounts = instruction.accounts.len(),
        data_len = instruction.data.len(),
        "rendering instruction"
    );
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(instruction)?),
        OutputFormat::Hex => Ok(hex::encode(&instruction.data)),
        OutputFormat::Text => {
            let mut out = format!("program: {}\n", instruction.program_address);
            for (i, account) in instruction.accounts.iter().enumerate() {
                out.push_str(&format!("account[{i}]: {account}\n"));
            }
            out.push_str(&disassemble(&instruction.data)?);
            Ok(out)
        }
    }
}
