//! Record formatting to human-readable text

use crate::decoder::AccountState;
use channel_spec::{
    AccountRecord, Address, ChannelInstruction, Claim, ClaimState, Deployment, ExecutionRequest,
    Input, InputType, StatusReport,
};
use std::fmt::Write;

/// Format decoded account contents
pub fn format_state(state: &AccountState) -> String {
    match state {
        AccountState::ExecutionRequest(request) => format_execution_request(request),
        AccountState::Deployment(deployment) => format_deployment(deployment),
        AccountState::Claim(claim) => format_claim_state(claim),
    }
}

/// Format a decoded instruction
pub fn format_instruction(instruction: &ChannelInstruction) -> String {
    let body = match instruction {
        ChannelInstruction::Execute(request) => format_execution_request(request),
        ChannelInstruction::Status(report) => format_status(report),
        ChannelInstruction::Deploy(deployment) => format_deployment(deployment),
        ChannelInstruction::Claim(claim) => format_claim(claim),
    };
    format!("{}\n{}", instruction.ix_type(), body)
}

pub fn format_execution_request(request: &ExecutionRequest) -> String {
    let mut out = String::new();
    field(&mut out, "execution_id", &request.execution_id);
    field(&mut out, "image_id", &request.image_id);
    field(&mut out, "tip", request.tip);
    field(&mut out, "max_block_height", request.max_block_height);
    field(&mut out, "forward_output", request.forward_output);
    field(&mut out, "verify_input_hash", request.verify_input_hash);
    field(&mut out, "input_digest", optional_bytes(&request.input_digest));
    field(
        &mut out,
        "callback_program_id",
        request
            .callback_program_id
            .as_deref()
            .map_or_else(|| "-".to_string(), format_address_bytes),
    );
    field(
        &mut out,
        "callback_instruction_prefix",
        optional_bytes(&request.callback_instruction_prefix),
    );

    let _ = writeln!(out, "  inputs ({}):", request.inputs.len());
    for (i, input) in request.inputs.iter().enumerate() {
        let _ = writeln!(out, "    [{i}] {}", format_input(input));
    }
    let _ = writeln!(
        out,
        "  callback_extra_accounts ({}):",
        request.callback_extra_accounts.len()
    );
    for (i, account) in request.callback_extra_accounts.iter().enumerate() {
        let _ = writeln!(out, "    [{i}] {}", format_account_record(account));
    }
    out
}

pub fn format_deployment(deployment: &Deployment) -> String {
    let mut out = String::new();
    field(&mut out, "image_id", &deployment.image_id);
    field(&mut out, "program_name", &deployment.program_name);
    field(&mut out, "url", &deployment.url);
    field(&mut out, "size", deployment.size);
    field(&mut out, "owner", deployment.owner);
    let inputs: Vec<String> = deployment.inputs.iter().map(ToString::to_string).collect();
    field(&mut out, "inputs", format!("[{}]", inputs.join(", ")));
    out
}

pub fn format_claim(claim: &Claim) -> String {
    let mut out = String::new();
    field(&mut out, "execution_id", &claim.execution_id);
    field(&mut out, "block_commitment", claim.block_commitment);
    out
}

pub fn format_claim_state(state: &ClaimState) -> String {
    let mut out = String::new();
    field(&mut out, "claimer", state.claimer);
    field(&mut out, "claimed_at", state.claimed_at);
    field(&mut out, "block_commitment", state.block_commitment);
    out
}

pub fn format_status(report: &StatusReport) -> String {
    let mut out = String::new();
    field(&mut out, "execution_id", &report.execution_id);
    field(&mut out, "status", report.status);
    field(&mut out, "exit_code_system", report.exit_code_system);
    field(&mut out, "exit_code_user", report.exit_code_user);
    field(
        &mut out,
        "proof",
        report
            .proof
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| format!("{} bytes", p.len())),
    );
    field(&mut out, "execution_digest", optional_bytes(&report.execution_digest));
    field(&mut out, "input_digest", optional_bytes(&report.input_digest));
    field(&mut out, "committed_outputs", optional_bytes(&report.committed_outputs));
    field(&mut out, "assumption_digest", optional_bytes(&report.assumption_digest));
    out
}

/// One input on one line; InputSet payloads show the account index they hold
pub fn format_input(input: &Input) -> String {
    match (input.input_type, input.data.as_slice()) {
        (InputType::InputSet, [index]) => format!("InputSet -> account #{index}"),
        (InputType::PublicUrl | InputType::PrivateUrl, data) => match std::str::from_utf8(data) {
            Ok(url) => format!("{} {url}", input.input_type),
            Err(_) => format!("{} 0x{}", input.input_type, hex::encode(data)),
        },
        (ty, data) => format!("{ty} 0x{}", hex::encode(data)),
    }
}

fn format_account_record(account: &AccountRecord) -> String {
    let role = if account.writable { "w" } else { "r" };
    format!("{} ({role})", account.address)
}

fn format_address_bytes(bytes: &[u8]) -> String {
    match Address::from_slice(bytes) {
        Some(address) => address.to_string(),
        None => format!("0x{}", hex::encode(bytes)),
    }
}

fn optional_bytes(bytes: &Option<Vec<u8>>) -> String {
    match bytes {
        Some(b) => format!("0x{}", hex::encode(b)),
        None => "-".to_string(),
    }
}

fn field(out: &mut String, name: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {name}: {value}");
}
