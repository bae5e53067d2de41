//! Main disassembler logic

use crate::decoder::{decode, decode_instruction, AccountKind};
use crate::error::Result;
use crate::formatter::{format_instruction, format_state};

/// Disassemble instruction data into text
pub fn disassemble(data: &[u8]) -> Result<String> {
    let instruction = decode_instruction(data)?;

    let mut output = String::new();
    output.push_str("; Prover channel instruction\n");
    output.push_str(&format!("; Data: {} bytes\n", data.len()));
    output.push('\n');
    output.push_str(&format_instruction(&instruction));
    Ok(output)
}

/// Disassemble account contents of a known kind into text
pub fn disassemble_account(kind: AccountKind, bytes: &[u8]) -> Result<String> {
    let state = decode(kind, bytes)?;

    let mut output = String::new();
    output.push_str(&format!("; Account: {kind}\n"));
    output.push_str(&format!("; Data: {} bytes\n", bytes.len()));
    output.push('\n');
    output.push_str(&format_state(&state));
    Ok(output)
}
