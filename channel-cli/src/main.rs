//! # channel
//!
//! Command line front-end for the prover channel codec: derive program
//! addresses, assemble instructions, and decode account or instruction bytes.
//! Prints to stdout; never touches the network.

mod commands;
mod manifest;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use manifest::InputEntry;

/// Prover channel wire codec
#[derive(Parser, Debug)]
#[command(name = "channel", version, about)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive a program-owned account address
    Derive(DeriveArgs),
    /// Assemble a deploy instruction
    Deploy(DeployArgs),
    /// Assemble an execute instruction
    Execute(ExecuteArgs),
    /// Assemble a claim instruction
    Claim(ClaimArgs),
    /// Assemble a status instruction
    Status(StatusArgs),
    /// Decode hex account data of a given kind
    Decode(DecodeArgs),
    /// Decode hex instruction data
    Inspect(InspectArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Hex,
    Text,
}

#[derive(Args, Debug)]
struct DeriveArgs {
    /// Program identity to derive under (default: the channel program)
    #[arg(long)]
    base: Option<String>,

    #[command(subcommand)]
    target: DeriveTarget,
}

#[derive(Subcommand, Debug)]
enum DeriveTarget {
    /// Address holding an execution request
    Execution {
        #[arg(long)]
        requester: String,
        #[arg(long)]
        execution_id: String,
    },
    /// Address holding a deployment record
    Deployment {
        #[arg(long)]
        image_id: String,
    },
    /// Address holding a prover's claim on an execution
    Claim {
        #[arg(long)]
        requester: String,
        #[arg(long)]
        execution_id: String,
        #[arg(long)]
        claimer: String,
    },
}

#[derive(Args, Debug)]
struct DeployArgs {
    /// JSON manifest with the deployment fields
    #[arg(long)]
    manifest: Option<PathBuf>,
    #[arg(long)]
    deployer: Option<String>,
    /// Fee payer (default: deployer)
    #[arg(long)]
    payer: Option<String>,
    #[arg(long)]
    image_id: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    size: Option<u64>,
    #[arg(long)]
    program_name: Option<String>,
    /// Declared input kind (public|private), repeatable
    #[arg(long = "input")]
    inputs: Vec<String>,
    /// Program owner (default: deployer)
    #[arg(long)]
    owner: Option<String>,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ExecuteArgs {
    /// JSON manifest with the execution fields
    #[arg(long)]
    manifest: Option<PathBuf>,
    #[arg(long)]
    requester: Option<String>,
    /// Fee payer (default: requester)
    #[arg(long)]
    payer: Option<String>,
    #[arg(long)]
    image_id: Option<String>,
    #[arg(long)]
    execution_id: Option<String>,
    /// Input as TYPE:VALUE, repeatable
    #[arg(long = "input")]
    inputs: Vec<InputEntry>,
    #[arg(long)]
    tip: Option<u64>,
    /// Last block at which the request may be fulfilled
    #[arg(long)]
    expiration: Option<u64>,
    /// Skip input digest verification
    #[arg(long)]
    no_verify_input_hash: bool,
    /// 32-byte input digest, hex
    #[arg(long)]
    input_digest: Option<String>,
    #[arg(long)]
    forward_output: bool,
    #[arg(long)]
    callback_program: Option<String>,
    /// Callback instruction prefix, hex
    #[arg(long)]
    callback_prefix: Option<String>,
    /// Callback account as ADDRESS[:r|w|ws], repeatable
    #[arg(long = "callback-account")]
    callback_accounts: Vec<String>,
    /// Extra account as ADDRESS[:r|w|ws], repeatable
    #[arg(long = "extra")]
    extras: Vec<String>,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ClaimArgs {
    #[arg(long)]
    claimer: String,
    /// Fee payer (default: claimer)
    #[arg(long)]
    payer: Option<String>,
    #[arg(long)]
    requester: String,
    #[arg(long)]
    execution_id: String,
    #[arg(long)]
    block_commitment: u64,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// JSON status report (camelCase, hex bytes)
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long)]
    prover: String,
    #[arg(long)]
    requester: String,
    /// Callback program recorded in the request
    #[arg(long)]
    callback_program: Option<String>,
    #[arg(long)]
    execution_id: Option<String>,
    /// completed|failed
    #[arg(long)]
    status: Option<String>,
    /// 256-byte proof, hex
    #[arg(long)]
    proof: Option<String>,
    #[arg(long)]
    execution_digest: Option<String>,
    #[arg(long)]
    input_digest: Option<String>,
    #[arg(long)]
    committed_outputs: Option<String>,
    #[arg(long)]
    assumption_digest: Option<String>,
    #[arg(long)]
    exit_code_system: Option<u32>,
    #[arg(long)]
    exit_code_user: Option<u32>,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// execution-request|deployment|claim
    kind: String,
    /// Account data, hex
    data: String,
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Instruction data, hex
    data: String,
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match cli.command {
        Command::Derive(args) => commands::derive(args)?,
        Command::Deploy(args) => commands::deploy(args)?,
        Command::Execute(args) => commands::execute(args)?,
        Command::Claim(args) => commands::claim(args)?,
        Command::Status(args) => commands::status(args)?,
        Command::Decode(args) => commands::decode(args)?,
        Command::Inspect(args) => commands::inspect(args)?,
    };
    println!("{output}");
    Ok(())
}
