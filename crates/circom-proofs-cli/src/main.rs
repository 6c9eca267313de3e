//! circom-proofs CLI: prove, verify and witness-check Circom circuits.
//!
//! `example`, `prove` and `verify` drive the Groth16 artifact lifecycle
//! through snarkjs; `check` runs the witness-level batteries through circom.
//! `status` and `circuits` are read-only helpers.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};

use circom_proofs_core::circuits::MERKLE_PROOF;
use circom_proofs_core::config::{Layout, PipelineConfig};

#[derive(Parser, Debug)]
#[command(
    name = "circom-proofs",
    about = "Generate and verify Groth16 proofs for the merkle-proof and tally-proof circuits",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Root directory holding compiled artifacts
    #[arg(long, global = true, default_value = "build")]
    build_dir: PathBuf,

    /// Keep every artifact directly under the build directory
    #[arg(long, global = true)]
    flat: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prove and verify a circuit's built-in example input
    Example {
        /// Circuit to run
        #[arg(long, default_value = MERKLE_PROOF.name)]
        circuit: String,
    },

    /// Generate a proof from an input JSON file
    Prove {
        /// Circuit name (artifact basename)
        circuit: String,

        /// Path to input JSON file
        input: PathBuf,
    },

    /// Verify the persisted proof of a circuit
    Verify {
        /// Circuit name (artifact basename)
        circuit: String,
    },

    /// Run the witness-level scenario batteries
    Check {
        /// Limit the run to these circuits (repeatable; default: all)
        #[arg(long)]
        circuit: Vec<String>,

        /// Run every scenario instead of stopping at the first failure
        #[arg(long)]
        keep_going: bool,

        /// Directory holding the .circom sources
        #[arg(long, default_value = "src")]
        circuits_dir: PathBuf,

        /// Extra circom library path (repeatable), e.g. node_modules
        #[arg(long, short = 'l')]
        include: Vec<PathBuf>,
    },

    /// Show the resolved artifact paths of a circuit
    Status {
        /// Circuit name (artifact basename)
        circuit: String,
    },

    /// List the known circuits and their input fields
    Circuits,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        let layout = if self.flat { Layout::Flat } else { Layout::Nested };
        PipelineConfig::default()
            .with_build_root(self.build_dir.clone())
            .with_layout(layout)
    }
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .init();

    let Some(command) = &cli.command else {
        // Bare invocation is a usage request, not a failure.
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    let config = cli.pipeline_config();
    tracing::debug!(
        "build root: {} ({} layout)",
        config.build_root.display(),
        config.layout.as_str()
    );
    let result = match command {
        Commands::Example { circuit } => commands::example::run(&config, circuit).await,
        Commands::Prove { circuit, input } => commands::prove::run(&config, circuit, input).await,
        Commands::Verify { circuit } => commands::verify::run(&config, circuit).await,
        Commands::Check {
            circuit,
            keep_going,
            circuits_dir,
            include,
        } => {
            let config = config.with_circuits_dir(circuits_dir.clone());
            commands::check::run(&config, circuit, *keep_going, include).await
        }
        Commands::Status { circuit } => commands::status::run(&config, circuit),
        Commands::Circuits => commands::circuits::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
