// Rollcall CLI - batch roster linking and partitioning

mod artifacts;
mod exit_codes;
mod link;
mod partition;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_MISSING_INPUT};

/// Structured CLI failure carrying its exit code.
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

pub fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError {
        code,
        message: message.into(),
        hint: None,
    }
}

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Record linkage and deduplication for event rosters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link check-in records against a registration roster
    #[command(after_help = "\
Examples:
  rollcall link checkin.link.toml
  rollcall link checkin.link.toml --json
  rollcall link checkin.link.toml --output report.json --out-dir results/")]
    Link {
        /// Path to the .link.toml config file
        config: PathBuf,

        /// Output JSON report to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory for CSV artifacts (default: alongside the config)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip CSV artifacts, produce the report only
        #[arg(long)]
        no_artifacts: bool,
    },

    /// Partition and deduplicate a raw extraction table
    #[command(after_help = "\
Examples:
  rollcall partition extract.partition.toml
  rollcall partition extract.partition.toml --json --out-dir results/")]
    Partition {
        /// Path to the .partition.toml config file
        config: PathBuf,

        /// Output JSON report to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON report to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Directory for CSV artifacts (default: alongside the config)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip CSV artifacts, produce the report only
        #[arg(long)]
        no_artifacts: bool,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  rollcall validate checkin.link.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Link {
            config,
            json,
            output,
            out_dir,
            no_artifacts,
        } => link::cmd_link(config, json, output, out_dir, no_artifacts),
        Commands::Partition {
            config,
            json,
            output,
            out_dir,
            no_artifacts,
        } => partition::cmd_partition(config, json, output, out_dir, no_artifacts),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = &e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

/// Read a config file to a string, mapping the failure to the
/// missing-input exit code with the path in the message.
pub fn read_config(path: &std::path::Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| cli_err(EXIT_MISSING_INPUT, format!("cannot read {}: {e}", path.display())))
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = read_config(&config_path)?;

    match rollcall_engine::config_kind(&config_str).as_str() {
        "link" => {
            let config = rollcall_engine::LinkConfig::from_toml(&config_str)
                .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;
            eprintln!(
                "valid: link '{}' ({} -> {}, {} filter rule(s))",
                config.name,
                config.input.file,
                config.reference.file,
                config.filter.len(),
            );
            Ok(())
        }
        "partition" => {
            let config = rollcall_engine::PartitionConfig::from_toml(&config_str)
                .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;
            eprintln!(
                "valid: partition '{}' ({} partition(s))",
                config.name,
                config.partition_names().len(),
            );
            Ok(())
        }
        other => Err(cli_err(
            EXIT_INVALID_CONFIG,
            format!("unknown config kind: \"{other}\" (expected \"link\" or \"partition\")"),
        )),
    }
}
