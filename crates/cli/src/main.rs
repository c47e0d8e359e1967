// RosterMatch CLI - headless employee roster reconciliation

mod exit_codes;
mod reconcile;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

// Re-export exit codes from registry (single source of truth)
use exit_codes::{
    EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE,
    EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_NO_INDEX, EXIT_UNMATCHED,
};

#[derive(Parser)]
#[command(name = "rmatch")]
#[command(about = "Reconcile employee rosters against a lookup of known IDs")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation: match every source row against the lookup
    #[command(after_help = "\
The report CSV is always written: to --output, or to a timestamped file
named from [output].prefix (or the config name) when --output is omitted.

Examples:
  rmatch run roster.toml
  rmatch run roster.toml --threshold 90
  rmatch run roster.toml -o report.csv --unmatched leftovers.csv
  rmatch run roster.toml -o - | head -5
  rmatch run roster.toml -o report.csv --json | jq .stats
  rmatch run roster.toml --fail-on-unmatched")]
    Run {
        /// Reconciliation config (TOML)
        config: PathBuf,

        /// Override the config threshold (percent; clamped to 60-100)
        #[arg(long, env = "RMATCH_THRESHOLD")]
        threshold: Option<i64>,

        /// Report file (- for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Also write the "No match found" rows to this file (same schema)
        #[arg(long)]
        unmatched: Option<PathBuf>,

        /// Print the full match result as pretty JSON to stdout
        #[arg(long)]
        json: bool,

        /// Exit nonzero when any row has no match
        #[arg(long)]
        fail_on_unmatched: bool,
    },

    /// Parse and validate a config without touching any CSV
    #[command(after_help = "\
Examples:
  rmatch validate roster.toml")]
    Validate {
        /// Reconciliation config (TOML)
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: rmatch <command> [options]");
            eprintln!("       rmatch --help for more information");
            Ok(())
        }
        Some(Commands::Run {
            config,
            threshold,
            output,
            unmatched,
            json,
            fail_on_unmatched,
        }) => reconcile::cmd_run(config, threshold, output, unmatched, json, fail_on_unmatched),
        Some(Commands::Validate { config }) => reconcile::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    pub fn no_index(msg: impl Into<String>) -> Self {
        Self { code: EXIT_NO_INDEX, message: msg.into(), hint: None }
    }

    pub fn unmatched(msg: impl Into<String>) -> Self {
        Self { code: EXIT_UNMATCHED, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
