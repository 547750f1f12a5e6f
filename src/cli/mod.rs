//! CLI module for the QAPI command generator
//!
//! This module provides the command-line interface for the generator.
//!
//! ## Commands
//!
//! - `commands <schema>` - Generate command units into an output directory
//! - `emit <schema>` - Print the generated units to stdout
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::backend::{CondMismatchPolicy, GeneratorConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic through miette, keeping its code and help text.
    pub fn diagnostic<D>(diagnostic: D) -> Self
    where
        D: miette::Diagnostic + Send + Sync + 'static,
    {
        Self::failure(format!("{:?}", miette::Report::new(diagnostic)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable consulted when `--prefix` is not given.
pub const PREFIX_ENV: &str = "QAPIGEN_PREFIX";

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Generate client-side QAPI command marshallers
#[derive(Parser, Debug)]
#[command(name = "qapigen")]
#[command(version = VERSION)]
#[command(about = "Generate client-side QAPI command marshallers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate `.h`/`.c` command units for every module of a schema
    Commands {
        /// Resolved schema descriptor document (JSON)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
        /// Output directory
        #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
        /// Prefix for generated unit names (falls back to $QAPIGEN_PREFIX)
        #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
        prefix: Option<String>,
        /// Fail when a command's condition does not cover a referenced type's condition
        #[arg(long = "deny-cond-mismatch")]
        deny_cond_mismatch: bool,
    },

    /// Print generated units to stdout
    Emit {
        /// Resolved schema descriptor document (JSON)
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
        /// Only print the unit of this module
        #[arg(long = "module", value_name = "NAME")]
        module: Option<String>,
        /// Prefix for generated unit names (falls back to $QAPIGEN_PREFIX)
        #[arg(short = 'p', long = "prefix", value_name = "PREFIX")]
        prefix: Option<String>,
    },
}

/// Build the generator configuration from flags and the environment.
pub fn generator_config(prefix: Option<String>, deny_cond_mismatch: bool) -> GeneratorConfig {
    let prefix = prefix.or_else(|| env::var(PREFIX_ENV).ok()).unwrap_or_default();
    let policy = if deny_cond_mismatch {
        CondMismatchPolicy::Deny
    } else {
        CondMismatchPolicy::Warn
    };
    GeneratorConfig::new().with_prefix(prefix).with_cond_mismatch(policy)
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Commands {
            schema,
            output_dir,
            prefix,
            deny_cond_mismatch,
        } => {
            let config = generator_config(prefix, deny_cond_mismatch);
            commands::generate(&schema, &output_dir, &config)
        }
        Command::Emit { schema, module, prefix } => {
            let config = generator_config(prefix, false);
            commands::emit(&schema, module.as_deref(), &config)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_commands() {
        let cli = Cli::try_parse_from(["qapigen", "commands", "schema.json", "-o", "out", "-p", "utm-"]).unwrap();
        if let Command::Commands {
            schema,
            output_dir,
            prefix,
            deny_cond_mismatch,
        } = cli.command
        {
            assert_eq!(schema, PathBuf::from("schema.json"));
            assert_eq!(output_dir, PathBuf::from("out"));
            assert_eq!(prefix.as_deref(), Some("utm-"));
            assert!(!deny_cond_mismatch);
        } else {
            panic!("Expected Commands command");
        }
    }

    #[test]
    fn test_cli_parse_commands_defaults() {
        let cli = Cli::try_parse_from(["qapigen", "commands", "schema.json", "--deny-cond-mismatch"]).unwrap();
        if let Command::Commands {
            output_dir,
            prefix,
            deny_cond_mismatch,
            ..
        } = cli.command
        {
            assert_eq!(output_dir, PathBuf::from("."));
            assert!(prefix.is_none());
            assert!(deny_cond_mismatch);
        } else {
            panic!("Expected Commands command");
        }
    }

    #[test]
    fn test_cli_parse_emit() {
        let cli = Cli::try_parse_from(["qapigen", "emit", "schema.json", "--module", "qapi/block.json"]).unwrap();
        if let Command::Emit { module, .. } = cli.command {
            assert_eq!(module.as_deref(), Some("qapi/block.json"));
        } else {
            panic!("Expected Emit command");
        }
    }

    #[test]
    fn test_cli_requires_schema() {
        assert!(Cli::try_parse_from(["qapigen", "commands"]).is_err());
        assert!(Cli::try_parse_from(["qapigen"]).is_err());
    }

    #[test]
    fn test_explicit_prefix_and_policy() {
        let config = generator_config(Some("utm-".to_string()), true);
        assert_eq!(config.prefix, "utm-");
        assert_eq!(config.cond_mismatch, CondMismatchPolicy::Deny);
    }
}
