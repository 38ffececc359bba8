//! # mfst CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mfst_cli::check::{run_check, CheckArgs};
use mfst_cli::hints::{run_hints, HintsArgs};
use mfst_cli::schema::{run_schema, SchemaArgs};

/// Deployment manifest toolchain.
///
/// Prints the manifest schema, lists completion suggestions, and checks
/// manifest files for structural and value errors.
#[derive(Parser, Debug)]
#[command(name = "mfst", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a hint configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the manifest type graph.
    Schema(SchemaArgs),

    /// List completion suggestions for a type.
    Hints(HintsArgs),

    /// Check a manifest file against the schema.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mfst starting");

    let result = mfst_cli::load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Schema(args) => run_schema(args, &config),
        Commands::Hints(args) => run_hints(args, &config),
        Commands::Check(args) => run_check(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_schema() {
        let cli = Cli::try_parse_from(["mfst", "schema"]).unwrap();
        if let Commands::Schema(args) = cli.command {
            assert!(!args.json);
        } else {
            panic!("expected schema");
        }
    }

    #[test]
    fn cli_parse_schema_json() {
        let cli = Cli::try_parse_from(["mfst", "schema", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema(SchemaArgs { json: true })));
    }

    #[test]
    fn cli_parse_hints_with_spaces() {
        let cli = Cli::try_parse_from(["mfst", "hints", "Health Check Type"]).unwrap();
        if let Commands::Hints(args) = cli.command {
            assert_eq!(args.type_name, "Health Check Type");
        } else {
            panic!("expected hints");
        }
    }

    #[test]
    fn cli_parse_hints_requires_type() {
        assert!(Cli::try_parse_from(["mfst", "hints"]).is_err());
    }

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from(["mfst", "check", "manifest.yml", "--json"]).unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("manifest.yml"));
            assert!(args.json);
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_global_config() {
        let cli = Cli::try_parse_from(["mfst", "check", "m.yml", "--config", "hints.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("hints.yml")));
    }

    #[test]
    fn cli_parse_verbosity() {
        let cli0 = Cli::try_parse_from(["mfst", "schema"]).unwrap();
        assert_eq!(cli0.verbose, 0);
        let cli2 = Cli::try_parse_from(["mfst", "-vv", "schema"]).unwrap();
        assert_eq!(cli2.verbose, 2);
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["mfst"]).is_err());
    }
}
