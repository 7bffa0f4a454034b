//! # arb CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arb_cli::check::{run_check, CheckArgs};
use arb_cli::compile::{run_compile, CompileArgs};
use arb_cli::load_options;

/// arraybuilder schema compiler.
///
/// Compiles declarative type schemas into class descriptors with typed
/// accessor contracts, and checks them against the runtime linker.
#[derive(Parser, Debug)]
#[command(name = "arb", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML compile-options file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a schema and emit class manifests.
    Compile(CompileArgs),

    /// Compile and link a schema, reporting the first error.
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

    let result = load_options(cli.config.as_deref()).and_then(|options| match &cli.command {
        Commands::Compile(args) => run_compile(args, options),
        Commands::Check(args) => run_check(args, options),
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
    fn cli_parse_compile() {
        let cli = Cli::try_parse_from(["arb", "compile", "query.json"]).unwrap();
        match cli.command {
            Commands::Compile(args) => {
                assert_eq!(args.schema, PathBuf::from("query.json"));
                assert!(!args.docs);
                assert!(args.out_dir.is_none());
            }
            other => panic!("expected compile, got {other:?}"),
        }
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_parse_compile_with_flags() {
        let cli = Cli::try_parse_from([
            "arb",
            "compile",
            "query.yaml",
            "--docs",
            "--out-dir",
            "build",
        ])
        .unwrap();
        if let Commands::Compile(args) = cli.command {
            assert!(args.docs);
            assert_eq!(args.out_dir, Some(PathBuf::from("build")));
        } else {
            panic!("expected compile");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["arb", "check", "q.json", "-vv", "--config", "arb.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("arb.yaml")));
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["arb"]).is_err());
    }

    #[test]
    fn cli_check_requires_schema() {
        assert!(Cli::try_parse_from(["arb", "check"]).is_err());
    }
}
