//! # sgov CLI entry point
//!
//! Parses command-line arguments, initialises tracing, locates the
//! governed root, and dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sgov_cli::check::{run_check, Scope, StyleArgs};
use sgov_cli::resolve::{run_resolve, ResolveArgs};
use sgov_cli::{load_harness, resolve_repo_root, OutputFormat, EXIT_ERROR};

/// Schema governance checks.
///
/// Validates positive and negative examples against the schemas that own
/// them, checks every schema against its meta-schema and the house style
/// guide, and audits example coverage.
#[derive(Parser, Debug)]
#[command(name = "sgov", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file. Defaults to `<root>/sgov.yaml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Governed root. Defaults to the nearest ancestor with a `schemas/` directory.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every check.
    Check,

    /// Validate positive and negative examples against their schemas.
    Examples,

    /// Check every schema against its JSON Schema meta-schema.
    Meta,

    /// Check schemas against the style guide.
    Style(StyleArgs),

    /// Report schemas without negative (or positive) examples.
    Coverage,

    /// Print the schema that owns an example.
    Resolve(ResolveArgs),
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

    let root = cli.root.clone().unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        resolve_repo_root(&cwd).unwrap_or_else(|| {
            tracing::warn!("Could not locate a directory with schemas/; using current directory");
            cwd
        })
    });

    tracing::debug!(root = %root.display(), "resolved governed root");

    match run(cli, root) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli, root: PathBuf) -> anyhow::Result<u8> {
    let harness = load_harness(&root, cli.config.as_deref())?;
    let mut out = std::io::stdout().lock();

    let scope = match cli.command {
        Commands::Resolve(args) => return run_resolve(&harness, &args, cli.format, &mut out),
        Commands::Check => Scope::All,
        Commands::Examples => Scope::Examples,
        Commands::Meta => Scope::Meta,
        Commands::Style(args) => args.scope()?,
        Commands::Coverage => Scope::Coverage,
    };
    run_check(&harness, &scope, cli.format, &mut out)
}
