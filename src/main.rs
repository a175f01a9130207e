//! Binary entry point for httplog.
//!
//! Offline tooling around the library: mask payloads, render recorded
//! exchanges and inspect configuration.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use httplog::cli::{Exchange, MaskKind, mask_text, render_exchange, show_config};
use httplog::observability::{self, LoggingConfig};
use httplog::{HttpLogFormatter, HttpLoggingConfig, IdGenerator};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// httplog - single-block HTTP logging with masking of sensitive values.
#[derive(Parser)]
#[command(name = "httplog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "HTTPLOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Mask a payload read from a file or stdin.
    Mask {
        /// Grammar of the payload.
        #[arg(value_enum)]
        kind: MaskKind,

        /// Field to mask; repeat for several.
        #[arg(short, long = "field", required = true)]
        fields: Vec<String>,

        /// Input file (stdin when omitted).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Replacement marker.
        #[arg(short, long, default_value = httplog::DEFAULT_MARKER)]
        marker: String,
    },

    /// Render the log blocks of a recorded exchange.
    Render {
        /// JSON file describing the exchange.
        #[arg(short, long)]
        exchange: PathBuf,

        /// Also write the blocks through the logger at the configured level.
        #[arg(long)]
        emit: bool,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print a fresh correlation ID.
    Id,
}

/// Config subcommands.
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = observability::init(LoggingConfig::from_env(cli.verbose)) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration from `path` or the default locations, then applies
/// environment overrides.
fn load_config(path: Option<&Path>) -> Result<HttpLoggingConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => HttpLoggingConfig::load_from_file(path)?,
        None => HttpLoggingConfig::load_default(),
    };
    Ok(config.with_env_overrides()?)
}

/// Runs the selected command.
fn run_command(
    command: Commands,
    config: HttpLoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Mask {
            kind,
            fields,
            input,
            marker,
        } => cmd_mask(kind, fields, input, marker),
        Commands::Render { exchange, emit } => cmd_render(config, exchange, emit),
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config),
        Commands::Id => {
            println!("{}", IdGenerator::new().next_id());
            Ok(())
        },
    }
}

fn cmd_mask(
    kind: MaskKind,
    fields: Vec<String>,
    input: Option<PathBuf>,
    marker: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        },
    };
    print!("{}", mask_text(kind, &fields, &marker, &text)?);
    Ok(())
}

fn cmd_render(
    config: HttpLoggingConfig,
    path: PathBuf,
    emit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let exchange = Exchange::load(&path)?;
    let name = exchange.name.clone().unwrap_or_else(|| "httplog".to_string());
    let formatter = HttpLogFormatter::new(name, Arc::new(config))?;

    let blocks = render_exchange(&formatter, &exchange, &IdGenerator::new(), emit);
    if !emit {
        for block in blocks {
            println!("{block}");
        }
    }
    Ok(())
}

fn cmd_config_show(config: &HttpLoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", show_config(config)?);
    Ok(())
}
