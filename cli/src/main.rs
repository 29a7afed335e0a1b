//! relsql CLI - Main entry point

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

use relsql_cli::config::Config;
use relsql_cli::error::CliError;
use relsql_core::CompileOptions;

/// relsql - relational filter-to-SQL compiler
#[derive(Parser, Debug)]
#[command(name = "relsql")]
#[command(author, version, about = "Compile LoopBack filters into MySQL", long_about = None)]
struct Cli {
    /// Path to config file (default: $RELSQL_CONFIG or relsql.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail on unknown properties and relations instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SELECT statement for a filter
    Select {
        /// Root model name
        model: String,

        /// Filter JSON, or @file
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print the COUNT statement for a where clause
    Count {
        /// Root model name
        model: String,

        /// Where JSON, or @file
        #[arg(short, long = "where")]
        r#where: Option<String>,
    },

    /// Validate configuration and model metadata
    Check,

    /// List models, relations and join shapes
    Models,

    /// Run a filter against a SQLite database and print the rows
    #[cfg(feature = "rusqlite")]
    Query {
        /// Root model name
        model: String,

        /// SQLite database file
        #[arg(short, long, value_name = "PATH")]
        database: PathBuf,

        /// Filter JSON, or @file
        #[arg(short, long)]
        filter: Option<String>,

        /// Also count every matching row, ignoring pagination
        #[arg(long)]
        with_total: bool,
    },
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let options = compile_options(&config, cli.strict);

    match cli.command {
        Command::Select { model, filter } => {
            relsql_cli::commands::select::run(&config, options, &model, filter.as_deref(), cli.json)
        }
        Command::Count { model, r#where } => {
            relsql_cli::commands::count::run(&config, options, &model, r#where.as_deref(), cli.json)
        }
        Command::Check => relsql_cli::commands::check::run(&config),
        Command::Models => relsql_cli::commands::models::run(&config, cli.json),
        #[cfg(feature = "rusqlite")]
        Command::Query {
            model,
            database,
            filter,
            with_total,
        } => relsql_cli::commands::query::run(
            &config,
            options,
            &model,
            &database,
            filter.as_deref(),
            with_total,
        ),
    }
}

/// Load configuration with fallback to the default path
fn load_config(custom_path: Option<&Path>) -> Result<Config, CliError> {
    match custom_path {
        Some(path) => Config::load_from(path).map_err(Into::into),
        None => Config::load().map_err(Into::into),
    }
}

/// `--strict` overrides a lenient config
fn compile_options(config: &Config, strict: bool) -> CompileOptions {
    if strict {
        CompileOptions::strict()
    } else {
        config.options()
    }
}
