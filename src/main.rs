use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rota::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "rota",
    version,
    about = "Weekly support and release duty roster with fairness-based rotation",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (defaults to environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (pretty, json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the duty schedule for a week
    Generate {
        /// Week to schedule (any date; normalized to its Monday).
        /// Defaults to the upcoming week.
        #[arg(short, long)]
        week: Option<NaiveDate>,

        /// Persist the generated schedule to the duty history
        #[arg(long, default_value = "false")]
        save: bool,
    },

    /// Show the team and per-category duty counters
    Team,

    /// Update employee statuses (@handle status pairs)
    Status {
        /// Alternating @handle status arguments,
        /// e.g. @alice sick @bob vacation
        #[arg(required = true, num_args = 2..)]
        pairs: Vec<String>,
    },

    /// Add an employee to the roster
    Add {
        /// Chat handle, with or without the leading @
        handle: String,

        /// Full name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Run the chat-bot HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Generate { week, save } => {
            tracing::info!(week = ?week, save = %save, "Starting generate command");
            commands::generate(&config, week, save)?;
        }

        Commands::Team => {
            commands::team(&config)?;
        }

        Commands::Status { pairs } => {
            tracing::info!(pairs = ?pairs, "Starting status command");
            commands::status(&config, &pairs)?;
        }

        Commands::Add { handle, name } => {
            let name = name.join(" ");
            tracing::info!(handle = %handle, name = %name, "Starting add command");
            commands::add(&config, &handle, &name)?;
        }

        Commands::Serve => {
            tracing::info!("Starting serve command");
            commands::serve(&config).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("rota=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rota=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
