mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "orderwatch")]
#[command(about = "Order status notifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the order, decide, and send the notification when it is due
    Run {
        /// Log and print the notification instead of sending it
        #[arg(long)]
        dry_run: bool,
        /// Run counter for the reminder cadence (overrides ORDERWATCH_RUN_NUMBER)
        #[arg(long)]
        run_number: Option<String>,
    },
    /// Fetch the order and print its summary
    Show {
        /// Print the summary and the unwrapped upstream record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the notification decision without fetching anything
    Decide {
        /// VIN to decide for; omit when none has been assigned
        #[arg(long)]
        vin: Option<String>,
        /// Run counter for the reminder cadence (overrides ORDERWATCH_RUN_NUMBER)
        #[arg(long)]
        run_number: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(orderwatch_core::load_log_level()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "orderwatch run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            dry_run,
            run_number,
        } => {
            let config = orderwatch_core::load_app_config()?;
            commands::run_notify(&config, run_number.as_deref(), dry_run).await
        }
        Commands::Show { json } => {
            let config = orderwatch_core::load_app_config()?;
            commands::run_show(&config, json).await
        }
        Commands::Decide { vin, run_number } => {
            let cadence = orderwatch_core::load_cadence_settings()?;
            commands::run_decide(&cadence, vin.as_deref(), run_number.as_deref())
        }
    }
}

#[cfg(test)]
mod tests;
