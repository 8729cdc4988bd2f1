//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// PharmaTrack Supply Chain Visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "pharmatrack-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger backend
    #[arg(short, long, value_enum, global = true, default_value = "gateway")]
    pub source: LedgerSourceType,

    /// Ledger gateway URL (overrides config)
    #[arg(long, global = true, env = "PHARMATRACK_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all registered products
    Products {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show one product record
    Product {
        /// Product ID
        #[arg(short, long)]
        id: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show a product's shipment journey with safety verdicts
    Track {
        /// Product ID
        #[arg(short, long)]
        id: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Show a product's environmental sensor readings
    Readings {
        /// Product ID
        #[arg(short, long)]
        id: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// List all registered workers
    Workers {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Register a new product
    RegisterProduct {
        #[arg(long)]
        name: String,

        /// Price as a decimal string
        #[arg(long)]
        price: String,

        #[arg(long)]
        description: String,

        /// Required storage temperature in °C
        #[arg(long)]
        required_temp: i64,

        /// Manufacturing date (e.g. 2026-01-12)
        #[arg(long)]
        manufacturing_date: String,
    },

    /// Register a new worker
    RegisterWorker {
        #[arg(long)]
        name: String,
    },

    /// Append a shipment checkpoint to a product's history
    AppendStatus {
        /// Product ID
        #[arg(short, long)]
        id: u64,

        #[arg(long)]
        location: String,

        /// Recorded temperature in °C
        #[arg(long)]
        temp: i64,

        #[arg(long)]
        humidity: i64,

        #[arg(long)]
        heat_index: i64,

        #[arg(long)]
        worker_id: u64,

        #[arg(long)]
        quantity: u64,

        /// Mark the shipment as delivered
        #[arg(long)]
        completed: bool,
    },

    /// Append an environmental sensor reading for a product
    AppendReading {
        /// Product ID
        #[arg(short, long)]
        id: u64,

        #[arg(long)]
        temp: i64,

        #[arg(long)]
        humidity: i64,

        #[arg(long)]
        heat_index: i64,
    },

    /// Watch a shipment live in an interactive TUI timeline
    Watch {
        /// Product ID
        #[arg(short, long)]
        id: u64,

        /// Polling interval in seconds (defaults to the configured value)
        #[arg(long)]
        interval: Option<u64>,
    },
}

/// Ledger backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LedgerSourceType {
    /// In-memory demo data
    Mock,
    /// HTTP ledger gateway
    Gateway,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub async fn execute(args: Cli, mut config: Config) -> Result<()> {
    if let Some(url) = &args.gateway_url {
        config.gateway.url = Some(url.clone());
    }

    let client = crate::ledger::create_ledger_client(args.source, &config)?;

    match args.command {
        Commands::Products { output } => commands::products(client.as_ref(), output).await,
        Commands::Product { id, output } => commands::product(client.as_ref(), id, output).await,
        Commands::Track { id, output } => commands::track(client.as_ref(), id, output).await,
        Commands::Readings { id, output } => commands::readings(client.as_ref(), id, output).await,
        Commands::Workers { output } => commands::workers(client.as_ref(), output).await,
        Commands::RegisterProduct {
            name,
            price,
            description,
            required_temp,
            manufacturing_date,
        } => {
            commands::register_product(
                client.as_ref(),
                crate::ledger::NewProduct {
                    name,
                    price,
                    description,
                    required_temp,
                    manufacturing_date,
                },
            )
            .await
        }
        Commands::RegisterWorker { name } => {
            commands::register_worker(client.as_ref(), &name).await
        }
        Commands::AppendStatus {
            id,
            location,
            temp,
            humidity,
            heat_index,
            worker_id,
            quantity,
            completed,
        } => {
            commands::append_status(
                client.as_ref(),
                crate::ledger::NewStatus {
                    location,
                    temperature: temp,
                    humidity,
                    heat_index,
                    worker_id,
                    product_id: id,
                    total_quantity: quantity,
                    completed,
                },
            )
            .await
        }
        Commands::AppendReading {
            id,
            temp,
            humidity,
            heat_index,
        } => {
            commands::append_reading(
                client.as_ref(),
                crate::ledger::NewReading {
                    temperature: temp,
                    humidity,
                    heat_index,
                    product_id: id,
                },
            )
            .await
        }
        Commands::Watch { id, interval } => {
            let poll_interval = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or(config.watch.poll_interval);
            commands::watch(client.into(), id, poll_interval).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        // Test basic parsing
        let cli = Cli::try_parse_from([
            "pharmatrack-viz",
            "track",
            "--id",
            "7",
            "--source",
            "mock",
        ]);

        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_write_parsing() {
        let cli = Cli::try_parse_from([
            "pharmatrack-viz",
            "append-status",
            "--id",
            "7",
            "--location",
            "Mumbai",
            "--temp",
            "6",
            "--humidity",
            "55",
            "--heat-index",
            "8",
            "--worker-id",
            "1",
            "--quantity",
            "500",
        ])
        .unwrap();

        match cli.command {
            Commands::AppendStatus { id, completed, .. } => {
                assert_eq!(id, 7);
                assert!(!completed);
            }
            _ => panic!("parsed wrong command"),
        }
    }
}
