//! PharmaTrack Supply Chain Visualizer
//!
//! A terminal tool for tracking pharmaceutical shipments recorded on a
//! smart-contract ledger.
//!
//! This library provides functionality for:
//! - Fetching product, status, sensor, and worker records from the ledger
//!   gateway (or a mock backend for offline use)
//! - Normalizing the dual-shape records the ledger returns (hex or decimal
//!   numerics, named or positional structs) into typed domain records
//! - Deriving per-checkpoint and overall shipment safety from a product's
//!   status history
//! - Submitting new records (products, workers, checkpoints, sensor data)
//! - Watching a shipment live in an interactive TUI timeline

pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod normalize;
pub mod safety;
pub mod tracker;
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
