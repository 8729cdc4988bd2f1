//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::OutputFormat;
use crate::ledger::{LedgerClient, NewProduct, NewReading, NewStatus, TxReceipt};
use crate::tracker::{self, FetchSeq, PollUpdate, ShipmentTracker};
use crate::{Result, safety};
use std::sync::Arc;
use std::time::Duration;

/// List all registered products
pub async fn products(client: &dyn LedgerClient, output: OutputFormat) -> Result<()> {
    tracing::info!("Fetching product inventory...");
    let products = client.list_products().await?;
    tracing::info!("Found {} products", products.len());

    match output {
        OutputFormat::Json => {
            super::output::products_json(&mut std::io::stdout(), &products)?;
        }
        OutputFormat::Table => {
            super::output::products_table(&mut std::io::stdout(), &products)?;
        }
    }
    Ok(())
}

/// Show one product record
pub async fn product(client: &dyn LedgerClient, id: u64, output: OutputFormat) -> Result<()> {
    tracing::info!("Fetching product {}...", id);
    let product = client.get_product(id).await?;

    match output {
        OutputFormat::Json => {
            super::output::products_json(&mut std::io::stdout(), std::slice::from_ref(&product))?;
        }
        OutputFormat::Table => {
            super::output::products_table(&mut std::io::stdout(), std::slice::from_ref(&product))?;
        }
    }
    Ok(())
}

/// Show a product's shipment journey with safety verdicts
pub async fn track(client: &dyn LedgerClient, id: u64, output: OutputFormat) -> Result<()> {
    tracing::info!("Fetching shipment history for product {}...", id);
    let product = client.get_product(id).await?;
    let history = client.get_status_history(id).await?;
    let report = safety::evaluate(product.required_temp, &history);

    match output {
        OutputFormat::Json => {
            super::output::journey_json(&mut std::io::stdout(), &product, &report)?;
        }
        OutputFormat::Table => {
            super::output::journey_table(&mut std::io::stdout(), &product, &report)?;
        }
    }
    Ok(())
}

/// Show a product's sensor readings
pub async fn readings(client: &dyn LedgerClient, id: u64, output: OutputFormat) -> Result<()> {
    tracing::info!("Fetching sensor readings for product {}...", id);
    let readings = client.get_sensor_readings(id).await?;
    tracing::info!("Found {} readings", readings.len());

    match output {
        OutputFormat::Json => {
            super::output::readings_json(&mut std::io::stdout(), &readings)?;
        }
        OutputFormat::Table => {
            super::output::readings_table(&mut std::io::stdout(), &readings)?;
        }
    }
    Ok(())
}

/// List all registered workers
pub async fn workers(client: &dyn LedgerClient, output: OutputFormat) -> Result<()> {
    tracing::info!("Fetching worker registry...");
    let workers = client.list_workers().await?;
    tracing::info!("Found {} workers", workers.len());

    match output {
        OutputFormat::Json => {
            super::output::workers_json(&mut std::io::stdout(), &workers)?;
        }
        OutputFormat::Table => {
            super::output::workers_table(&mut std::io::stdout(), &workers)?;
        }
    }
    Ok(())
}

fn report_receipt(operation: &str, receipt: &TxReceipt) {
    tracing::info!("{} confirmed in transaction {}", operation, receipt.tx_hash);
    println!("Confirmed: {}", receipt.tx_hash);
    if let Some(block) = receipt.block {
        println!("Block:     {}", block);
    }
}

/// Register a new product
pub async fn register_product(client: &dyn LedgerClient, new: NewProduct) -> Result<()> {
    crate::ensure!(!new.name.trim().is_empty(), "Product name cannot be empty");
    tracing::info!("Registering product '{}'...", new.name);
    let receipt = client.register_product(new).await?;
    report_receipt("Product registration", &receipt);
    Ok(())
}

/// Register a new worker
pub async fn register_worker(client: &dyn LedgerClient, name: &str) -> Result<()> {
    tracing::info!("Registering worker '{}'...", name);
    let receipt = client.register_worker(name).await?;
    report_receipt("Worker registration", &receipt);
    Ok(())
}

/// Append a shipment checkpoint
pub async fn append_status(client: &dyn LedgerClient, new: NewStatus) -> Result<()> {
    crate::ensure!(
        new.total_quantity > 0,
        "Checkpoint quantity must be positive"
    );
    tracing::info!(
        "Appending checkpoint at '{}' for product {}...",
        new.location,
        new.product_id
    );
    let receipt = client.append_status(new).await?;
    report_receipt("Checkpoint", &receipt);
    Ok(())
}

/// Append a sensor reading
pub async fn append_reading(client: &dyn LedgerClient, new: NewReading) -> Result<()> {
    tracing::info!("Appending sensor reading for product {}...", new.product_id);
    let receipt = client.append_sensor_reading(new).await?;
    report_receipt("Sensor reading", &receipt);
    Ok(())
}

/// Watch a shipment live: initial explicit fetch, then background polling
/// feeding the TUI over a channel.
pub async fn watch(
    client: Arc<dyn LedgerClient>,
    product_id: u64,
    poll_interval: Duration,
) -> Result<()> {
    let seq = FetchSeq::new();
    let mut tracker = ShipmentTracker::new();

    // Initial fetch is user-triggered, so it passes through Loading
    tracker.begin_visible_fetch();
    tracing::info!("Fetching initial data for product {}...", product_id);
    let first_seq = seq.next();
    let result = tracker::fetch_shipment(client.as_ref(), product_id).await;
    tracker.apply(PollUpdate {
        seq: first_seq,
        result,
    });

    let receiver = tracker::spawn_poller(client, product_id, poll_interval, seq);

    tracing::info!("Launching TUI in watch mode...");
    crate::tui::run(tracker, receiver)
}
