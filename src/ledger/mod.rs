//! Ledger module - Abstraction for the supply-chain ledger
//!
//! This module provides a trait-based abstraction over the external ledger,
//! with read methods for products, status histories, sensor readings, and
//! workers, and write methods for appending new records.

use crate::{Config, Result};
use async_trait::async_trait;

pub mod gateway;
pub mod mock;
pub mod models;

use crate::cli::LedgerSourceType;
pub use models::{
    NewProduct, NewReading, NewStatus, Product, SensorReading, StatusEvent, Timestamp, TxReceipt,
    Worker,
};

/// Client trait for the supply-chain ledger.
///
/// Implementations provide different backends:
/// - `GatewayLedger`: talks to the ledger's HTTP gateway
/// - `MockLedger`: in-memory records for tests and offline use
///
/// Reads return records in ledger-append order, which callers treat as
/// chronological. Writes are externally finalized: they return only after
/// the ledger confirms the record, and they are not idempotent — an
/// ambiguous failure surfaces as `Error::AmbiguousOutcome` and is never
/// retried by the client.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch a single product record by id
    async fn get_product(&self, id: u64) -> Result<Product>;

    /// Fetch all registered products
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Fetch a product's ordered status history
    async fn get_status_history(&self, id: u64) -> Result<Vec<StatusEvent>>;

    /// Fetch a product's sensor readings
    async fn get_sensor_readings(&self, id: u64) -> Result<Vec<SensorReading>>;

    /// Fetch all registered workers
    async fn list_workers(&self) -> Result<Vec<Worker>>;

    /// Register a new product
    async fn register_product(&self, new: NewProduct) -> Result<TxReceipt>;

    /// Register a new worker
    async fn register_worker(&self, name: &str) -> Result<TxReceipt>;

    /// Append a shipment checkpoint to a product's history
    async fn append_status(&self, new: NewStatus) -> Result<TxReceipt>;

    /// Append an environmental sensor reading for a product
    async fn append_sensor_reading(&self, new: NewReading) -> Result<TxReceipt>;
}

/// Create a ledger client instance based on type and configuration
pub fn create_ledger_client(
    source_type: LedgerSourceType,
    config: &Config,
) -> Result<Box<dyn LedgerClient>> {
    match source_type {
        LedgerSourceType::Mock => Ok(Box::new(mock::MockLedger::with_demo_data())),
        LedgerSourceType::Gateway => {
            let client = gateway::GatewayLedger::new(
                config.gateway_url()?,
                config.gateway_api_token(),
            )?
            .with_max_retries(config.gateway.max_retries)
            .with_retry_delay(config.gateway.retry_delay)
            .with_confirmation_timeout(config.gateway.confirmation_timeout);
            Ok(Box::new(client))
        }
    }
}
