//! Core data models for ledger records
//!
//! This module defines the typed domain records produced by the normalizer:
//! products, shipment status events, sensor readings, and workers.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in time recorded on the ledger.
///
/// The ledger stores seconds since epoch; a zero or unparsable value becomes
/// `Unknown`, which must never be rendered as the epoch-start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Timestamp {
    Known(DateTime<Utc>),
    #[default]
    Unknown,
}

impl Timestamp {
    /// Build from seconds since epoch; zero and out-of-range values are Unknown
    pub fn from_unix_seconds(secs: i64) -> Self {
        if secs <= 0 {
            return Timestamp::Unknown;
        }
        match Utc.timestamp_opt(secs, 0) {
            chrono::LocalResult::Single(dt) => Timestamp::Known(dt),
            _ => Timestamp::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Timestamp::Known(_))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Timestamp::Known(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            Timestamp::Unknown => write!(f, "unknown"),
        }
    }
}

/// A registered product tracked through the supply chain.
///
/// Created once by a write call and immutable thereafter; the ledger has no
/// update operation for products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,

    pub name: String,

    /// Price as a decimal string, kept verbatim to avoid precision loss
    pub price: String,

    pub description: String,

    /// The sole safety threshold: every status event for this product is
    /// compared against it
    pub required_temp: i64,

    pub manufacturing_date: String,

    pub registered_at: Timestamp,
}

/// One checkpoint in a product's shipment history.
///
/// Append-only; ledger append order is treated as chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub location: String,

    pub temperature: i64,

    pub humidity: i64,

    pub heat_index: i64,

    pub worker_id: u64,

    pub product_id: u64,

    pub total_quantity: u64,

    /// Whether this checkpoint marks the shipment as delivered
    pub completed: bool,

    pub timestamp: Timestamp,
}

/// An environmental sensor reading attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub product_id: u64,
    pub temperature: i64,
    pub humidity: i64,
    pub heat_index: i64,
}

/// A registered supply-chain worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub name: String,
    pub id: u64,
    pub registered_at: Timestamp,
}

/// Receipt for a confirmed ledger write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash assigned by the ledger
    pub tx_hash: String,

    /// Block the transaction was included in, if the gateway reports it
    pub block: Option<u64>,

    /// True once the ledger has finalized the write
    pub confirmed: bool,
}

impl TxReceipt {
    pub fn confirmed(tx_hash: impl Into<String>, block: Option<u64>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            block,
            confirmed: true,
        }
    }
}

/// Fields for a new product registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub description: String,
    pub required_temp: i64,
    pub manufacturing_date: String,
}

/// Fields for a new shipment checkpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStatus {
    pub location: String,
    pub temperature: i64,
    pub humidity: i64,
    pub heat_index: i64,
    pub worker_id: u64,
    pub product_id: u64,
    pub total_quantity: u64,
    pub completed: bool,
}

/// Fields for a new sensor reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReading {
    pub temperature: i64,
    pub humidity: i64,
    pub heat_index: i64,
    pub product_id: u64,
}
