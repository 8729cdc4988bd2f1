//! HTTP gateway ledger backend
//!
//! This module talks to the ledger's REST gateway, which relays contract
//! calls and returns the raw record shapes the normalizer expects.
//!
//! Reads are retried with jitter on transport failures; writes are sent
//! exactly once because the underlying contract calls are not idempotent.

use super::{
    LedgerClient, NewProduct, NewReading, NewStatus, Product, SensorReading, StatusEvent,
    TxReceipt, Worker,
};
use crate::normalize::{
    coerce_bool, coerce_int, coerce_string, normalize_product, normalize_products,
    normalize_sensor_readings, normalize_status_history, normalize_workers,
};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::sleep;

/// Ledger gateway client with retry logic for reads
#[derive(Debug, Clone)]
pub struct GatewayLedger {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
    confirmation_timeout: Duration,
}

impl GatewayLedger {
    /// Create a new gateway client
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            confirmation_timeout: Duration::from_secs(120),
        })
    }

    /// Set maximum retry attempts for reads
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set base delay between read retries
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set how long a write waits for its confirmation
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Execute a GET against the gateway with retry logic.
    ///
    /// Client errors (4xx) are not retried; transport failures and server
    /// errors are, with jitter so concurrent pollers do not stampede.
    async fn get_with_retry(&self, path: &str) -> Result<Value> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay =
                    self.retry_delay + Duration::from_millis(rand::random::<u64>() % 500);
                tracing::debug!("Retrying after {:?} (attempt {})", delay, attempt);
                sleep(delay).await;
            }

            let req = self.authorize(self.http.get(self.url(path)));
            match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.as_u16() == 401 || status.as_u16() == 403 {
                        return Err(Error::access_denied(format!(
                            "gateway rejected credentials for GET {}",
                            path
                        )));
                    }
                    if status.is_client_error() {
                        return Err(Error::transport(format!(
                            "GET {} failed with status {}",
                            path, status
                        )));
                    }
                    if !status.is_success() {
                        last_error = Some(Error::transport(format!(
                            "GET {} failed with status {}",
                            path, status
                        )));
                        continue;
                    }
                    return resp.json::<Value>().await.map_err(|e| {
                        Error::malformed(format!("GET {} returned invalid JSON: {}", path, e))
                    });
                }
                Err(e) => {
                    tracing::warn!("Gateway error on GET {} (attempt {}): {}", path, attempt + 1, e);
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::transport(format!(
                "GET {} failed after {} attempts",
                path,
                self.max_retries + 1
            ))
        }))
    }

    /// Submit a write exactly once and wait for its confirmation.
    ///
    /// A failure after the request has left the client is reported as
    /// `AmbiguousOutcome`: the record may or may not have been appended, and
    /// blindly retrying could create a duplicate.
    async fn post_write(&self, operation: &str, path: &str, body: Value) -> Result<TxReceipt> {
        // Writes block until the gateway reports finalization, so they get a
        // much longer deadline than reads
        let req = self
            .authorize(self.http.post(self.url(path)).json(&body))
            .timeout(self.confirmation_timeout);

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) if e.is_connect() => {
                // Never reached the gateway; safe to report as transport
                return Err(Error::transport(format!(
                    "POST {} could not reach gateway: {}",
                    path, e
                )));
            }
            Err(e) => {
                return Err(Error::ambiguous(
                    operation,
                    format!("request may have been submitted: {}", e),
                ));
            }
        };

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::access_denied(format!(
                "gateway rejected credentials for {}",
                operation
            )));
        }
        if status.is_client_error() {
            return Err(Error::transport(format!(
                "{} rejected with status {}",
                operation, status
            )));
        }
        if !status.is_success() {
            // The gateway may have relayed the transaction before failing
            return Err(Error::ambiguous(
                operation,
                format!("gateway returned status {}", status),
            ));
        }

        let raw = resp.json::<Value>().await.map_err(|e| {
            Error::ambiguous(operation, format!("unreadable confirmation: {}", e))
        })?;

        parse_receipt(operation, &raw)
    }
}

/// Parse a write confirmation from the gateway.
///
/// A receipt without a confirmed finalization is ambiguous, not a success.
fn parse_receipt(operation: &str, raw: &Value) -> Result<TxReceipt> {
    let tx_hash = raw
        .get("tx_hash")
        .or_else(|| raw.get("transactionHash"))
        .and_then(coerce_string)
        .ok_or_else(|| Error::ambiguous(operation, "confirmation carries no transaction hash"))?;

    let block = raw
        .get("block")
        .or_else(|| raw.get("blockNumber"))
        .and_then(coerce_int)
        .and_then(|n| u64::try_from(n).ok());

    let confirmed = raw
        .get("confirmed")
        .and_then(coerce_bool)
        .or_else(|| raw.get("status").and_then(coerce_int).map(|s| s == 1))
        .unwrap_or(false);

    if !confirmed {
        return Err(Error::ambiguous(
            operation,
            format!("transaction {} submitted but not finalized", tx_hash),
        ));
    }

    Ok(TxReceipt {
        tx_hash,
        block,
        confirmed,
    })
}

#[async_trait]
impl LedgerClient for GatewayLedger {
    async fn get_product(&self, id: u64) -> Result<Product> {
        tracing::debug!("Fetching product {} from gateway", id);
        let raw = self.get_with_retry(&format!("/product/{}", id)).await?;
        normalize_product(&raw)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        tracing::debug!("Fetching product list from gateway");
        let raw = self.get_with_retry("/product/").await?;
        normalize_products(&raw)
    }

    async fn get_status_history(&self, id: u64) -> Result<Vec<StatusEvent>> {
        tracing::debug!("Fetching status history for product {}", id);
        let raw = self
            .get_with_retry(&format!("/product/status/{}", id))
            .await?;
        normalize_status_history(&raw)
    }

    async fn get_sensor_readings(&self, id: u64) -> Result<Vec<SensorReading>> {
        tracing::debug!("Fetching sensor readings for product {}", id);
        let raw = self
            .get_with_retry(&format!("/product/data/{}", id))
            .await?;
        normalize_sensor_readings(&raw)
    }

    async fn list_workers(&self) -> Result<Vec<Worker>> {
        tracing::debug!("Fetching worker list from gateway");
        let raw = self.get_with_retry("/worker/").await?;
        normalize_workers(&raw)
    }

    async fn register_product(&self, new: NewProduct) -> Result<TxReceipt> {
        let body = json!({
            "name": new.name,
            "price": new.price,
            "description": new.description,
            "reqtemp": new.required_temp,
            "manufacturing": new.manufacturing_date,
        });
        self.post_write("register_product", "/product/", body).await
    }

    async fn register_worker(&self, name: &str) -> Result<TxReceipt> {
        let body = json!({ "name": name });
        self.post_write("register_worker", "/worker/", body).await
    }

    async fn append_status(&self, new: NewStatus) -> Result<TxReceipt> {
        let body = json!({
            "location": new.location,
            "temp": new.temperature,
            "humidity": new.humidity,
            "heatindex": new.heat_index,
            "wid": new.worker_id,
            "pid": new.product_id,
            "total_quantity": new.total_quantity,
            "flag": new.completed,
        });
        self.post_write("append_status", "/product/status/", body)
            .await
    }

    async fn append_sensor_reading(&self, new: NewReading) -> Result<TxReceipt> {
        let body = json!({
            "temp": new.temperature,
            "humidity": new.humidity,
            "heatindex": new.heat_index,
            "pid": new.product_id,
        });
        self.post_write("append_reading", "/product/data/", body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_receipt_confirmed() {
        let raw = json!({"tx_hash": "0xabc", "block": 120, "confirmed": true});
        let receipt = parse_receipt("append_status", &raw).unwrap();
        assert_eq!(receipt.tx_hash, "0xabc");
        assert_eq!(receipt.block, Some(120));
        assert!(receipt.confirmed);
    }

    #[test]
    fn test_parse_receipt_status_flag() {
        let raw = json!({"transactionHash": "0xdef", "blockNumber": "0x78", "status": 1});
        let receipt = parse_receipt("register_worker", &raw).unwrap();
        assert_eq!(receipt.tx_hash, "0xdef");
        assert_eq!(receipt.block, Some(120));
    }

    #[test]
    fn test_parse_receipt_unconfirmed_is_ambiguous() {
        let raw = json!({"tx_hash": "0xabc", "status": 0});
        let err = parse_receipt("append_status", &raw).unwrap_err();
        assert!(matches!(err, Error::AmbiguousOutcome { .. }));
    }

    #[test]
    fn test_parse_receipt_missing_hash_is_ambiguous() {
        let raw = json!({"ok": true});
        let err = parse_receipt("register_product", &raw).unwrap_err();
        assert!(matches!(err, Error::AmbiguousOutcome { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = GatewayLedger::new("http://localhost:5000/", None).unwrap();
        assert_eq!(client.url("/product/"), "http://localhost:5000/product/");
    }
}
