//! Mock ledger backend
//!
//! In-memory implementation for tests and offline use. Writes append to the
//! internal vectors and confirm immediately.

use super::{
    LedgerClient, NewProduct, NewReading, NewStatus, Product, SensorReading, StatusEvent,
    Timestamp, TxReceipt, Worker,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory ledger with optional seeded demo data
#[derive(Debug, Default)]
pub struct MockLedger {
    products: Mutex<Vec<Product>>,
    history: Mutex<Vec<StatusEvent>>,
    readings: Mutex<Vec<SensorReading>>,
    workers: Mutex<Vec<Worker>>,
    tx_counter: AtomicU64,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger pre-populated with one cold-chain shipment
    pub fn with_demo_data() -> Self {
        let ledger = Self::new();

        {
            let mut products = ledger.products.lock().unwrap();
            products.push(Product {
                id: 1,
                name: "Insulin (10ml vials)".to_string(),
                price: "450.00".to_string(),
                description: "Temperature sensitive, keep refrigerated".to_string(),
                required_temp: 8,
                manufacturing_date: "2026-01-12".to_string(),
                registered_at: Timestamp::from_unix_seconds(1_768_000_000),
            });
        }

        {
            let mut history = ledger.history.lock().unwrap();
            let base = 1_768_100_000;
            for (i, (location, temp)) in [("Factory, Pune", 4), ("Cold storage, Mumbai", 6), ("Distribution hub, Delhi", 8)]
                .into_iter()
                .enumerate()
            {
                history.push(StatusEvent {
                    location: location.to_string(),
                    temperature: temp,
                    humidity: 55 + i as i64,
                    heat_index: temp + 2,
                    worker_id: 1,
                    product_id: 1,
                    total_quantity: 500,
                    completed: i == 2,
                    timestamp: Timestamp::from_unix_seconds(base + (i as i64) * 86_400),
                });
            }
        }

        {
            let mut workers = ledger.workers.lock().unwrap();
            workers.push(Worker {
                name: "Asha Rao".to_string(),
                id: 1,
                registered_at: Timestamp::from_unix_seconds(1_767_900_000),
            });
        }

        ledger
    }

    fn next_receipt(&self) -> TxReceipt {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        TxReceipt::confirmed(format!("0xmock{:08x}", n), Some(n))
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_product(&self, id: u64) -> Result<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            // Same classification the gateway gives a 404
            .ok_or_else(|| Error::transport(format!("Product {} not found", id)))
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_status_history(&self, id: u64) -> Result<Vec<StatusEvent>> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.product_id == id)
            .cloned()
            .collect())
    }

    async fn get_sensor_readings(&self, id: u64) -> Result<Vec<SensorReading>> {
        Ok(self
            .readings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.product_id == id)
            .cloned()
            .collect())
    }

    async fn list_workers(&self) -> Result<Vec<Worker>> {
        Ok(self.workers.lock().unwrap().clone())
    }

    async fn register_product(&self, new: NewProduct) -> Result<TxReceipt> {
        let mut products = self.products.lock().unwrap();
        let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        products.push(Product {
            id,
            name: new.name,
            price: new.price,
            description: new.description,
            required_temp: new.required_temp,
            manufacturing_date: new.manufacturing_date,
            registered_at: Timestamp::Unknown,
        });
        Ok(self.next_receipt())
    }

    async fn register_worker(&self, name: &str) -> Result<TxReceipt> {
        let mut workers = self.workers.lock().unwrap();
        let id = workers.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        workers.push(Worker {
            name: name.to_string(),
            id,
            registered_at: Timestamp::Unknown,
        });
        Ok(self.next_receipt())
    }

    async fn append_status(&self, new: NewStatus) -> Result<TxReceipt> {
        self.history.lock().unwrap().push(StatusEvent {
            location: new.location,
            temperature: new.temperature,
            humidity: new.humidity,
            heat_index: new.heat_index,
            worker_id: new.worker_id,
            product_id: new.product_id,
            total_quantity: new.total_quantity,
            completed: new.completed,
            timestamp: Timestamp::Unknown,
        });
        Ok(self.next_receipt())
    }

    async fn append_sensor_reading(&self, new: NewReading) -> Result<TxReceipt> {
        self.readings.lock().unwrap().push(SensorReading {
            product_id: new.product_id,
            temperature: new.temperature,
            humidity: new.humidity,
            heat_index: new.heat_index,
        });
        Ok(self.next_receipt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_data_is_consistent() {
        let ledger = MockLedger::with_demo_data();

        let product = ledger.get_product(1).await.unwrap();
        assert_eq!(product.required_temp, 8);

        let history = ledger.get_status_history(1).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.last().unwrap().completed);

        let report = crate::safety::evaluate(product.required_temp, &history);
        assert!(report.overall_safe);
    }

    #[tokio::test]
    async fn test_writes_append_in_order() {
        let ledger = MockLedger::new();

        let r1 = ledger
            .append_status(NewStatus {
                location: "A".to_string(),
                temperature: 5,
                humidity: 50,
                heat_index: 6,
                worker_id: 1,
                product_id: 9,
                total_quantity: 10,
                completed: false,
            })
            .await
            .unwrap();
        assert!(r1.confirmed);

        ledger
            .append_status(NewStatus {
                location: "B".to_string(),
                temperature: 7,
                humidity: 50,
                heat_index: 8,
                worker_id: 1,
                product_id: 9,
                total_quantity: 10,
                completed: true,
            })
            .await
            .unwrap();

        let history = ledger.get_status_history(9).await.unwrap();
        let locations: Vec<_> = history.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(locations, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_register_assigns_sequential_ids() {
        let ledger = MockLedger::new();
        ledger.register_worker("A").await.unwrap();
        ledger.register_worker("B").await.unwrap();

        let workers = ledger.list_workers().await.unwrap();
        let ids: Vec<_> = workers.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unknown_product_is_transport_error() {
        let ledger = MockLedger::new();
        let err = ledger.get_product(42).await.unwrap_err();
        assert!(matches!(err, Error::TransportFailure(_)));
        assert!(err.to_string().contains("42"));
    }
}
