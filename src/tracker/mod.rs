//! Tracker module - fetch lifecycle for one shipment view
//!
//! Each view of a product owns one `ShipmentTracker`. A fetch moves the
//! tracker `Idle/Loaded/Error → Loading → {Loaded, Error}`; a failed refresh
//! keeps the previously loaded snapshot on screen, and background polls skip
//! the visible `Loading` phase entirely.
//!
//! A manual fetch and a background poll can race. Every fetch takes a
//! monotonically increasing sequence number when it starts, and the tracker
//! refuses to apply a response older than the newest one already applied, so
//! a stale response can never overwrite fresher data.

use crate::ledger::{LedgerClient, Product};
use crate::safety::{self, SafetyReport};
use crate::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Everything one shipment view displays
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentSnapshot {
    pub product: Product,
    pub report: SafetyReport,
}

/// Fetch lifecycle phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// One fetch result, tagged with the sequence number taken at fetch start
#[derive(Debug)]
pub struct PollUpdate {
    pub seq: u64,
    pub result: Result<ShipmentSnapshot>,
}

/// Shared counter handing out fetch sequence numbers
#[derive(Debug, Default, Clone)]
pub struct FetchSeq(Arc<AtomicU64>);

impl FetchSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Display-state owner for one product view
#[derive(Debug)]
pub struct ShipmentTracker {
    phase: FetchPhase,
    snapshot: Option<ShipmentSnapshot>,
    applied_seq: u64,
}

impl Default for ShipmentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ShipmentTracker {
    pub fn new() -> Self {
        Self {
            phase: FetchPhase::Idle,
            snapshot: None,
            applied_seq: 0,
        }
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn snapshot(&self) -> Option<&ShipmentSnapshot> {
        self.snapshot.as_ref()
    }

    /// Mark the start of a user-triggered fetch.
    ///
    /// Background polls never call this: only explicit fetches pass through
    /// a visible `Loading` phase.
    pub fn begin_visible_fetch(&mut self) {
        self.phase = FetchPhase::Loading;
    }

    /// Apply a completed fetch. Returns false if the update was stale and
    /// discarded.
    pub fn apply(&mut self, update: PollUpdate) -> bool {
        if update.seq <= self.applied_seq {
            tracing::debug!(
                "Discarding stale fetch response (seq {} <= {})",
                update.seq,
                self.applied_seq
            );
            return false;
        }
        self.applied_seq = update.seq;

        match update.result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.phase = FetchPhase::Loaded;
            }
            Err(e) => {
                // Prior snapshot stays on display; only the phase reflects
                // the failed refresh.
                tracing::warn!("Fetch failed: {}", e);
                self.phase = FetchPhase::Error(e.to_string());
            }
        }
        true
    }
}

/// Fetch a product and its evaluated history in one pass
pub async fn fetch_shipment(client: &dyn LedgerClient, product_id: u64) -> Result<ShipmentSnapshot> {
    let product = client.get_product(product_id).await?;
    let history = client.get_status_history(product_id).await?;
    let report = safety::evaluate(product.required_temp, &history);
    Ok(ShipmentSnapshot { product, report })
}

/// Spawn the background poller for a product.
///
/// Each tick takes a sequence number, fetches, and sends the tagged result.
/// The task stops when the receiver is dropped; in-flight work is simply
/// discarded at that point, never applied.
pub fn spawn_poller(
    client: Arc<dyn LedgerClient>,
    product_id: u64,
    poll_interval: Duration,
    seq: FetchSeq,
) -> mpsc::Receiver<PollUpdate> {
    let (sender, receiver) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        interval.tick().await; // Immediate first tick; initial load already happened, skip it.
        loop {
            interval.tick().await;

            let fetch_seq = seq.next();
            let result = fetch_shipment(client.as_ref(), product_id).await;
            // Access loss won't heal on its own; report it, then stop.
            let stop = matches!(&result, Err(e) if !e.is_retriable());

            if sender
                .send(PollUpdate {
                    seq: fetch_seq,
                    result,
                })
                .await
                .is_err()
            {
                break; // Receiver closed
            }

            if stop {
                tracing::warn!("Polling stopped after non-retriable error");
                break;
            }
        }
    });

    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::ledger::mock::MockLedger;
    use crate::ledger::models::{StatusEvent, Timestamp};

    fn snapshot_with_temp(temp: i64) -> ShipmentSnapshot {
        let event = StatusEvent {
            location: "Depot".to_string(),
            temperature: temp,
            humidity: 50,
            heat_index: temp,
            worker_id: 1,
            product_id: 1,
            total_quantity: 10,
            completed: false,
            timestamp: Timestamp::Unknown,
        };
        ShipmentSnapshot {
            product: Product {
                id: 1,
                name: "Vaccine".to_string(),
                price: "10".to_string(),
                description: String::new(),
                required_temp: 8,
                manufacturing_date: "2026-01-01".to_string(),
                registered_at: Timestamp::Unknown,
            },
            report: safety::evaluate(8, &[event]),
        }
    }

    #[test]
    fn test_phase_transitions() {
        let mut tracker = ShipmentTracker::new();
        assert_eq!(tracker.phase(), &FetchPhase::Idle);

        tracker.begin_visible_fetch();
        assert_eq!(tracker.phase(), &FetchPhase::Loading);

        let applied = tracker.apply(PollUpdate {
            seq: 1,
            result: Ok(snapshot_with_temp(5)),
        });
        assert!(applied);
        assert_eq!(tracker.phase(), &FetchPhase::Loaded);
        assert!(tracker.snapshot().is_some());
    }

    #[test]
    fn test_failed_refresh_retains_snapshot() {
        let mut tracker = ShipmentTracker::new();
        tracker.apply(PollUpdate {
            seq: 1,
            result: Ok(snapshot_with_temp(5)),
        });

        tracker.apply(PollUpdate {
            seq: 2,
            result: Err(Error::transport("gateway down")),
        });

        assert!(matches!(tracker.phase(), FetchPhase::Error(_)));
        // Previously displayed data is still there
        assert_eq!(tracker.snapshot().unwrap().product.name, "Vaccine");
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut tracker = ShipmentTracker::new();

        // Newer fetch (seq 2) lands first
        tracker.apply(PollUpdate {
            seq: 2,
            result: Ok(snapshot_with_temp(5)),
        });

        // Older fetch (seq 1) arrives late and must not overwrite
        let applied = tracker.apply(PollUpdate {
            seq: 1,
            result: Ok(snapshot_with_temp(30)),
        });
        assert!(!applied);
        assert!(tracker.snapshot().unwrap().report.overall_safe);
    }

    #[test]
    fn test_seq_is_monotonic() {
        let seq = FetchSeq::new();
        let a = seq.next();
        let b = seq.next();
        let c = seq.clone().next();
        assert!(a < b && b < c);
    }

    #[tokio::test]
    async fn test_fetch_shipment_evaluates_history() {
        let ledger = MockLedger::with_demo_data();
        let snapshot = fetch_shipment(&ledger, 1).await.unwrap();

        assert_eq!(snapshot.product.id, 1);
        assert_eq!(snapshot.report.per_event.len(), 3);
        assert!(snapshot.report.overall_safe);
        assert!(snapshot.report.delivered());
    }

    #[tokio::test]
    async fn test_fetch_shipment_unknown_product() {
        let ledger = MockLedger::new();
        assert!(fetch_shipment(&ledger, 99).await.is_err());
    }
}
