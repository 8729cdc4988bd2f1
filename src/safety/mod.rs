//! Safety module - derive shipment safety from a status history
//!
//! Given a product's required temperature and its ordered status history,
//! compute per-checkpoint and aggregate safety. The evaluation is pure:
//! identical input always yields identical output, and it performs no I/O.
//!
//! Threshold policy: every checkpoint is compared against the product's own
//! required temperature with a non-strict comparison, so a checkpoint at
//! exactly the required temperature is safe.

use crate::ledger::models::StatusEvent;
use serde::{Deserialize, Serialize};

/// Safety verdict for a single checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSafety {
    pub event: StatusEvent,
    pub is_safe: bool,
}

/// Aggregate safety over a shipment's full history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub per_event: Vec<EventSafety>,

    /// AND over all per-event verdicts.
    ///
    /// Vacuously true for an empty history: a product with no recorded
    /// checkpoints has not been observed unsafe. Callers rendering a
    /// verdict should branch on an empty history before showing this.
    pub overall_safe: bool,
}

impl SafetyReport {
    pub fn is_empty(&self) -> bool {
        self.per_event.is_empty()
    }

    /// The most recent checkpoint in ledger-append order, if any
    pub fn latest(&self) -> Option<&StatusEvent> {
        self.per_event.last().map(|e| &e.event)
    }

    /// Checkpoints that breached the threshold
    pub fn breaches(&self) -> impl Iterator<Item = &StatusEvent> {
        self.per_event
            .iter()
            .filter(|e| !e.is_safe)
            .map(|e| &e.event)
    }

    /// True once a completed checkpoint has been appended
    pub fn delivered(&self) -> bool {
        self.per_event.iter().any(|e| e.event.completed)
    }
}

/// Evaluate a status history against a required temperature.
///
/// Per-event rule: `is_safe = temperature <= required_temp`.
pub fn evaluate(required_temp: i64, history: &[StatusEvent]) -> SafetyReport {
    let per_event: Vec<EventSafety> = history
        .iter()
        .map(|event| EventSafety {
            is_safe: event.temperature <= required_temp,
            event: event.clone(),
        })
        .collect();

    let overall_safe = per_event.iter().all(|e| e.is_safe);

    SafetyReport {
        per_event,
        overall_safe,
    }
}

/// Latest recorded readings for a shipment.
///
/// `None` when the history is empty; distinct from a valid zero reading.
pub fn latest_reading(history: &[StatusEvent]) -> Option<(i64, i64, i64)> {
    history
        .last()
        .map(|e| (e.temperature, e.humidity, e.heat_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::models::Timestamp;

    fn event(temp: i64) -> StatusEvent {
        StatusEvent {
            location: "Depot".to_string(),
            temperature: temp,
            humidity: 50,
            heat_index: temp + 1,
            worker_id: 1,
            product_id: 1,
            total_quantity: 100,
            completed: false,
            timestamp: Timestamp::from_unix_seconds(1_700_000_000),
        }
    }

    #[test]
    fn test_per_event_and_overall() {
        let history = vec![event(20), event(25), event(30)];
        let report = evaluate(25, &history);

        let verdicts: Vec<bool> = report.per_event.iter().map(|e| e.is_safe).collect();
        assert_eq!(verdicts, vec![true, true, false]);
        assert!(!report.overall_safe);
    }

    #[test]
    fn test_equality_is_safe() {
        let report = evaluate(25, &[event(25)]);
        assert!(report.overall_safe);
    }

    #[test]
    fn test_overall_safe_iff_no_breach() {
        let report = evaluate(25, &[event(10), event(24), event(25)]);
        assert!(report.overall_safe);

        let report = evaluate(25, &[event(10), event(26), event(5)]);
        assert!(!report.overall_safe);
    }

    #[test]
    fn test_empty_history_is_vacuously_safe() {
        let report = evaluate(25, &[]);
        assert!(report.overall_safe);
        assert!(report.is_empty());
        assert!(report.latest().is_none());
    }

    #[test]
    fn test_latest_reading_unavailable_not_zero() {
        assert_eq!(latest_reading(&[]), None);

        let history = vec![event(0)];
        assert_eq!(latest_reading(&history), Some((0, 50, 1)));
    }

    #[test]
    fn test_latest_is_last_in_append_order() {
        let mut history = vec![event(20), event(22)];
        history[1].location = "Final stop".to_string();

        let report = evaluate(25, &history);
        assert_eq!(report.latest().unwrap().location, "Final stop");
        assert_eq!(latest_reading(&history).unwrap().0, 22);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let history = vec![event(20), event(30)];
        let a = evaluate(25, &history);
        let b = evaluate(25, &history);
        assert_eq!(a, b);
    }

    #[test]
    fn test_breaches_and_delivery() {
        let mut history = vec![event(20), event(30), event(28)];
        history[2].completed = true;

        let report = evaluate(25, &history);
        let breach_temps: Vec<i64> = report.breaches().map(|e| e.temperature).collect();
        assert_eq!(breach_temps, vec![30, 28]);
        assert!(report.delivered());
    }

    #[test]
    fn test_negative_threshold() {
        // Frozen goods: threshold below zero still compares non-strictly
        let report = evaluate(-18, &[event(-20), event(-18)]);
        assert!(report.overall_safe);

        let report = evaluate(-18, &[event(-17)]);
        assert!(!report.overall_safe);
    }
}
