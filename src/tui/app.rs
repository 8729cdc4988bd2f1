//! TUI application state

use crate::ledger::models::StatusEvent;
use crate::tracker::{FetchPhase, PollUpdate, ShipmentTracker};
use ratatui::widgets::ListState;

/// TUI application state
pub struct App {
    tracker: ShipmentTracker,
    pub checkpoint_list_state: ListState,
    pub selected_checkpoint: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(tracker: ShipmentTracker) -> Self {
        let mut checkpoint_list_state = ListState::default();
        if tracker
            .snapshot()
            .is_some_and(|s| !s.report.per_event.is_empty())
        {
            checkpoint_list_state.select(Some(0));
        }

        Self {
            tracker,
            checkpoint_list_state,
            selected_checkpoint: 0,
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tracker(&self) -> &ShipmentTracker {
        &self.tracker
    }

    pub fn phase(&self) -> &FetchPhase {
        self.tracker.phase()
    }

    fn checkpoint_count(&self) -> usize {
        self.tracker
            .snapshot()
            .map(|s| s.report.per_event.len())
            .unwrap_or(0)
    }

    /// Feed one poll update into the tracker, clamping the selection if the
    /// history shrank (it should only ever grow, but stale mocks exist)
    pub fn apply_update(&mut self, update: PollUpdate) {
        if !self.tracker.apply(update) {
            return;
        }

        let count = self.checkpoint_count();
        if count == 0 {
            self.checkpoint_list_state.select(None);
            self.selected_checkpoint = 0;
        } else {
            if self.selected_checkpoint >= count {
                self.selected_checkpoint = count - 1;
            }
            self.checkpoint_list_state
                .select(Some(self.selected_checkpoint));
        }
    }

    pub fn select_next(&mut self) {
        let count = self.checkpoint_count();
        if count > 0 {
            self.selected_checkpoint = (self.selected_checkpoint + 1) % count;
            self.checkpoint_list_state
                .select(Some(self.selected_checkpoint));
        }
    }

    pub fn select_previous(&mut self) {
        let count = self.checkpoint_count();
        if count > 0 {
            if self.selected_checkpoint == 0 {
                self.selected_checkpoint = count - 1;
            } else {
                self.selected_checkpoint -= 1;
            }
            self.checkpoint_list_state
                .select(Some(self.selected_checkpoint));
        }
    }

    pub fn selected_event(&self) -> Option<&StatusEvent> {
        self.tracker
            .snapshot()
            .and_then(|s| s.report.per_event.get(self.selected_checkpoint))
            .map(|e| &e.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::models::{Product, Timestamp};
    use crate::safety;
    use crate::tracker::ShipmentSnapshot;

    fn loaded_tracker(temps: &[i64]) -> ShipmentTracker {
        let history: Vec<StatusEvent> = temps
            .iter()
            .map(|&t| StatusEvent {
                location: "Depot".to_string(),
                temperature: t,
                humidity: 50,
                heat_index: t,
                worker_id: 1,
                product_id: 1,
                total_quantity: 10,
                completed: false,
                timestamp: Timestamp::Unknown,
            })
            .collect();

        let mut tracker = ShipmentTracker::new();
        tracker.apply(PollUpdate {
            seq: 1,
            result: Ok(ShipmentSnapshot {
                product: Product {
                    id: 1,
                    name: "Vaccine".to_string(),
                    price: "10".to_string(),
                    description: String::new(),
                    required_temp: 8,
                    manufacturing_date: "2026-01-01".to_string(),
                    registered_at: Timestamp::Unknown,
                },
                report: safety::evaluate(8, &history),
            }),
        });
        tracker
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = App::new(loaded_tracker(&[4, 6, 9]));
        assert_eq!(app.selected_checkpoint, 0);

        app.select_previous();
        assert_eq!(app.selected_checkpoint, 2);

        app.select_next();
        assert_eq!(app.selected_checkpoint, 0);
    }

    #[test]
    fn test_empty_history_has_no_selection() {
        let app = App::new(loaded_tracker(&[]));
        assert!(app.selected_event().is_none());
        assert_eq!(app.checkpoint_list_state.selected(), None);
    }

    #[test]
    fn test_stale_update_does_not_move_selection() {
        let mut app = App::new(loaded_tracker(&[4, 6, 9]));
        app.select_next();
        assert_eq!(app.selected_checkpoint, 1);

        // seq 1 was already applied when the tracker was built
        app.apply_update(PollUpdate {
            seq: 1,
            result: Err(crate::Error::transport("late and stale")),
        });
        assert_eq!(app.selected_checkpoint, 1);
        assert_eq!(app.phase(), &FetchPhase::Loaded);
    }
}
