use crate::events::{EventType, StoredInventoryEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when replaying a ledger prefix yields a negative bottle count.
/// Identifies the offending event so the caller can reject it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stock falls below zero at event {event_id} (balance would be {balance})")]
pub struct NegativeStockError {
    pub event_id: i64,
    pub balance: i64,
}

/// Derived state of one wine's ledger: the running balance plus the
/// lifetime acquisition and consumption totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub current_stock: i64,
    pub total_acquired: i64,
    pub total_consumed: i64,
    pub last_event_at: Option<DateTime<Utc>>,
}

impl StockSummary {
    /// Summary of a wine with no recorded events.
    pub fn zero() -> Self {
        Self {
            current_stock: 0,
            total_acquired: 0,
            total_consumed: 0,
            last_event_at: None,
        }
    }

    /// Fold a wine's event sequence into its stock summary.
    ///
    /// Events are ordered by `(event_date, id)` before folding, so the result
    /// is deterministic regardless of input order. Each `add` raises the
    /// balance by its quantity; each `drink` lowers it and, when an
    /// `error_quantity` correction is attached, nets the correction back in.
    /// Corrections do not touch the acquisition/consumption totals.
    ///
    /// Fails with [`NegativeStockError`] the first time the running balance
    /// dips below zero, which is how a prospective event is vetted before it
    /// is committed.
    pub fn from_events(events: &[StoredInventoryEvent]) -> Result<Self, NegativeStockError> {
        let mut ordered: Vec<&StoredInventoryEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.sort_key());

        let mut balance: i64 = 0;
        let mut total_acquired: i64 = 0;
        let mut total_consumed: i64 = 0;
        let mut last_event_at: Option<DateTime<Utc>> = None;

        for event in ordered {
            match event.event_type {
                EventType::Add => {
                    balance += i64::from(event.quantity);
                    total_acquired += i64::from(event.quantity);
                }
                EventType::Drink => {
                    balance -= i64::from(event.quantity);
                    total_consumed += i64::from(event.quantity);
                    if let Some(correction) = event.error_quantity {
                        balance += i64::from(correction);
                    }
                }
            }

            if balance < 0 {
                return Err(NegativeStockError {
                    event_id: event.id,
                    balance,
                });
            }

            last_event_at = Some(event.event_date);
        }

        Ok(Self {
            current_stock: balance,
            total_acquired,
            total_consumed,
            last_event_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NewInventoryEvent;
    use chrono::TimeZone;

    fn at(id: i64, event: NewInventoryEvent) -> StoredInventoryEvent {
        event.into_stored(id)
    }

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_ledger_is_zero_summary() {
        let summary = StockSummary::from_events(&[]).unwrap();
        assert_eq!(summary, StockSummary::zero());
        assert!(summary.last_event_at.is_none());
    }

    #[test]
    fn test_acquire_drink_correct_sequence() {
        // The worked example: +12, -5, failed -10 never lands, +2 correction.
        let events = vec![
            at(1, NewInventoryEvent::acquisition(1, 12, Some("purchase".into()), None, None, Some(date(1)))),
            at(2, NewInventoryEvent::consumption(1, 5, Some(date(2)))),
            at(3, NewInventoryEvent::correction(1, 2, Some(date(3)))),
        ];

        let summary = StockSummary::from_events(&events).unwrap();
        assert_eq!(summary.current_stock, 9);
        assert_eq!(summary.total_acquired, 12);
        assert_eq!(summary.total_consumed, 5);
        assert_eq!(summary.last_event_at, Some(date(3)));
    }

    #[test]
    fn test_negative_balance_names_offending_event() {
        let events = vec![
            at(1, NewInventoryEvent::acquisition(1, 3, None, None, None, Some(date(1)))),
            at(2, NewInventoryEvent::consumption(1, 5, Some(date(2)))),
        ];

        let err = StockSummary::from_events(&events).unwrap_err();
        assert_eq!(err.event_id, 2);
        assert_eq!(err.balance, -2);
    }

    #[test]
    fn test_negative_correction_can_underflow() {
        // An under-counted consumption correction removes bottles too.
        let events = vec![
            at(1, NewInventoryEvent::acquisition(1, 2, None, None, None, Some(date(1)))),
            at(2, NewInventoryEvent::consumption(1, 2, Some(date(2)))),
            at(3, NewInventoryEvent::correction(1, -1, Some(date(3)))),
        ];

        let err = StockSummary::from_events(&events).unwrap_err();
        assert_eq!(err.event_id, 3);
    }

    #[test]
    fn test_corrections_do_not_affect_totals() {
        let events = vec![
            at(1, NewInventoryEvent::acquisition(1, 10, None, None, None, Some(date(1)))),
            at(2, NewInventoryEvent::consumption(1, 4, Some(date(2)))),
            at(3, NewInventoryEvent::correction(1, 3, Some(date(3)))),
        ];

        let summary = StockSummary::from_events(&events).unwrap();
        assert_eq!(summary.total_acquired, 10);
        assert_eq!(summary.total_consumed, 4);
        assert_eq!(summary.current_stock, 9);
    }

    #[test]
    fn test_backdated_event_is_replayed_in_date_order() {
        // A backdated drink before the acquisition must fail even though it
        // was appended last.
        let events = vec![
            at(1, NewInventoryEvent::acquisition(1, 6, None, None, None, Some(date(10)))),
            at(2, NewInventoryEvent::consumption(1, 2, Some(date(2)))),
        ];

        let err = StockSummary::from_events(&events).unwrap_err();
        assert_eq!(err.event_id, 2);
    }

    #[test]
    fn test_same_date_ties_break_by_id() {
        // drink(id=3) must replay after add(id=2) despite the shared date.
        let shared = date(5);
        let events = vec![
            at(3, NewInventoryEvent::consumption(1, 4, Some(shared))),
            at(2, NewInventoryEvent::acquisition(1, 4, None, None, None, Some(shared))),
        ];

        let summary = StockSummary::from_events(&events).unwrap();
        assert_eq!(summary.current_stock, 0);
    }

    #[test]
    fn test_replay_is_idempotent_and_order_independent() {
        let mut events = vec![
            at(1, NewInventoryEvent::acquisition(1, 12, None, None, None, Some(date(1)))),
            at(2, NewInventoryEvent::consumption(1, 5, Some(date(2)))),
            at(3, NewInventoryEvent::acquisition(1, 6, Some("gift".into()), None, None, Some(date(3)))),
            at(4, NewInventoryEvent::correction(1, 2, Some(date(4)))),
        ];

        let first = StockSummary::from_events(&events).unwrap();
        events.reverse();
        let second = StockSummary::from_events(&events).unwrap();
        assert_eq!(first, second);

        // Naive independent replay: adds minus drinks plus corrections.
        let expected = 12 - 5 + 6 + 2;
        assert_eq!(first.current_stock, expected);
    }
}
