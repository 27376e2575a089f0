// ── Event deduplicator ──
//
// First write wins per (event_time, event_type). A repeated report of the
// same key is dropped, even if its message differs.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::error::CoreError;
use crate::model::{NetworkEvent, RawEvent};
use crate::store::RecordStore;

/// Persist `raw` unless an event with the same identity key is stored.
///
/// Returns `true` if a row was inserted. A unique-index conflict from the
/// store counts as "already present", so the at-most-one-row guarantee
/// holds even without the caller's single-flight guard.
pub fn persist_event(
    store: &dyn RecordStore,
    raw: &RawEvent,
    recorded_at: DateTime<Utc>,
) -> Result<bool, CoreError> {
    let key = raw.key();
    if store.find_event(&key)?.is_some() {
        trace!(event_type = %key.event_type, event_time = %key.event_time, "duplicate event skipped");
        return Ok(false);
    }
    match store.insert_event(NetworkEvent::from_raw(raw, recorded_at)) {
        Ok(_) => Ok(true),
        Err(CoreError::Conflict { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn raw(at: DateTime<Utc>, ty: &str, msg: &str) -> RawEvent {
        RawEvent {
            event_time: at,
            event_type: ty.into(),
            message: msg.into(),
        }
    }

    #[test]
    fn same_key_is_stored_once_first_message_wins() {
        let store = MemoryStore::new();
        assert!(persist_event(&store, &raw(t0(), "wan_down", "first"), t0()).unwrap());
        assert!(!persist_event(&store, &raw(t0(), "wan_down", "second"), t0()).unwrap());

        let events = store.recent_events(10, None).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "first");
    }

    #[test]
    fn key_is_time_and_type() {
        let store = MemoryStore::new();
        assert!(persist_event(&store, &raw(t0(), "wan_down", ""), t0()).unwrap());
        assert!(persist_event(&store, &raw(t0(), "wan_up", ""), t0()).unwrap());
        assert!(
            persist_event(&store, &raw(t0() + Duration::seconds(1), "wan_down", ""), t0()).unwrap()
        );
        assert_eq!(store.event_count(), 3);
    }
}
