// ── Read-side query surface ──
//
// Parameter structs with their defaults, and the functions that answer
// them from a `RecordStore`. None of these fail because ingestion failed;
// they return whatever has accumulated, possibly nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{NetworkEvent, PingSample, StatusSnapshot, TimeWindow};
use crate::store::RecordStore;

/// Hard cap on ping rows returned by one query.
pub const MAX_PING_ROWS: usize = 500;
/// Hard cap on event rows in a history page.
pub const MAX_HISTORY_EVENTS: usize = 100;

pub const DEFAULT_WINDOW_HOURS: u32 = 24;

// ── Parameters ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingHistoryQuery {
    pub hours: u32,
    /// Exact target match.
    pub target: Option<String>,
}

impl Default for PingHistoryQuery {
    fn default() -> Self {
        Self {
            hours: DEFAULT_WINDOW_HOURS,
            target: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsQuery {
    pub limit: usize,
    /// Exact type match.
    pub event_type: Option<String>,
}

impl Default for EventsQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            event_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub hours: u32,
    pub offset: usize,
    pub limit: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            hours: DEFAULT_WINDOW_HOURS,
            offset: 0,
            limit: 100,
        }
    }
}

// ── Results ──────────────────────────────────────────────────────────

/// One page of snapshots plus the pings and events of the same window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    /// Snapshots in the whole window, not just this page.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub status: Vec<StatusSnapshot>,
    pub pings: Vec<PingSample>,
    pub events: Vec<NetworkEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub healthy: bool,
    pub store_error: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub cycle_state: String,
    pub checked_at: DateTime<Utc>,
}

// ── Queries ──────────────────────────────────────────────────────────

/// Ping samples in the trailing window, newest first, at most 500.
pub fn ping_history(
    store: &dyn RecordStore,
    query: &PingHistoryQuery,
    now: DateTime<Utc>,
) -> Result<Vec<PingSample>, CoreError> {
    let window = TimeWindow::trailing(query.hours, now);
    Ok(store
        .pings_in(&window)?
        .into_iter()
        .filter(|p| query.target.as_deref().is_none_or(|t| p.target == t))
        .take(MAX_PING_ROWS)
        .collect())
}

/// Most recent events by `event_time`.
pub fn events(store: &dyn RecordStore, query: &EventsQuery) -> Result<Vec<NetworkEvent>, CoreError> {
    store.recent_events(query.limit, query.event_type.as_deref())
}

pub fn history(
    store: &dyn RecordStore,
    query: &HistoryQuery,
    now: DateTime<Utc>,
) -> Result<HistoryPage, CoreError> {
    let window = TimeWindow::trailing(query.hours, now);
    let statuses = store.statuses_in(&window)?;
    let total = statuses.len();
    let status = statuses
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    let mut pings = store.pings_in(&window)?;
    pings.truncate(MAX_PING_ROWS);
    let mut events = store.events_in(&window)?;
    events.truncate(MAX_HISTORY_EVENTS);

    Ok(HistoryPage {
        total,
        offset: query.offset,
        limit: query.limit,
        status,
        pings,
        events,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryStore;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn ping(at: DateTime<Utc>, target: &str) -> PingSample {
        PingSample {
            id: None,
            timestamp: at,
            target: target.into(),
            rtt: Some(1.0),
            loss: 0,
        }
    }

    fn snapshot(at: DateTime<Utc>) -> StatusSnapshot {
        StatusSnapshot {
            id: None,
            timestamp: at,
            wan_state: Some("up".into()),
            rx_errors: 0,
            tx_errors: 0,
            rx_dropped: 0,
            tx_dropped: 0,
            optical_rx: None,
            optical_tx: None,
            cpu_temp: None,
            pppoe_reconnect_count: 0,
            wan_down_count: 0,
        }
    }

    #[test]
    fn ping_history_is_capped_and_newest_first() {
        let store = MemoryStore::new();
        let samples = (0..600)
            .map(|i| ping(now() - Duration::seconds(i), "8.8.8.8"))
            .collect();
        store.insert_pings(samples).unwrap();

        let rows = ping_history(&store, &PingHistoryQuery::default(), now()).unwrap();
        assert_eq!(rows.len(), MAX_PING_ROWS);
        assert_eq!(rows[0].timestamp, now());
        assert!(rows.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn ping_history_filters_target_and_window() {
        let store = MemoryStore::new();
        store
            .insert_pings(vec![
                ping(now(), "8.8.8.8"),
                ping(now(), "1.1.1.1"),
                ping(now() - Duration::hours(3), "1.1.1.1"),
            ])
            .unwrap();

        let query = PingHistoryQuery {
            hours: 1,
            target: Some("1.1.1.1".into()),
        };
        let rows = ping_history(&store, &query, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].target, "1.1.1.1");
    }

    #[test]
    fn history_pages_snapshots() {
        let store = MemoryStore::new();
        for m in 0..5 {
            store.insert_status(snapshot(now() - Duration::minutes(m))).unwrap();
        }
        let page = history(
            &store,
            &HistoryQuery {
                hours: 24,
                offset: 1,
                limit: 2,
            },
            now(),
        )
        .unwrap();
        assert_eq!(page.total, 5);
        let times: Vec<_> = page.status.iter().map(|s| s.timestamp).collect();
        assert_eq!(
            times,
            vec![now() - Duration::minutes(1), now() - Duration::minutes(2)]
        );
    }

    #[test]
    fn defaults() {
        assert_eq!(EventsQuery::default().limit, 50);
        assert_eq!(HistoryQuery::default().limit, 100);
        assert_eq!(PingHistoryQuery::default().hours, 24);
    }
}
