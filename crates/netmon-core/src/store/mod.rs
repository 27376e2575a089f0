// ── Record store ──
//
// Three append-mostly tables (status, ping samples, events) plus the hourly
// rollup table. The pipeline and the query surface only see the
// `RecordStore` trait; `MemoryStore` is the bundled implementation.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{EventKey, HourlyStats, NetworkEvent, PingSample, StatusSnapshot, TimeWindow};

/// Rows removed by a retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub snapshots: usize,
    pub pings: usize,
}

/// Time-ordered storage with query-by-range.
///
/// Range reads return rows newest first. Writes assign `id`s and never
/// update existing rows.
pub trait RecordStore: Send + Sync {
    // ── Writes ───────────────────────────────────────────────────────

    fn insert_status(&self, snapshot: StatusSnapshot) -> Result<u64, CoreError>;

    fn insert_pings(&self, samples: Vec<PingSample>) -> Result<usize, CoreError>;

    /// Look up an event by identity key.
    fn find_event(&self, key: &EventKey) -> Result<Option<NetworkEvent>, CoreError>;

    /// Insert an event. Fails with [`CoreError::Conflict`] if the key exists.
    fn insert_event(&self, event: NetworkEvent) -> Result<u64, CoreError>;

    /// Insert a rollup. Fails with [`CoreError::Store`] if the hour exists.
    fn insert_hourly_stats(&self, stats: HourlyStats) -> Result<u64, CoreError>;

    // ── Range reads ──────────────────────────────────────────────────

    fn statuses_in(&self, window: &TimeWindow) -> Result<Vec<StatusSnapshot>, CoreError>;

    fn pings_in(&self, window: &TimeWindow) -> Result<Vec<PingSample>, CoreError>;

    /// Events whose `event_time` falls in `window`.
    fn events_in(&self, window: &TimeWindow) -> Result<Vec<NetworkEvent>, CoreError>;

    /// Most recent events by `event_time`, optionally filtered by exact type.
    fn recent_events(
        &self,
        limit: usize,
        event_type: Option<&str>,
    ) -> Result<Vec<NetworkEvent>, CoreError>;

    fn hourly_stats(&self, hour: DateTime<Utc>) -> Result<Option<HourlyStats>, CoreError>;

    // ── Maintenance ──────────────────────────────────────────────────

    /// Delete snapshots and ping samples older than `cutoff`. Events are kept.
    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<PurgeReport, CoreError>;

    /// Cheap reachability probe.
    fn check_health(&self) -> Result<(), CoreError>;
}
