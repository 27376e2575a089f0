// ── In-memory record store ──
//
// Every table is a `BTreeMap` keyed by `(timestamp, id)`, so range reads are
// ordered scans and retention is a single `split_off`. The event table has
// a unique index on `EventKey`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::{PurgeReport, RecordStore};
use crate::error::CoreError;
use crate::model::{EventKey, HourlyStats, NetworkEvent, PingSample, StatusSnapshot, TimeWindow};

type RowKey = (DateTime<Utc>, u64);

#[derive(Default)]
struct Tables {
    next_id: u64,
    statuses: BTreeMap<RowKey, StatusSnapshot>,
    pings: BTreeMap<RowKey, PingSample>,
    /// Keyed by `event_time`, not by when the row was written.
    events: BTreeMap<RowKey, NetworkEvent>,
    event_index: HashMap<EventKey, RowKey>,
    hourly: BTreeMap<DateTime<Utc>, HourlyStats>,
}

impl Tables {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe store held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_count(&self) -> usize {
        self.read().map(|t| t.statuses.len()).unwrap_or_default()
    }

    pub fn ping_count(&self) -> usize {
        self.read().map(|t| t.pings.len()).unwrap_or_default()
    }

    pub fn event_count(&self) -> usize {
        self.read().map(|t| t.events.len()).unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, CoreError> {
        self.tables.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, CoreError> {
        self.tables.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> CoreError {
    CoreError::Store {
        message: "store lock poisoned".into(),
    }
}

fn range_of<T: Clone>(map: &BTreeMap<RowKey, T>, window: &TimeWindow) -> Vec<T> {
    if window.start > window.end {
        return Vec::new();
    }
    map.range((window.start, 0)..=(window.end, u64::MAX))
        .rev()
        .map(|(_, row)| row.clone())
        .collect()
}

/// Drop every row keyed strictly before `cutoff`; returns how many went.
fn purge<T>(map: &mut BTreeMap<RowKey, T>, cutoff: DateTime<Utc>) -> usize {
    let kept = map.split_off(&(cutoff, 0));
    let removed = map.len();
    *map = kept;
    removed
}

impl RecordStore for MemoryStore {
    fn insert_status(&self, mut snapshot: StatusSnapshot) -> Result<u64, CoreError> {
        let mut t = self.write()?;
        let id = t.allocate_id();
        snapshot.id = Some(id);
        t.statuses.insert((snapshot.timestamp, id), snapshot);
        Ok(id)
    }

    fn insert_pings(&self, samples: Vec<PingSample>) -> Result<usize, CoreError> {
        let mut t = self.write()?;
        let count = samples.len();
        for mut sample in samples {
            let id = t.allocate_id();
            sample.id = Some(id);
            t.pings.insert((sample.timestamp, id), sample);
        }
        Ok(count)
    }

    fn find_event(&self, key: &EventKey) -> Result<Option<NetworkEvent>, CoreError> {
        let t = self.read()?;
        Ok(t.event_index
            .get(key)
            .and_then(|row| t.events.get(row))
            .cloned())
    }

    fn insert_event(&self, mut event: NetworkEvent) -> Result<u64, CoreError> {
        let mut t = self.write()?;
        let key = event.key();
        if t.event_index.contains_key(&key) {
            return Err(CoreError::Conflict {
                event_time: key.event_time,
                event_type: key.event_type,
            });
        }
        let id = t.allocate_id();
        event.id = Some(id);
        let row = (event.event_time, id);
        t.events.insert(row, event);
        t.event_index.insert(key, row);
        Ok(id)
    }

    fn insert_hourly_stats(&self, mut stats: HourlyStats) -> Result<u64, CoreError> {
        let mut t = self.write()?;
        if t.hourly.contains_key(&stats.hour) {
            return Err(CoreError::Store {
                message: format!("hourly stats for {} already exist", stats.hour),
            });
        }
        let id = t.allocate_id();
        stats.id = Some(id);
        t.hourly.insert(stats.hour, stats);
        Ok(id)
    }

    fn statuses_in(&self, window: &TimeWindow) -> Result<Vec<StatusSnapshot>, CoreError> {
        Ok(range_of(&self.read()?.statuses, window))
    }

    fn pings_in(&self, window: &TimeWindow) -> Result<Vec<PingSample>, CoreError> {
        Ok(range_of(&self.read()?.pings, window))
    }

    fn events_in(&self, window: &TimeWindow) -> Result<Vec<NetworkEvent>, CoreError> {
        Ok(range_of(&self.read()?.events, window))
    }

    fn recent_events(
        &self,
        limit: usize,
        event_type: Option<&str>,
    ) -> Result<Vec<NetworkEvent>, CoreError> {
        let t = self.read()?;
        Ok(t.events
            .values()
            .rev()
            .filter(|e| event_type.is_none_or(|ty| e.event_type == ty))
            .take(limit)
            .cloned()
            .collect())
    }

    fn hourly_stats(&self, hour: DateTime<Utc>) -> Result<Option<HourlyStats>, CoreError> {
        Ok(self.read()?.hourly.get(&hour).cloned())
    }

    fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<PurgeReport, CoreError> {
        let mut t = self.write()?;
        Ok(PurgeReport {
            snapshots: purge(&mut t.statuses, cutoff),
            pings: purge(&mut t.pings, cutoff),
        })
    }

    fn check_health(&self) -> Result<(), CoreError> {
        self.read().map(|_| ())
    }
}
