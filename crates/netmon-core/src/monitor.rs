// ── Poll scheduler ──
//
// Owns the ingestion pipeline for one device: fetch → normalize → persist,
// on a fixed interval and on demand. Cycles are single-flight through the
// ledger mutex, so the scheduled and on-demand paths never overlap.
// Background tasks also run the hourly rollup and the daily retention pass.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregate::{self, hour_floor};
use crate::config::MonitorConfig;
use crate::dedup::persist_event;
use crate::error::CoreError;
use crate::fetch::Fetcher;
use crate::model::{HourlyStats, NetworkEvent, PingSample, StatsSummary, TimeWindow};
use crate::normalize::normalize;
use crate::query::{self, EventsQuery, Health, HistoryPage, HistoryQuery, PingHistoryQuery};
use crate::store::{MemoryStore, PurgeReport, RecordStore};

const ROLLUP_INTERVAL: Duration = Duration::from_secs(3600);
const RETENTION_INTERVAL: Duration = Duration::from_secs(24 * 3600);

// ── CycleState ───────────────────────────────────────────────────────

/// Pipeline stage, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    Idle,
    Fetching,
    Normalizing,
    Persisting,
}

/// What one successful cycle wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub timestamp: DateTime<Utc>,
    pub snapshots: usize,
    pub pings: usize,
    pub events_inserted: usize,
    pub events_skipped: usize,
}

/// State held across cycles by the single-flight guard.
#[derive(Debug, Default)]
struct CycleLedger {
    last_timestamp: Option<DateTime<Utc>>,
}

impl CycleLedger {
    /// Next cycle timestamp; never earlier than the previous one.
    fn next_timestamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let ts = self.last_timestamp.map_or(now, |last| now.max(last));
        self.last_timestamp = Some(ts);
        ts
    }
}

// ── Monitor ──────────────────────────────────────────────────────────

/// Handle to the pipeline. Cheaply cloneable via `Arc<MonitorInner>`;
/// every clone drives the same store and the same single-flight guard.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    fetcher: Fetcher,
    store: Arc<dyn RecordStore>,
    cycle: Mutex<CycleLedger>,
    state: watch::Sender<CycleState>,
    last_success: watch::Sender<Option<DateTime<Utc>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Monitor {
    /// Create a monitor backed by a fresh [`MemoryStore`]. Does NOT start
    /// polling; call [`start()`](Self::start) for that.
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: MonitorConfig, store: Arc<dyn RecordStore>) -> Self {
        let fetcher = Fetcher::from_config(&config);
        let (state, _) = watch::channel(CycleState::Idle);
        let (last_success, _) = watch::channel(None);

        Self {
            inner: Arc::new(MonitorInner {
                config,
                fetcher,
                store,
                cycle: Mutex::new(CycleLedger::default()),
                state,
                last_success,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the background tasks. The first poll runs immediately.
    pub async fn start(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        config.validate()?;

        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!("monitor already started");
            return Ok(());
        }

        let cancel = self.inner.cancel.clone();
        handles.push(tokio::spawn(poll_task(
            self.clone(),
            config.poll_interval,
            cancel.clone(),
        )));
        if config.rollup_enabled {
            handles.push(tokio::spawn(rollup_task(self.clone(), cancel.clone())));
        }
        handles.push(tokio::spawn(retention_task(self.clone(), cancel)));

        info!(
            host = %config.host,
            port = config.port,
            interval = ?config.poll_interval,
            "monitor started"
        );
        Ok(())
    }

    /// Cancel background tasks and wait for them. An in-flight cycle is
    /// allowed to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("monitor stopped");
    }

    // ── Ingestion ────────────────────────────────────────────────────

    /// Run one serialized fetch cycle.
    ///
    /// Waits for any in-flight cycle first. A fetch failure or empty
    /// payload writes nothing and returns an error; a store failure stops
    /// the remaining writes of this cycle.
    pub async fn run_cycle(&self) -> Result<CycleReport, CoreError> {
        let mut ledger = self.inner.cycle.lock().await;
        let timestamp = ledger.next_timestamp(Utc::now());

        let result = self.cycle_at(timestamp).await;
        self.set_state(CycleState::Idle);
        drop(ledger);

        match &result {
            Ok(report) => {
                self.inner.last_success.send_replace(Some(report.timestamp));
                info!(
                    pings = report.pings,
                    events_inserted = report.events_inserted,
                    events_skipped = report.events_skipped,
                    "cycle complete"
                );
            }
            Err(e) => warn!(error = %e, "cycle aborted"),
        }
        result
    }

    /// Out-of-band cycle. Same pipeline, same guard; the periodic cadence
    /// is not reset.
    pub async fn fetch_now(&self) -> Result<CycleReport, CoreError> {
        debug!("on-demand fetch requested");
        self.run_cycle().await
    }

    /// Fetch the payload without persisting anything. Failures are logged
    /// with their cause before mapping to [`CoreError::Unavailable`].
    pub async fn raw_status(&self) -> Result<Value, CoreError> {
        Ok(self.inner.fetcher.try_fetch().await?)
    }

    async fn cycle_at(&self, timestamp: DateTime<Utc>) -> Result<CycleReport, CoreError> {
        self.set_state(CycleState::Fetching);
        let payload = self
            .inner
            .fetcher
            .fetch()
            .await
            .ok_or_else(|| CoreError::Unavailable {
                reason: format!("no status payload from {}", self.inner.fetcher.client().addr()),
            })?;

        self.set_state(CycleState::Normalizing);
        let cycle = normalize(&payload, timestamp)?;

        self.set_state(CycleState::Persisting);
        let store = self.inner.store.as_ref();
        store.insert_status(cycle.snapshot)?;
        let pings = store.insert_pings(cycle.pings)?;

        let mut events_inserted = 0;
        for raw in &cycle.events {
            if persist_event(store, raw, timestamp)? {
                events_inserted += 1;
            }
        }

        Ok(CycleReport {
            timestamp,
            snapshots: 1,
            pings,
            events_inserted,
            events_skipped: cycle.events.len() - events_inserted,
        })
    }

    fn set_state(&self, state: CycleState) {
        self.inner.state.send_replace(state);
    }

    // ── Maintenance ──────────────────────────────────────────────────

    /// Roll up the last full hour before `now`.
    pub fn rollup_previous_hour(&self, now: DateTime<Utc>) -> Result<Option<HourlyStats>, CoreError> {
        let hour = hour_floor(now) - TimeDelta::hours(1);
        aggregate::rollup_hour(self.inner.store.as_ref(), hour)
    }

    /// Purge snapshots and ping samples older than the retention period.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<PurgeReport, CoreError> {
        let retention = TimeDelta::from_std(self.inner.config.retention).map_err(|e| {
            CoreError::Config {
                message: format!("retention out of range: {e}"),
            }
        })?;
        let cutoff = now.checked_sub_signed(retention).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let report = self.inner.store.purge_before(cutoff)?;
        if report.snapshots > 0 || report.pings > 0 {
            info!(snapshots = report.snapshots, pings = report.pings, "expired records purged");
        }
        Ok(report)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn summary(&self, hours: u32) -> Result<StatsSummary, CoreError> {
        let window = TimeWindow::trailing(hours, Utc::now());
        aggregate::summarize(self.inner.store.as_ref(), &window, hours)
    }

    pub fn ping_history(&self, q: &PingHistoryQuery) -> Result<Vec<PingSample>, CoreError> {
        query::ping_history(self.inner.store.as_ref(), q, Utc::now())
    }

    pub fn events(&self, q: &EventsQuery) -> Result<Vec<NetworkEvent>, CoreError> {
        query::events(self.inner.store.as_ref(), q)
    }

    pub fn history(&self, q: &HistoryQuery) -> Result<HistoryPage, CoreError> {
        query::history(self.inner.store.as_ref(), q, Utc::now())
    }

    pub fn health(&self) -> Health {
        let store_error = self.inner.store.check_health().err().map(|e| e.to_string());
        Health {
            healthy: store_error.is_none(),
            store_error,
            last_success: *self.inner.last_success.borrow(),
            cycle_state: self.inner.state.borrow().to_string(),
            checked_at: Utc::now(),
        }
    }

    // ── State observation ────────────────────────────────────────────

    pub fn subscribe_state(&self) -> watch::Receiver<CycleState> {
        self.inner.state.subscribe()
    }

    pub fn last_success(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.inner.last_success.subscribe()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Poll on a fixed interval. The immediate first tick is the initial fetch.
async fn poll_task(monitor: Monitor, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are logged inside; the next tick is the retry.
                let _ = monitor.run_cycle().await;
            }
        }
    }
}

async fn rollup_task(monitor: Monitor, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(ROLLUP_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = monitor.rollup_previous_hour(Utc::now()) {
                    warn!(error = %e, "hourly rollup failed");
                }
            }
        }
    }
}

async fn retention_task(monitor: Monitor, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(RETENTION_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = monitor.purge_expired(Utc::now()) {
                    warn!(error = %e, "retention pass failed");
                }
            }
        }
    }
}
