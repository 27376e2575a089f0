#![allow(clippy::unwrap_used)]
// End-to-end pipeline tests: a loopback fake device feeding a `Monitor`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::TimeDelta;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use netmon_core::{
    CoreError, CycleState, EventsQuery, HistoryQuery, MemoryStore, Monitor, MonitorConfig,
    PingHistoryQuery, RecordStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

/// A device that answers every connection with the current `body`.
struct FakeDevice {
    port: u16,
    body: Arc<Mutex<Vec<u8>>>,
    hits: Arc<AtomicUsize>,
}

impl FakeDevice {
    async fn start(body: &[u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let body = Arc::new(Mutex::new(body.to_vec()));
        let hits = Arc::new(AtomicUsize::new(0));

        let (shared, counter) = (Arc::clone(&body), Arc::clone(&hits));
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let response = shared.lock().await.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let _ = socket.write_all(&response).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { port, body, hits }
    }

    async fn respond_json(&self, payload: &Value) {
        let mut out = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n".to_vec();
        out.extend_from_slice(payload.to_string().as_bytes());
        *self.body.lock().await = out;
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn config(port: u16) -> MonitorConfig {
    MonitorConfig {
        host: "127.0.0.1".into(),
        port,
        timeout: Duration::from_secs(2),
        ..MonitorConfig::default()
    }
}

fn monitor_with_store(port: u16) -> (Monitor, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let monitor = Monitor::with_store(config(port), Arc::clone(&store) as Arc<dyn RecordStore>);
    (monitor, store)
}

fn payload_with_event() -> Value {
    json!({
        "realtime": {
            "wan_state": "up",
            "cpu_temp": 48.0,
            "ping": { "8.8.8.8": { "rtt": 12.5 }, "1.1.1.1": { "rtt": 9.1, "loss": 1 } }
        },
        "summary": { "pppoe_reconnect_count_24h": 1 },
        "events": [ { "time": "2024-05-01 10:00:00", "type": "wan_down", "message": "carrier lost" } ]
    })
}

// ── Ingestion ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_cycle_writes_snapshot_pings_and_event() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, store) = monitor_with_store(device.port);

    let report = monitor.fetch_now().await.unwrap();
    assert_eq!(report.snapshots, 1);
    assert_eq!(report.pings, 2);
    assert_eq!(report.events_inserted, 1);
    assert_eq!(report.events_skipped, 0);

    assert_eq!(store.status_count(), 1);
    assert_eq!(store.ping_count(), 2);

    let pings = monitor.ping_history(&PingHistoryQuery::default()).unwrap();
    assert!(pings.iter().all(|p| p.timestamp == report.timestamp));
}

#[tokio::test]
async fn test_repeated_event_is_stored_once() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, store) = monitor_with_store(device.port);

    monitor.run_cycle().await.unwrap();
    let second = monitor.run_cycle().await.unwrap();
    assert_eq!(second.events_inserted, 0);
    assert_eq!(second.events_skipped, 1);

    let events = monitor.events(&EventsQuery::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "wan_down");
    assert_eq!(events[0].message, "carrier lost");
    assert_eq!(store.status_count(), 2);
}

#[tokio::test]
async fn test_zero_byte_response_writes_nothing() {
    let device = FakeDevice::start(b"").await;
    let (monitor, store) = monitor_with_store(device.port);

    let err = monitor.run_cycle().await.unwrap_err();
    assert!(matches!(err, CoreError::Unavailable { .. }), "got: {err:?}");
    assert_eq!(store.status_count(), 0);
    assert_eq!(store.ping_count(), 0);
    assert_eq!(store.event_count(), 0);
    assert_eq!(*monitor.subscribe_state().borrow(), CycleState::Idle);
    assert!(monitor.health().last_success.is_none());
}

#[tokio::test]
async fn test_payload_without_realtime_writes_nothing() {
    let device = FakeDevice::start(b"").await;
    device
        .respond_json(&json!({ "events": [ { "type": "wan_down" } ] }))
        .await;
    let (monitor, store) = monitor_with_store(device.port);

    let err = monitor.run_cycle().await.unwrap_err();
    assert!(matches!(err, CoreError::EmptyPayload));
    assert_eq!(store.event_count(), 0);
    assert_eq!(store.status_count(), 0);
}

#[tokio::test]
async fn test_unreachable_device_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let (monitor, _store) = monitor_with_store(port);

    assert!(monitor.raw_status().await.unwrap_err().is_unavailable());
    assert!(monitor.fetch_now().await.unwrap_err().is_unavailable());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_triggers_are_serialized() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, store) = monitor_with_store(device.port);

    let runs: Vec<_> = (0..8)
        .map(|_| {
            let m = monitor.clone();
            tokio::spawn(async move { m.fetch_now().await })
        })
        .collect();

    let mut inserted = 0;
    for run in runs {
        inserted += run.await.unwrap().unwrap().events_inserted;
    }

    assert_eq!(inserted, 1);
    assert_eq!(store.event_count(), 1);
    assert_eq!(store.status_count(), 8);
    assert_eq!(device.hits(), 8);
}

// ── Queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_summary_and_history_after_cycles() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, _store) = monitor_with_store(device.port);

    monitor.run_cycle().await.unwrap();
    device
        .respond_json(&json!({ "realtime": { "wan_state": "down", "cpu_temp": 51.0 } }))
        .await;
    monitor.run_cycle().await.unwrap();

    let summary = monitor.summary(24).unwrap();
    assert_eq!(summary.total_records, 2);
    assert!((summary.wan_availability_pct - 50.0).abs() < f64::EPSILON);
    assert!((summary.packet_loss_pct - 50.0).abs() < f64::EPSILON);
    assert_eq!(summary.avg_cpu_temp, Some(49.5));

    let page = monitor.history(&HistoryQuery::default()).unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.status[0].wan_state.as_deref(), Some("down"));
    assert_eq!(page.pings.len(), 2);
}

#[tokio::test]
async fn test_raw_status_does_not_persist() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, store) = monitor_with_store(device.port);

    let raw = monitor.raw_status().await.unwrap();
    assert_eq!(raw["realtime"]["wan_state"], "up");
    assert_eq!(store.status_count(), 0);
}

// ── Scheduler ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_runs_initial_fetch() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, store) = monitor_with_store(device.port);

    let mut last_success = monitor.last_success();
    monitor.start().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), last_success.wait_for(Option::is_some))
        .await
        .unwrap()
        .unwrap();
    monitor.shutdown().await;

    assert_eq!(store.status_count(), 1);
    let health = monitor.health();
    assert!(health.healthy);
    assert_eq!(health.cycle_state, "idle");
}

#[tokio::test]
async fn test_health_reports_last_success_without_subscriber() {
    let device = FakeDevice::start(b"").await;
    device
        .respond_json(&json!({ "realtime": { "wan_state": "up" } }))
        .await;
    let (monitor, _store) = monitor_with_store(device.port);

    let report = monitor.fetch_now().await.unwrap();
    let health = monitor.health();
    assert_eq!(health.last_success, Some(report.timestamp));
    assert_eq!(*monitor.last_success().borrow(), Some(report.timestamp));
}

#[tokio::test]
async fn test_poll_repeats_every_interval() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let store = Arc::new(MemoryStore::new());
    let monitor = Monitor::with_store(
        MonitorConfig {
            poll_interval: Duration::from_secs(1),
            ..config(device.port)
        },
        Arc::clone(&store) as Arc<dyn RecordStore>,
    );

    monitor.start().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.status_count() < 2 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .unwrap();
    monitor.shutdown().await;

    assert!(device.hits() >= 2);
    assert_eq!(store.event_count(), 1);
}

// ── Maintenance ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_rollup_previous_hour_through_monitor() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, _store) = monitor_with_store(device.port);

    let report = monitor.fetch_now().await.unwrap();
    let next_hour = report.timestamp + TimeDelta::hours(1);

    let stats = monitor.rollup_previous_hour(next_hour).unwrap().unwrap();
    assert!(stats.hour <= report.timestamp);
    assert!(report.timestamp < stats.hour + TimeDelta::hours(1));
    assert_eq!(stats.max_ping_rtt, Some(12.5));
    assert_eq!(stats.min_ping_rtt, Some(9.1));
    assert!((stats.avg_ping_rtt.unwrap() - 10.8).abs() < 1e-9);
    assert_eq!(stats.packet_loss_count, 1);
    assert_eq!(stats.pppoe_reconnect_count, 1);
    assert_eq!(stats.avg_cpu_temp, Some(48.0));

    assert!(monitor.rollup_previous_hour(next_hour).unwrap().is_none());
    assert!(monitor.store().hourly_stats(stats.hour).unwrap().is_some());
}

#[tokio::test]
async fn test_purge_expired_keeps_events() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, store) = monitor_with_store(device.port);

    let report = monitor.fetch_now().await.unwrap();

    let nothing = monitor.purge_expired(report.timestamp).unwrap();
    assert_eq!((nothing.snapshots, nothing.pings), (0, 0));

    let retention = TimeDelta::from_std(monitor.config().retention).unwrap();
    let later = report.timestamp + retention + TimeDelta::days(1);
    let purged = monitor.purge_expired(later).unwrap();
    assert_eq!(purged.snapshots, 1);
    assert_eq!(purged.pings, 2);

    assert_eq!(store.status_count(), 0);
    assert_eq!(store.ping_count(), 0);
    assert_eq!(store.event_count(), 1);
}

#[tokio::test]
async fn test_queries_accept_huge_windows() {
    let device = FakeDevice::start(b"").await;
    device.respond_json(&payload_with_event()).await;
    let (monitor, _store) = monitor_with_store(device.port);
    monitor.fetch_now().await.unwrap();

    let summary = monitor.summary(u32::MAX).unwrap();
    assert_eq!(summary.total_records, 1);
    assert_eq!(summary.monitoring_hours, u32::MAX);

    let page = monitor
        .history(&HistoryQuery {
            hours: u32::MAX,
            ..HistoryQuery::default()
        })
        .unwrap();
    assert_eq!(page.total, 1);
    let pings = monitor
        .ping_history(&PingHistoryQuery {
            hours: u32::MAX,
            target: None,
        })
        .unwrap();
    assert_eq!(pings.len(), 2);
}
