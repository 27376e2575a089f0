// ── Derived statistics ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Windowed aggregate over the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Share of snapshots with WAN up. 0 when there are no snapshots.
    pub wan_availability_pct: f64,
    /// Share of ping samples with loss. 0 when there are no samples.
    pub packet_loss_pct: f64,
    /// Mean of non-null temperatures, one decimal. `None` when there are none.
    pub avg_cpu_temp: Option<f64>,
    pub pppoe_event_count: u64,
    pub wan_event_count: u64,
    /// Snapshots in the window.
    pub total_records: u64,
    pub monitoring_hours: u32,
}

/// Per-hour rollup. At most one per `hour`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyStats {
    pub id: Option<u64>,
    /// Start of the hour, truncated.
    pub hour: DateTime<Utc>,
    pub avg_ping_rtt: Option<f64>,
    pub max_ping_rtt: Option<f64>,
    pub min_ping_rtt: Option<f64>,
    pub packet_loss_count: u64,
    pub pppoe_reconnect_count: u64,
    pub wan_down_count: u64,
    pub avg_cpu_temp: Option<f64>,
    pub max_cpu_temp: Option<f64>,
}
