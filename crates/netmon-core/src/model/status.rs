// ── Per-cycle status records ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// WAN state value that counts towards availability.
pub const WAN_UP: &str = "up";

/// One router status reading. Exactly one per successful fetch cycle.
///
/// Counters default to 0 when the device omits them. Physical readings
/// (optical power, temperature) stay `None`: a 0 would be a false reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Assigned by the store on insert.
    pub id: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub wan_state: Option<String>,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub optical_rx: Option<f64>,
    pub optical_tx: Option<f64>,
    pub cpu_temp: Option<f64>,
    pub pppoe_reconnect_count: u64,
    pub wan_down_count: u64,
}

impl StatusSnapshot {
    pub fn is_wan_up(&self) -> bool {
        self.wan_state.as_deref() == Some(WAN_UP)
    }
}

/// One ping target's result within a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingSample {
    pub id: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub target: String,
    pub rtt: Option<f64>,
    /// 0 means no loss observed.
    pub loss: u64,
}

impl PingSample {
    pub fn has_loss(&self) -> bool {
        self.loss > 0
    }
}
