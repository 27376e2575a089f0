// ── Discrete router events ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used when the device omits an event's type.
pub const UNKNOWN_EVENT_TYPE: &str = "unknown";

/// Logical identity of an event. At most one stored row per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey {
    pub event_time: DateTime<Utc>,
    pub event_type: String,
}

/// An event as reported by one payload, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_time: DateTime<Utc>,
    pub event_type: String,
    pub message: String,
}

impl RawEvent {
    pub fn key(&self) -> EventKey {
        EventKey {
            event_time: self.event_time,
            event_type: self.event_type.clone(),
        }
    }
}

/// A stored event. Never updated: later reports of the same key are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEvent {
    pub id: Option<u64>,
    /// When this row was written (the cycle timestamp).
    pub recorded_at: DateTime<Utc>,
    pub event_time: DateTime<Utc>,
    pub event_type: String,
    pub message: String,
}

impl NetworkEvent {
    pub fn from_raw(raw: &RawEvent, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            recorded_at,
            event_time: raw.event_time,
            event_type: raw.event_type.clone(),
            message: raw.message.clone(),
        }
    }

    pub fn key(&self) -> EventKey {
        EventKey {
            event_time: self.event_time,
            event_type: self.event_type.clone(),
        }
    }

    /// PPPoE session events: literal prefix match.
    pub fn is_pppoe(&self) -> bool {
        self.event_type.starts_with("pppoe")
    }

    /// WAN events: substring match anywhere in the type.
    pub fn is_wan(&self) -> bool {
        self.event_type.contains("wan")
    }
}
