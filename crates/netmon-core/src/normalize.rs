// ── Payload normalizer ──
//
// Maps one status payload onto flat records sharing the cycle timestamp:
// one StatusSnapshot, one PingSample per ping target, and the raw events
// for the deduplicator.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use netmon_api::{EventEntry, StatusPayload};

use crate::error::CoreError;
use crate::model::event::UNKNOWN_EVENT_TYPE;
use crate::model::{PingSample, RawEvent, StatusSnapshot};

/// Device-local timestamp format, read as UTC.
const DEVICE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything one cycle will try to write.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCycle {
    pub snapshot: StatusSnapshot,
    pub pings: Vec<PingSample>,
    pub events: Vec<RawEvent>,
}

/// Normalize a parsed payload.
///
/// Fails with [`CoreError::EmptyPayload`] when there is no `realtime`
/// section; in that case nothing at all may be written.
pub fn normalize(payload: &Value, timestamp: DateTime<Utc>) -> Result<NormalizedCycle, CoreError> {
    let payload = StatusPayload::deserialize(payload).map_err(|e| {
        warn!(error = %e, "status payload is not an object");
        CoreError::EmptyPayload
    })?;
    let realtime = payload.realtime.ok_or(CoreError::EmptyPayload)?;
    let summary = payload.summary.unwrap_or_default();
    let errors = realtime.wan_errors.unwrap_or_default();
    let optical = realtime.optical_power.unwrap_or_default();

    let snapshot = StatusSnapshot {
        id: None,
        timestamp,
        wan_state: realtime.wan_state,
        rx_errors: errors.rx_errors.unwrap_or(0),
        tx_errors: errors.tx_errors.unwrap_or(0),
        rx_dropped: errors.rx_dropped.unwrap_or(0),
        tx_dropped: errors.tx_dropped.unwrap_or(0),
        optical_rx: optical.rx,
        optical_tx: optical.tx,
        cpu_temp: realtime.cpu_temp,
        pppoe_reconnect_count: summary.pppoe_reconnect_count_24h.unwrap_or(0),
        wan_down_count: summary.wan_down_count_24h.unwrap_or(0),
    };

    let pings = realtime
        .ping
        .unwrap_or_default()
        .into_iter()
        .map(|(target, entry)| PingSample {
            id: None,
            timestamp,
            target,
            rtt: entry.rtt,
            loss: entry.loss.unwrap_or(0),
        })
        .collect();

    let events = payload
        .events
        .into_iter()
        .map(|entry| raw_event(entry, timestamp))
        .collect();

    Ok(NormalizedCycle {
        snapshot,
        pings,
        events,
    })
}

fn raw_event(entry: EventEntry, cycle: DateTime<Utc>) -> RawEvent {
    let event_time = match entry.time {
        None | Some(Value::Null) => cycle,
        Some(raw) => parse_event_time(&raw).unwrap_or_else(|| {
            warn!(time = %raw, "unparseable event time, using cycle timestamp");
            cycle
        }),
    };
    RawEvent {
        event_time,
        event_type: entry
            .event_type
            .unwrap_or_else(|| UNKNOWN_EVENT_TYPE.to_owned()),
        message: entry.message.unwrap_or_default(),
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or epoch seconds.
pub fn parse_event_time(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::Number(n) => from_epoch(n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(t) = DateTime::parse_from_rfc3339(s) {
                return Some(t.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, DEVICE_TIME_FORMAT) {
                return Some(Utc.from_utc_datetime(&naive));
            }
            s.parse::<f64>().ok().and_then(from_epoch)
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn from_epoch(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
}
