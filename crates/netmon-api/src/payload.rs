// Status payload wire types
//
// Models for the JSON document the netmonitor endpoint returns. Firmware
// builds disagree about which sections exist and how numbers are encoded,
// so every field is optional and every section is parsed leniently: a
// malformed section reads as absent instead of failing the whole payload.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Top level ────────────────────────────────────────────────────────

/// The full status document.
///
/// ```json
/// {
///   "realtime": { "wan_state": "up", "ping": { "8.8.8.8": { "rtt": 12.5 } } },
///   "summary":  { "pppoe_reconnect_count_24h": 1 },
///   "events":   [ { "time": "2024-05-01 10:00:00", "type": "wan_down" } ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(default, deserialize_with = "lenient::section")]
    pub realtime: Option<Realtime>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub summary: Option<Summary>,
    #[serde(default, deserialize_with = "lenient::entries")]
    pub events: Vec<EventEntry>,
}

// ── Realtime ─────────────────────────────────────────────────────────

/// Live readings taken by the router at request time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Realtime {
    #[serde(default, deserialize_with = "lenient::string")]
    pub wan_state: Option<String>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub wan_errors: Option<WanErrors>,
    #[serde(default, deserialize_with = "lenient::section")]
    pub optical_power: Option<OpticalPower>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub cpu_temp: Option<f64>,
    /// Target name -> result. `BTreeMap` keeps sample order stable.
    #[serde(default, deserialize_with = "lenient::ping_map")]
    pub ping: Option<BTreeMap<String, PingEntry>>,
}

/// WAN interface error counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WanErrors {
    #[serde(default, deserialize_with = "lenient::counter")]
    pub rx_errors: Option<u64>,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub tx_errors: Option<u64>,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub rx_dropped: Option<u64>,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub tx_dropped: Option<u64>,
}

/// Optical module power (dBm). Absent on copper uplinks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpticalPower {
    #[serde(default, deserialize_with = "lenient::float")]
    pub rx: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub tx: Option<f64>,
}

/// One ping target's latest result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PingEntry {
    #[serde(default, deserialize_with = "lenient::float")]
    pub rtt: Option<f64>,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub loss: Option<u64>,
}

// ── Summary ──────────────────────────────────────────────────────────

/// Rolling 24h counters maintained by the router.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "lenient::counter")]
    pub pppoe_reconnect_count_24h: Option<u64>,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub wan_down_count_24h: Option<u64>,
}

// ── Events ───────────────────────────────────────────────────────────

/// A discrete event from the router's log.
///
/// `time` is kept raw: the router has emitted RFC 3339, `%Y-%m-%d %H:%M:%S`
/// and epoch seconds across versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventEntry {
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: Option<String>,
}

// ── Lenient field parsers ────────────────────────────────────────────

mod lenient {
    use super::{BTreeMap, Deserialize, DeserializeOwned, Deserializer, PingEntry, Value};

    /// A nested object; anything that doesn't fit `T` becomes `None`.
    pub(super) fn section<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let raw = Option::<Value>::deserialize(d)?;
        Ok(raw
            .filter(Value::is_object)
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    /// An array of objects; malformed entries are dropped individually.
    pub(super) fn entries<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let raw = Option::<Value>::deserialize(d)?;
        let Some(Value::Array(items)) = raw else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }

    /// Target map; a non-object entry becomes an all-`None` result.
    pub(super) fn ping_map<'de, D>(d: D) -> Result<Option<BTreeMap<String, PingEntry>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(d)?;
        let Some(Value::Object(map)) = raw else {
            return Ok(None);
        };
        Ok(Some(
            map.into_iter()
                .map(|(target, v)| (target, serde_json::from_value(v).unwrap_or_default()))
                .collect(),
        ))
    }

    /// Non-negative integer; accepts numeric strings and truncates floats.
    pub(super) fn counter<'de, D>(d: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(d)?;
        Ok(raw.as_ref().and_then(as_counter))
    }

    /// Finite float; accepts numeric strings.
    pub(super) fn float<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(d)?;
        Ok(raw.as_ref().and_then(as_float))
    }

    /// String; numbers and booleans are stringified.
    pub(super) fn string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(d)?;
        Ok(match raw {
            Some(Value::String(s)) => Some(s),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
            _ => None,
        })
    }

    fn as_float(v: &Value) -> Option<f64> {
        let f = match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        f.is_finite().then_some(f)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    fn as_counter(v: &Value) -> Option<u64> {
        if let Value::Number(n) = v {
            if let Some(u) = n.as_u64() {
                return Some(u);
            }
            if n.as_i64().is_some() {
                // negative
                return None;
            }
        }
        let f = as_float(v)?;
        (f >= 0.0).then(|| f.trunc() as u64)
    }
}
