// ── Aggregation engine ──
//
// Read-only statistics over the record store. Queries may run while a
// cycle is writing; they see whatever is committed at the time.

use chrono::{DateTime, Duration, DurationRound, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{HourlyStats, NetworkEvent, StatsSummary, TimeWindow};
use crate::store::RecordStore;

/// Compute the summary for `window`. `hours` is echoed back as-is.
pub fn summarize(
    store: &dyn RecordStore,
    window: &TimeWindow,
    hours: u32,
) -> Result<StatsSummary, CoreError> {
    let statuses = store.statuses_in(window)?;
    let pings = store.pings_in(window)?;
    let events = store.events_in(window)?;

    let up = statuses.iter().filter(|s| s.is_wan_up()).count();
    let lossy = pings.iter().filter(|p| p.has_loss()).count();
    let avg_cpu_temp = mean(statuses.iter().filter_map(|s| s.cpu_temp)).map(round1);

    Ok(StatsSummary {
        wan_availability_pct: percent(up, statuses.len()),
        packet_loss_pct: percent(lossy, pings.len()),
        avg_cpu_temp,
        pppoe_event_count: count_where(&events, NetworkEvent::is_pppoe),
        wan_event_count: count_where(&events, NetworkEvent::is_wan),
        total_records: u64::try_from(statuses.len()).unwrap_or(u64::MAX),
        monitoring_hours: hours,
    })
}

/// Truncate `t` to the start of its hour.
pub fn hour_floor(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(Duration::hours(1)).unwrap_or(t)
}

/// Roll up `[hour_start, hour_start + 1h)` into an [`HourlyStats`] row.
///
/// Returns `None` without writing if the hour is already rolled up or
/// holds neither snapshots nor ping samples.
pub fn rollup_hour(
    store: &dyn RecordStore,
    hour_start: DateTime<Utc>,
) -> Result<Option<HourlyStats>, CoreError> {
    let hour = hour_floor(hour_start);
    if store.hourly_stats(hour)?.is_some() {
        debug!(%hour, "hour already rolled up");
        return Ok(None);
    }

    let end = hour + Duration::hours(1);
    let window = TimeWindow::new(hour, end);
    let statuses: Vec<_> = store
        .statuses_in(&window)?
        .into_iter()
        .filter(|s| s.timestamp < end)
        .collect();
    let pings: Vec<_> = store
        .pings_in(&window)?
        .into_iter()
        .filter(|p| p.timestamp < end)
        .collect();
    if statuses.is_empty() && pings.is_empty() {
        return Ok(None);
    }

    let rtts = || pings.iter().filter_map(|p| p.rtt);
    let temps = || statuses.iter().filter_map(|s| s.cpu_temp);

    let mut stats = HourlyStats {
        id: None,
        hour,
        avg_ping_rtt: mean(rtts()),
        max_ping_rtt: rtts().reduce(f64::max),
        min_ping_rtt: rtts().reduce(f64::min),
        packet_loss_count: u64::try_from(pings.iter().filter(|p| p.has_loss()).count())
            .unwrap_or(u64::MAX),
        pppoe_reconnect_count: int_mean(statuses.iter().map(|s| s.pppoe_reconnect_count)),
        wan_down_count: int_mean(statuses.iter().map(|s| s.wan_down_count)),
        avg_cpu_temp: mean(temps()),
        max_cpu_temp: temps().reduce(f64::max),
    };
    stats.id = Some(store.insert_hourly_stats(stats.clone())?);
    debug!(%hour, snapshots = statuses.len(), pings = pings.len(), "hourly rollup stored");
    Ok(Some(stats))
}

// ── Helpers ──────────────────────────────────────────────────────────

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    100.0 * part as f64 / whole as f64
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Mean of counters, truncated towards zero. 0 for no values.
fn int_mean(values: impl Iterator<Item = u64>) -> u64 {
    let (sum, n) = values.fold((0u64, 0u64), |(sum, n), v| (sum.saturating_add(v), n + 1));
    sum.checked_div(n).unwrap_or(0)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn count_where(events: &[NetworkEvent], pred: impl Fn(&NetworkEvent) -> bool) -> u64 {
    u64::try_from(events.iter().filter(|e| pred(e)).count()).unwrap_or(u64::MAX)
}
