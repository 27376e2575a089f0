//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use tabled::{Table, Tabled, settings::Style};

use netmon_core::{CycleReport, PingSample, StatsSummary};

use crate::cli::OutputFormat;

// ── Render dispatcher ────────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

/// Pretty-printed JSON.
pub fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    render_json(data, false)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

// ── Domain views ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn field(name: &'static str, value: impl ToString) -> FieldRow {
    FieldRow {
        field: name,
        value: value.to_string(),
    }
}

fn time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn opt(v: Option<f64>, unit: &str) -> String {
    v.map_or_else(|| "-".into(), |v| format!("{v:.1}{unit}"))
}

pub fn summary_detail(s: &StatsSummary) -> String {
    render_table(&[
        field("Window", format!("{}h", s.monitoring_hours)),
        field("Snapshots", s.total_records),
        field("WAN availability", format!("{:.1}%", s.wan_availability_pct)),
        field("Packet loss", format!("{:.1}%", s.packet_loss_pct)),
        field("Avg CPU temp", opt(s.avg_cpu_temp, " °C")),
        field("PPPoE events", s.pppoe_event_count),
        field("WAN events", s.wan_event_count),
    ])
}

pub fn report_detail(r: &CycleReport) -> String {
    render_table(&[
        field("Cycle", time(r.timestamp)),
        field("Snapshots", r.snapshots),
        field("Ping samples", r.pings),
        field("Events inserted", r.events_inserted),
        field("Events skipped", r.events_skipped),
    ])
}

#[derive(Tabled)]
struct PingRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "RTT")]
    rtt: String,
    #[tabled(rename = "Loss")]
    loss: u64,
}

pub fn ping_table(samples: &[PingSample]) -> String {
    let rows: Vec<PingRow> = samples
        .iter()
        .map(|p| PingRow {
            time: time(p.timestamp),
            target: p.target.clone(),
            rtt: opt(p.rtt, " ms"),
            loss: p.loss,
        })
        .collect();
    render_table(&rows)
}
