// ── Telemetry domain model ──
//
// Flat time-series records produced by the normalizer and stored by a
// `RecordStore`, plus the derived statistics computed from them.

pub mod event;
pub mod stats;
pub mod status;
pub mod window;

// ── Re-exports ──────────────────────────────────────────────────────

pub use event::{EventKey, NetworkEvent, RawEvent};
pub use stats::{HourlyStats, StatsSummary};
pub use status::{PingSample, StatusSnapshot};
pub use window::TimeWindow;
