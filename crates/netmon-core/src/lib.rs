// netmon-core: Ingestion pipeline and aggregation layer between netmon-api and consumers.

pub mod aggregate;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fetch;
pub mod model;
pub mod monitor;
pub mod normalize;
pub mod query;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MonitorConfig;
pub use error::CoreError;
pub use fetch::Fetcher;
pub use monitor::{CycleReport, CycleState, Monitor};
pub use normalize::{NormalizedCycle, normalize};
pub use query::{EventsQuery, Health, HistoryPage, HistoryQuery, PingHistoryQuery};
pub use store::{MemoryStore, PurgeReport, RecordStore};

pub use model::{
    EventKey, HourlyStats, NetworkEvent, PingSample, RawEvent, StatsSummary, StatusSnapshot,
    TimeWindow,
};
