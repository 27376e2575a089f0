// netmon-api: Async raw-socket client for the router's netmonitor status endpoint.

pub mod client;
pub mod error;
pub mod framing;
pub mod payload;
pub mod request;
pub mod transport;

pub use client::DeviceClient;
pub use error::Error;
pub use framing::extract_payload;
pub use payload::{EventEntry, OpticalPower, PingEntry, Realtime, StatusPayload, Summary, WanErrors};
pub use request::StatusRequest;
pub use transport::TransportConfig;
