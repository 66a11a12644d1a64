//! Client side of the live table server.
//!
//! This library provides the HTTP API client, the fixed-interval poller with
//! freshness tracking, and the plain-text rendering used by the lt_client
//! binary.

pub mod api_client;
pub mod display;
pub mod poller;

pub use api_client::{ApiClient, ClientError, ClientResult};
pub use poller::{PollStatus, Poller, SnapshotSource};
