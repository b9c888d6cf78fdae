//! Splitstore Disk Usage Agent
//!
//! A daemon that periodically measures the on-disk size of the splitstore's
//! component directories and exposes them as Prometheus last-value gauges.
//!
//! # Architecture
//!
//! ```text
//! Agent tick ──▶ Sampler ──▶ { coldstore, hotstore, markset }
//!                                     │
//!                                     ▼
//!                          DiskUsageMetrics (owned registry)
//!                                     │
//!                                     ▼
//!                          Endpoint server ──▶ scrape client
//! ```
//!
//! The tick loop and the endpoint server run as two independent tokio tasks
//! that share only the registry handle.
//!
//! # Modules
//!
//! - [`agent`] - Tick loop scheduling sample-and-publish cycles
//! - [`config`] - Startup options and duration parsing
//! - [`error`] - Error types
//! - [`metrics`] - Owned Prometheus registry and the four gauges
//! - [`probe`] - Allocated-size measurement of a directory tree
//! - [`sampler`] - Fixed-target probing with per-field degradation
//! - [`server`] - Scrape endpoint

pub mod agent;
pub mod config;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod sampler;
pub mod server;

// Re-export commonly used types
pub use agent::DiskUsageAgent;
pub use config::AgentOptions;
pub use error::{Error, Result};
pub use metrics::DiskUsageMetrics;
pub use sampler::DiskUsage;
