//! Disk usage gauges
//!
//! Four last-value gauges on an explicitly owned Prometheus registry. The
//! registry handle is shared between the publisher (agent loop) and the
//! endpoint server; each test constructs its own instance.

use crate::error::Result;
use crate::sampler::DiskUsage;
use chrono::{DateTime, Utc};
use prometheus::{IntGauge, Opts, Registry};
use std::sync::Arc;

/// Registered disk usage gauges plus the registry they live in.
pub struct DiskUsageMetrics {
    registry: Registry,
    coldstore_size: IntGauge,
    hotstore_size: IntGauge,
    markset_size: IntGauge,
    last_updated_at: IntGauge,
}

impl DiskUsageMetrics {
    /// Create the registry and register all four gauges.
    ///
    /// Registration failure is a fatal startup condition; the agent never
    /// runs with a broken metrics path.
    pub fn new() -> Result<Arc<Self>> {
        let registry = Registry::new();

        let coldstore_size = IntGauge::with_opts(Opts::new(
            "coldstore_badger_size",
            "Size of the coldstore badger store in bytes",
        ))?;
        let hotstore_size = IntGauge::with_opts(Opts::new(
            "hotstore_badger_size",
            "Size of the hotstore badger store in bytes",
        ))?;
        let markset_size = IntGauge::with_opts(Opts::new(
            "markset_badger_size",
            "Size of the markset badger store in bytes",
        ))?;
        let last_updated_at = IntGauge::with_opts(Opts::new(
            "diskusage_last_updated_at",
            "Seconds since Unix epoch that usage was most recently updated",
        ))?;

        registry.register(Box::new(coldstore_size.clone()))?;
        registry.register(Box::new(hotstore_size.clone()))?;
        registry.register(Box::new(markset_size.clone()))?;
        registry.register(Box::new(last_updated_at.clone()))?;

        Ok(Arc::new(Self {
            registry,
            coldstore_size,
            hotstore_size,
            markset_size,
            last_updated_at,
        }))
    }

    /// Overwrite all four gauges with the latest sample.
    ///
    /// Each gauge write is atomic; the group of four is not, so a concurrent
    /// scrape may pair a fresh size with the previous timestamp.
    pub fn publish(&self, usage: &DiskUsage, now: DateTime<Utc>) {
        self.coldstore_size.set(usage.coldstore as i64);
        self.hotstore_size.set(usage.hotstore as i64);
        self.markset_size.set(usage.markset as i64);
        self.last_updated_at.set(now.timestamp());
    }

    /// The registry backing these gauges, for exposition.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

// =============================================================================
// Tests
// =============================================================================
