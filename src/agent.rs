//! Disk Usage Agent
//!
//! Owns the sampling schedule: a repeating timer that triggers one
//! sample-and-publish cycle per tick until cancelled.

use crate::config::AgentOptions;
use crate::error::Result;
use crate::metrics::DiskUsageMetrics;
use crate::sampler;
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodically samples splitstore disk usage and publishes the gauges.
pub struct DiskUsageAgent {
    opts: AgentOptions,
    metrics: Arc<DiskUsageMetrics>,
}

impl DiskUsageAgent {
    /// Create a new agent publishing to `metrics`.
    pub fn new(opts: AgentOptions, metrics: Arc<DiskUsageMetrics>) -> Self {
        Self { opts, metrics }
    }

    /// Run the tick loop until `cancel` fires.
    ///
    /// The first tick fires one full interval after start, so cancellation
    /// before then publishes nothing. Ticks never overlap: a slow sample
    /// delays, but does not skip, the ticks behind it. Cancellation is
    /// observed between ticks only.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let period = self.opts.tick_interval()?;
        info!(interval = %self.opts.interval, repo_path = %self.opts.repo_path.display(), "starting disk usage agent");

        let mut tick = interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.update_metrics();
                }
                _ = cancel.cancelled() => {
                    info!("cancelled, stopping disk usage agent");
                    return Ok(());
                }
            }
        }
    }

    /// One tick: measure all targets, then overwrite the gauges.
    fn update_metrics(&self) {
        let usage = sampler::sample(&self.opts.repo_path);
        let now = Utc::now();
        self.metrics.publish(&usage, now);
        debug!(
            coldstore = usage.coldstore,
            hotstore = usage.hotstore,
            markset = usage.markset,
            "updated metrics"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::DiskUsage;
    use prometheus::{Encoder, TextEncoder};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    fn options(repo_path: &Path, interval: &str) -> AgentOptions {
        AgentOptions {
            interval: interval.to_string(),
            repo_path: repo_path.to_path_buf(),
            metrics_endpoint: ":8080".to_string(),
            metrics_path: "/metrics".to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }

    fn render(metrics: &DiskUsageMetrics) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&metrics.registry().gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_interval_fails_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = DiskUsageMetrics::new().unwrap();
        let agent = DiskUsageAgent::new(options(dir.path(), "abc"), metrics);

        let result = agent.run(CancellationToken::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancel_before_first_tick_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("chain")).unwrap();
        fs::write(dir.path().join("chain/a.bin"), vec![0u8; 4096]).unwrap();

        let metrics = DiskUsageMetrics::new().unwrap();
        let agent = DiskUsageAgent::new(options(dir.path(), "1h"), metrics.clone());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(agent.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("agent did not stop after cancellation")
            .unwrap()
            .unwrap();

        // All gauges still at their registered defaults
        let body = render(&metrics);
        assert!(body.contains("diskusage_last_updated_at 0"));
        assert!(body.contains("coldstore_badger_size 0"));
    }

    #[tokio::test]
    async fn test_tick_publishes_sampled_sizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("chain")).unwrap();
        fs::write(dir.path().join("chain/a.bin"), vec![0u8; 4096]).unwrap();
        // hot.badger missing, markset present
        fs::create_dir_all(dir.path().join("splitstore/markset.badger")).unwrap();
        fs::write(
            dir.path().join("splitstore/markset.badger/000.vlog"),
            vec![0u8; 8192],
        )
        .unwrap();

        let metrics = DiskUsageMetrics::new().unwrap();
        let agent = DiskUsageAgent::new(options(dir.path(), "10ms"), metrics.clone());

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(agent.run(cancel.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("agent did not stop after cancellation")
            .unwrap()
            .unwrap();

        let body = render(&metrics);
        assert!(body.contains("hotstore_badger_size 0"));
        assert!(!body.contains("diskusage_last_updated_at 0\n"));

        // The published values match a direct sample of the unchanged tree
        let expected = sampler::sample(dir.path());
        assert_ne!(expected, DiskUsage::default());
        assert!(body.contains(&format!("coldstore_badger_size {}", expected.coldstore)));
        assert!(body.contains(&format!("markset_badger_size {}", expected.markset)));
    }
}
