//! Splitstore Disk Usage Agent
//!
//! Periodically checks the disk usage of the splitstore's component
//! directories and serves the results as Prometheus gauges.
//!
//! ```text
//! Agent tick ──▶ Sampler ──▶ DiskUsageMetrics ──▶ Endpoint server ──▶ scrape
//! ```

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use splitstore_diskusage::error::Result;
use splitstore_diskusage::{server, AgentOptions, DiskUsageAgent, DiskUsageMetrics};

#[tokio::main]
async fn main() -> Result<()> {
    let opts = AgentOptions::parse();

    init_logging(&opts);

    info!("starting splitstore disk usage agent");
    info!("  interval: {}", opts.interval);
    info!("  repo path: {}", opts.repo_path.display());
    info!("  metrics endpoint: {}", opts.metrics_endpoint);
    info!("  metrics path: {}", opts.metrics_path);

    // Validate configuration before binding anything
    opts.tick_interval().map_err(|e| {
        error!("invalid interval: {}", e);
        e
    })?;
    let addr = opts.bind_addr().map_err(|e| {
        error!("invalid metrics endpoint: {}", e);
        e
    })?;

    let metrics = DiskUsageMetrics::new()?;

    // Bind synchronously so a bad endpoint fails startup, then serve in the
    // background for the rest of the process lifetime.
    let listener = server::bind(addr).await.map_err(|e| {
        error!("failed to bind metrics endpoint: {}", e);
        e
    })?;
    let serve_metrics = metrics.clone();
    let serve_path = opts.metrics_path.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, serve_path, serve_metrics).await {
            error!("metrics endpoint error: {}", e);
        }
    });

    // Ctrl-c cancels the tick loop between ticks
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let agent = DiskUsageAgent::new(opts, metrics);
    agent.run(cancel).await?;

    info!("agent shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(opts: &AgentOptions) {
    let level = match opts.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap());

    if opts.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
