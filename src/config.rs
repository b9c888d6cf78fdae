//! Agent configuration
//!
//! Startup options for the disk usage agent. Built once by clap at process
//! start and never mutated afterwards.

use crate::error::{Error, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Splitstore disk usage agent - periodic disk usage metrics for the splitstore
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AgentOptions {
    /// The interval at which to check the disk usage
    #[arg(long, env = "INTERVAL", default_value = "10m")]
    pub interval: String,

    /// The path to the splitstore repo
    #[arg(long, env = "REPO_PATH")]
    pub repo_path: PathBuf,

    /// The endpoint to expose metrics on
    #[arg(long, env = "METRICS_ENDPOINT", default_value = ":8080")]
    pub metrics_endpoint: String,

    /// The path to expose metrics on
    #[arg(long, env = "METRICS_PATH", default_value = "/metrics")]
    pub metrics_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl AgentOptions {
    /// Parse the configured interval string into a tick period.
    ///
    /// A parse failure is fatal at startup; the scheduler never starts with
    /// an unparseable interval.
    pub fn tick_interval(&self) -> Result<Duration> {
        parse_duration(&self.interval)
    }

    /// Resolve the metrics endpoint to a bindable socket address.
    ///
    /// A bare `:port` endpoint binds all interfaces.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let endpoint = if self.metrics_endpoint.starts_with(':') {
            format!("0.0.0.0{}", self.metrics_endpoint)
        } else {
            self.metrics_endpoint.clone()
        };

        endpoint
            .parse()
            .map_err(|_| Error::InvalidEndpoint(self.metrics_endpoint.clone()))
    }
}

// =============================================================================
// Duration Parsing
// =============================================================================

/// Parse a duration string like "30s", "10m", "1h30m" into a Duration
pub fn parse_duration(s: &str) -> Result<Duration> {
    let err = |reason: &str| Error::DurationParse {
        input: s.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = s.trim();
    if rest.is_empty() {
        return Err(err("empty duration string"));
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return Err(err("expected a number"));
        }
        let num: u64 = rest[..digits]
            .parse()
            .map_err(|_| err("invalid number"))?;
        rest = &rest[digits..];

        let unit = rest.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        let secs = |mult: u64| {
            num.checked_mul(mult)
                .map(Duration::from_secs)
                .ok_or_else(|| err("duration overflows"))
        };
        let segment = match &rest[..unit] {
            "ms" => Duration::from_millis(num),
            "s" => secs(1)?,
            "m" => secs(60)?,
            "h" => secs(3600)?,
            "" => return Err(err("missing unit suffix")),
            _ => return Err(err("unknown unit suffix")),
        };
        rest = &rest[unit..];
        total = total
            .checked_add(segment)
            .ok_or_else(|| err("duration overflows"))?;
    }

    if total.is_zero() {
        return Err(err("duration must be positive"));
    }
    Ok(total)
}

// =============================================================================
// Tests
// =============================================================================
