//! Disk Usage Sampler
//!
//! Probes the three fixed splitstore directories and collects their sizes
//! into a single sample. A failing probe never aborts the sample; the failed
//! field is left at zero and the remaining targets are still measured.

use crate::probe;
use std::path::Path;
use tracing::warn;

/// The fixed probe targets, relative to the repo root.
///
/// These identifiers are part of the compatibility surface: changing them
/// changes what is measured.
pub const COLDSTORE_TARGET: &str = "chain";
pub const HOTSTORE_TARGET: &str = "splitstore/hot.badger";
pub const MARKSET_TARGET: &str = "splitstore/markset.badger";

/// One disk usage sample, produced fresh on every tick.
///
/// A field is zero when its probe failed that cycle; zero is indistinguishable
/// from an empty directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    /// Size of the coldstore badger store in bytes
    pub coldstore: u64,
    /// Size of the hotstore badger store in bytes
    pub hotstore: u64,
    /// Size of the markset badger store in bytes
    pub markset: u64,
}

/// Measure all three targets under `repo_path`.
///
/// Never fails; per-target failures are logged as warnings.
pub fn sample(repo_path: &Path) -> DiskUsage {
    DiskUsage {
        coldstore: probe_target(repo_path, COLDSTORE_TARGET),
        hotstore: probe_target(repo_path, HOTSTORE_TARGET),
        markset: probe_target(repo_path, MARKSET_TARGET),
    }
}

fn probe_target(repo_path: &Path, target: &str) -> u64 {
    match probe::dir_size(repo_path, target) {
        Ok(size) => size,
        Err(e) => {
            warn!(target_path = target, error = %e, "disk usage probe failed");
            0
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
