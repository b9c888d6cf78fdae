//! Size Prober
//!
//! Measures the total on-disk size of a directory tree. Sizes are allocated
//! blocks (what `du` reports), not logical file lengths, so sparse and
//! compressed files account the same way as `du -s` on the same tree.

use crate::error::{Error, Result};
use std::fs::Metadata;
use std::path::Path;
use walkdir::WalkDir;

/// Total allocated size in bytes of everything under `root/target`.
///
/// Fails with [`Error::TargetNotFound`] if the resolved path does not exist,
/// or [`Error::Probe`] on any I/O failure during the walk.
pub fn dir_size(root: &Path, target: &str) -> Result<u64> {
    let path = root.join(target);
    if !path.exists() {
        return Err(Error::TargetNotFound(path));
    }

    let mut total = 0u64;
    for entry in WalkDir::new(&path) {
        let entry = entry.map_err(|e| Error::Probe {
            target: target.to_string(),
            source: e,
        })?;
        let meta = entry.metadata().map_err(|e| Error::Probe {
            target: target.to_string(),
            source: e,
        })?;
        total += allocated_size(&meta);
    }
    Ok(total)
}

/// Allocated size of a single filesystem entry.
#[cfg(unix)]
fn allocated_size(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    // st_blocks is always in 512-byte units regardless of the fs block size
    meta.blocks() * 512
}

/// Allocated size of a single filesystem entry.
///
/// Platforms without block accounting fall back to logical length.
#[cfg(not(unix))]
fn allocated_size(meta: &Metadata) -> u64 {
    meta.len()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    #[test]
    fn test_dir_size_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            dir_size(dir.path(), "does-not-exist"),
            Err(Error::TargetNotFound(_))
        );
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let chain = dir.path().join("chain");
        fs::create_dir_all(chain.join("nested")).unwrap();
        fs::write(chain.join("a.bin"), vec![1u8; 4096]).unwrap();
        fs::write(chain.join("nested/b.bin"), vec![2u8; 4096]).unwrap();

        let size = dir_size(dir.path(), "chain").unwrap();
        // Allocated size is block-rounded, never less than the bytes written
        assert!(size >= 8192, "expected at least 8192 bytes, got {}", size);
    }

    #[test]
    fn test_dir_size_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let chain = dir.path().join("chain");
        fs::create_dir(&chain).unwrap();
        fs::write(chain.join("a.bin"), vec![0u8; 1024]).unwrap();

        let first = dir_size(dir.path(), "chain").unwrap();
        let second = dir_size(dir.path(), "chain").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_dir_size_empty_dir_is_small() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("chain")).unwrap();

        // Only the directory entry itself is accounted
        let size = dir_size(dir.path(), "chain").unwrap();
        assert!(size < 65536);
    }
}
