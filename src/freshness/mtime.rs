//! Mtime-based freshness detection for cached artifacts.
//!
//! An artifact is fresh when its modification time is at least as new as
//! every source file that feeds it. Missing files on either side count as
//! stale, which pushes the decision to a rebuild where the real error (if
//! any) can surface with a useful message.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if an output file is at least as new as all of its sources.
///
/// Returns `false` when the output or any source is missing or unreadable.
pub fn is_output_fresh(output: &Path, sources: &[PathBuf]) -> bool {
    let Some(output_time) = get_mtime(output) else {
        return false;
    };

    sources.iter().all(|source| {
        get_mtime(source).is_some_and(|source_time| output_time >= source_time)
    })
}
