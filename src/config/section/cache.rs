//! `[cache]` section configuration.
//!
//! Controls where compiled assets are written and how staleness is detected.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! dir = "tmp/cache"           # Cache directory (relative to the config file)
//! freshness = "mtime"         # Staleness check: "mtime" or "hash"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::freshness::FreshnessPolicy;
use crate::utils::path::resolve_from;

/// Asset cache settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory that holds compiled artifacts.
    /// Empty means a `packrat` directory under the system temp dir.
    pub dir: PathBuf,

    /// How cached artifacts are checked against their sources.
    pub freshness: FreshnessPolicy,
}

impl CacheConfig {
    /// Resolve the cache dir against the config root.
    ///
    /// Relative paths are anchored at the directory containing the config
    /// file, never the process working directory.
    pub fn normalize(&mut self, root: &Path) {
        if self.dir.as_os_str().is_empty() {
            self.dir = std::env::temp_dir().join("packrat");
        } else {
            self.dir = resolve_from(&self.dir, root);
        }
    }
}
