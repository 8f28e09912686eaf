//! Cache persistence for built assets.
//!
//! The [`Cacher`] trait is the storage seam of the serve path: freshness
//! checks and artifact IO go through it, so tests can substitute an
//! in-memory cache with controllable freshness. [`FsCacher`] is the
//! production implementation, one artifact file per build target.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::asset::BuildTarget;
use crate::freshness::{self, ContentHash, FreshnessPolicy};

/// Cache store contract for built assets.
///
/// `is_fresh` answers "can the cached artifact be served as-is", `read`
/// and `write` move artifact bytes. All three may fail with a storage
/// error, which the serve path surfaces as a build failure response.
pub trait Cacher: Send + Sync {
    fn is_fresh(&self, target: &BuildTarget) -> Result<bool>;
    fn read(&self, target: &BuildTarget) -> Result<Vec<u8>>;
    fn write(&self, target: &BuildTarget, bytes: &[u8]) -> Result<()>;
}

/// Record stored next to an artifact under the hash freshness policy.
#[derive(Debug, Serialize, Deserialize)]
struct FreshnessRecord {
    /// Combined blake3 hash of the source list at write time.
    sources_hash: String,
}

/// Filesystem cache keyed by build name.
///
/// Artifacts live flat in the cache directory (`<dir>/<name>`); build
/// names cannot contain path separators, so no nesting is needed.
pub struct FsCacher {
    dir: PathBuf,
    policy: FreshnessPolicy,
}

impl FsCacher {
    pub fn new(dir: impl Into<PathBuf>, policy: FreshnessPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    /// Where the artifact for `target` lives on disk.
    pub fn artifact_path(&self, target: &BuildTarget) -> PathBuf {
        self.dir.join(target.name())
    }

    fn record_path(&self, target: &BuildTarget) -> PathBuf {
        self.dir.join(format!("{}.hash.json", target.name()))
    }

    /// Remove the cached artifact and freshness record, if present.
    ///
    /// Returns `true` when an artifact file was actually deleted.
    pub fn remove(&self, target: &BuildTarget) -> Result<bool> {
        let _ = fs::remove_file(self.record_path(target));

        let artifact = self.artifact_path(target);
        match fs::remove_file(&artifact) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove cached artifact '{}'", artifact.display())
            }),
        }
    }

    fn hash_record_matches(&self, target: &BuildTarget, artifact: &Path) -> bool {
        if !artifact.exists() {
            return false;
        }
        let Ok(raw) = fs::read_to_string(self.record_path(target)) else {
            return false;
        };
        let Ok(record) = serde_json::from_str::<FreshnessRecord>(&raw) else {
            return false;
        };
        let Some(recorded) = ContentHash::from_hex(&record.sources_hash) else {
            return false;
        };
        let Ok(current) = freshness::compute_sources_hash(target.sources()) else {
            // Unreadable source counts as stale; the rebuild surfaces the
            // real error with the file name in it.
            return false;
        };
        recorded == current
    }

    fn write_record(&self, target: &BuildTarget) -> Result<()> {
        let hash = freshness::compute_sources_hash(target.sources())
            .context("Failed to hash sources for freshness record")?;
        let record = FreshnessRecord {
            sources_hash: hash.to_hex(),
        };
        let path = self.record_path(target);
        fs::write(&path, serde_json::to_string(&record)?)
            .with_context(|| format!("Failed to write freshness record '{}'", path.display()))
    }
}

impl Cacher for FsCacher {
    /// Check the cached artifact against the configured freshness policy.
    ///
    /// Unreadable cache state is reported as stale rather than an error,
    /// pushing the decision to a rebuild.
    fn is_fresh(&self, target: &BuildTarget) -> Result<bool> {
        let artifact = self.artifact_path(target);
        match self.policy {
            FreshnessPolicy::Mtime => Ok(freshness::is_output_fresh(&artifact, target.sources())),
            FreshnessPolicy::Hash => Ok(self.hash_record_matches(target, &artifact)),
        }
    }

    fn read(&self, target: &BuildTarget) -> Result<Vec<u8>> {
        let artifact = self.artifact_path(target);
        fs::read(&artifact)
            .with_context(|| format!("Failed to read cached artifact '{}'", artifact.display()))
    }

    fn write(&self, target: &BuildTarget, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory '{}'", self.dir.display())
        })?;

        // Write-then-rename keeps concurrent readers off half-written
        // artifacts. The per-target build lock serializes writers.
        let artifact = self.artifact_path(target);
        let tmp = self.dir.join(format!("{}.tmp", target.name()));

        if let Err(e) = fs::write(&tmp, bytes) {
            let _ = fs::remove_file(&tmp);
            return Err(e)
                .with_context(|| format!("Failed to write cache file '{}'", tmp.display()));
        }
        if let Err(e) = fs::rename(&tmp, &artifact) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| {
                format!("Failed to move cache file into place at '{}'", artifact.display())
            });
        }

        if self.policy == FreshnessPolicy::Hash {
            self.write_record(target)?;
        }
        Ok(())
    }
}
