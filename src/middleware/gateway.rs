//! Cache-or-compile gateway with per-target build locks.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

use crate::asset::BuildTarget;
use crate::cache::Cacher;
use crate::compiler::Compiler;

/// A failed attempt to produce a build's bytes.
///
/// The display string is the full cause chain; the serve path uses it
/// verbatim as the 400 response body.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Compiling the sources failed.
    #[error("{0:#}")]
    Compile(anyhow::Error),
    /// The cache could not be read or written.
    #[error("{0:#}")]
    Cache(anyhow::Error),
}

/// Serves bytes for build targets, compiling on miss.
///
/// Fresh hits read without taking any lock. Stale targets serialize on
/// a per-name lock so concurrent requests for the same build compile it
/// once; requests for different builds never contend.
pub struct CacheGateway<C, K> {
    compiler: C,
    cacher: K,
    building: DashMap<String, Arc<Mutex<()>>>,
}

impl<C: Compiler, K: Cacher> CacheGateway<C, K> {
    pub fn new(compiler: C, cacher: K) -> Self {
        Self {
            compiler,
            cacher,
            building: DashMap::new(),
        }
    }

    /// Get the current bytes for `target`, compiling and caching them
    /// first if the cached artifact is stale or missing.
    pub fn fetch(&self, target: &BuildTarget) -> Result<Vec<u8>, BuildError> {
        // Fast path: fresh artifact, no lock taken.
        if self.cacher.is_fresh(target).map_err(BuildError::Cache)? {
            return self.cacher.read(target).map_err(BuildError::Cache);
        }

        let lock = self.build_lock(target.name());
        let _guard = lock.lock();

        // Another request may have rebuilt while we waited for the lock.
        if self.cacher.is_fresh(target).map_err(BuildError::Cache)? {
            return self.cacher.read(target).map_err(BuildError::Cache);
        }

        crate::debug!(
            "serve";
            "building '{}' from {} source file(s)",
            target.name(),
            target.sources().len()
        );
        let bytes = self
            .compiler
            .generate(target)
            .map_err(BuildError::Compile)?;
        self.cacher.write(target, &bytes).map_err(BuildError::Cache)?;
        Ok(bytes)
    }

    /// Lock table entry for a build name.
    ///
    /// Entries are created on first miss and live for the gateway's
    /// lifetime. Only configured names reach here, so the table is
    /// bounded by the target list.
    fn build_lock(&self, name: &str) -> Arc<Mutex<()>> {
        self.building.entry(name.to_string()).or_default().clone()
    }
}
