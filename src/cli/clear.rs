//! Cache clearing.

use crate::{
    cache::FsCacher,
    config::AppConfig,
    debug, log,
    utils::plural_count,
};
use anyhow::Result;

/// Remove the cached artifact of every configured target.
///
/// Only configured names are touched; unrelated files in the cache
/// directory survive, so a shared temp dir is safe to point at.
pub fn clear_cache(config: &AppConfig) -> Result<()> {
    let collection = config.collection();
    if collection.is_empty() {
        log!("clear"; "no targets configured");
        return Ok(());
    }

    let cacher = FsCacher::new(config.cache.dir.clone(), config.cache.freshness);

    let mut removed = 0;
    for target in collection.sorted() {
        if cacher.remove(target)? {
            debug!("clear"; "removed '{}'", target.name());
            removed += 1;
        }
    }

    log!(
        "clear";
        "removed {} from {}",
        plural_count(removed, "artifact"),
        config.cache.dir.display()
    );
    Ok(())
}
