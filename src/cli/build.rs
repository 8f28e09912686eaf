//! Batch compilation of every configured target.
//!
//! Builds are incremental: targets whose cached artifact is still fresh
//! under the configured policy are skipped, so `packrat build` after a
//! small edit only recompiles the affected targets.

use crate::{
    asset::BuildTarget,
    cache::{Cacher, FsCacher},
    compiler::{Compiler, ConcatCompiler},
    config::AppConfig,
    debug, log,
    logger::ProgressLine,
    utils::{plural_count, plural_s},
};
use anyhow::{Result, bail};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Compile all configured targets into the cache.
///
/// Targets build in parallel; failures don't stop the remaining targets,
/// they are collected and reported together at the end.
pub fn build_targets(config: &AppConfig) -> Result<()> {
    let collection = config.collection();
    if collection.is_empty() {
        log!("build"; "no targets configured");
        return Ok(());
    }

    let start = Instant::now();
    let compiler = ConcatCompiler;
    let cacher = FsCacher::new(config.cache.dir.clone(), config.cache.freshness);

    let targets = collection.sorted();
    let progress = ProgressLine::new(&counter_totals(&targets));

    let built = AtomicUsize::new(0);
    let failures: Vec<(String, anyhow::Error)> = targets
        .par_iter()
        .filter_map(|target| {
            let result = build_one(&compiler, &cacher, target);
            progress.inc(kind_label(target.ext()));
            match result {
                Ok(true) => {
                    built.fetch_add(1, Ordering::Relaxed);
                    None
                }
                Ok(false) => None,
                Err(e) => Some((target.name().to_string(), e)),
            }
        })
        .collect();
    progress.finish();

    if !failures.is_empty() {
        for (name, err) in &failures {
            log!("error"; "'{}': {:#}", name, err);
        }
        bail!(
            "{} target{} failed to build",
            failures.len(),
            plural_s(failures.len())
        );
    }

    let built = built.load(Ordering::Relaxed);
    log!(
        "build";
        "{} processed in {:.2}s ({} built, {} fresh)",
        plural_count(targets.len(), "target"),
        start.elapsed().as_secs_f64(),
        built,
        targets.len() - built
    );
    Ok(())
}

/// Build a single target unless its cache entry is fresh.
///
/// Returns `Ok(true)` if the target was compiled, `Ok(false)` if the
/// cached artifact was still good.
fn build_one(compiler: &ConcatCompiler, cacher: &FsCacher, target: &BuildTarget) -> Result<bool> {
    if cacher.is_fresh(target)? {
        debug!("build"; "'{}' is fresh, skipping", target.name());
        return Ok(false);
    }

    debug!(
        "build";
        "compiling '{}' from {}",
        target.name(),
        plural_count(target.sources().len(), "source file")
    );
    let bytes = compiler.generate(target)?;
    cacher.write(target, &bytes)?;
    Ok(true)
}

/// Progress counter bucket for a target extension.
fn kind_label(ext: &str) -> &'static str {
    match ext {
        "css" => "css",
        "js" | "mjs" | "cjs" => "js",
        _ => "other",
    }
}

/// Count targets per progress bucket.
fn counter_totals(targets: &[&BuildTarget]) -> [(&'static str, usize); 3] {
    let mut css = 0;
    let mut js = 0;
    let mut other = 0;
    for target in targets {
        match kind_label(target.ext()) {
            "css" => css += 1,
            "js" => js += 1,
            _ => other += 1,
        }
    }
    [("css", css), ("js", js), ("other", other)]
}
