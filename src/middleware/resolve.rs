//! Request path to build target resolution.

use crate::asset::{AssetCollection, BuildTarget};

/// Outcome of mapping a request path onto the asset collection.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Path is not under the asset prefix.
    NotAsset,
    /// Path is under the prefix but names no configured build.
    UnknownBuild,
    /// Path names a configured build.
    Build(&'a BuildTarget),
}

/// Map a decoded request path onto a configured build.
///
/// Matching is verbatim: the prefix must appear at the very start of the
/// path, and whatever follows it must equal a build name exactly. No
/// case folding, no trailing-slash tolerance.
pub fn resolve<'a>(path: &str, prefix: &str, assets: &'a AssetCollection) -> Resolution<'a> {
    let Some(name) = path.strip_prefix(prefix) else {
        return Resolution::NotAsset;
    };

    match assets.get(name) {
        Some(target) => Resolution::Build(target),
        None => Resolution::UnknownBuild,
    }
}
