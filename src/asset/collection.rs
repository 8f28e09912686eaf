//! Memoized build target lookup.

use rustc_hash::FxHashMap;

use super::BuildTarget;

/// All configured build targets, keyed by name for request-time lookup.
///
/// Built once from config and shared read-only across request threads.
/// It is only rebuilt when the config file itself changes.
#[derive(Debug, Clone)]
pub struct AssetCollection {
    targets: FxHashMap<String, BuildTarget>,
}

impl AssetCollection {
    pub fn new(targets: impl IntoIterator<Item = BuildTarget>) -> Self {
        let targets = targets
            .into_iter()
            .map(|t| (t.name().to_string(), t))
            .collect();
        Self { targets }
    }

    /// Look up a build by its exact name.
    pub fn get(&self, name: &str) -> Option<&BuildTarget> {
        self.targets.get(name)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate over targets in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &BuildTarget> {
        self.targets.values()
    }

    /// Targets sorted by name for stable display and batch builds.
    pub fn sorted(&self) -> Vec<&BuildTarget> {
        let mut targets: Vec<&BuildTarget> = self.targets.values().collect();
        targets.sort_unstable_by_key(|t| t.name());
        targets
    }
}
