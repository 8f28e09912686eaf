//! Freshness detection: mtime comparison or content-hash (blake3) for sources.

pub mod hash;
pub mod mtime;

pub use hash::{ContentHash, compute_sources_hash};
pub use mtime::is_output_fresh;

use serde::{Deserialize, Serialize};

/// How cached artifacts are judged fresh against their sources.
///
/// - `mtime`: artifact modification time must be at least as new as every
///   source file. Cheap, but fooled by `touch` and clock skew.
/// - `hash`: blake3 hash over source contents must match the hash recorded
///   when the artifact was written. Reads every source on each check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessPolicy {
    #[default]
    Mtime,
    Hash,
}

impl std::fmt::Display for FreshnessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mtime => write!(f, "mtime"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_is_mtime() {
        assert_eq!(FreshnessPolicy::default(), FreshnessPolicy::Mtime);
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: FreshnessPolicy,
        }
        let parsed: Wrapper = toml::from_str("policy = \"hash\"").unwrap();
        assert_eq!(parsed.policy, FreshnessPolicy::Hash);

        let parsed: Wrapper = toml::from_str("policy = \"mtime\"").unwrap();
        assert_eq!(parsed.policy, FreshnessPolicy::Mtime);
    }

    #[test]
    fn test_policy_rejects_unknown_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[allow(dead_code)]
            policy: FreshnessPolicy,
        }
        let result: Result<Wrapper, _> = toml::from_str("policy = \"clock\"");
        assert!(result.is_err());
    }
}
