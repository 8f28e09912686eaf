//! `[[target]]` section configuration.
//!
//! Each `[[target]]` entry names one build artifact and lists the source
//! files concatenated to produce it.
//!
//! # Example
//!
//! ```toml
//! [[target]]
//! name = "all.css"
//! files = ["css/reset.css", "css/layout.css", "css/theme.css"]
//!
//! [[target]]
//! name = "app.js"
//! files = ["js/vendor.js", "js/app.js"]
//! ```
//!
//! Files are listed in output order and resolved relative to the config file.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::BuildTarget;
use crate::config::ConfigDiagnostics;
use crate::utils::path::resolve_from;

/// A single named build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Artifact name, e.g. `all.css`. Doubles as the URL tail and the
    /// cache filename, so path separators are rejected.
    pub name: String,

    /// Source files in concatenation order.
    pub files: Vec<PathBuf>,
}

impl TargetConfig {
    /// Validate one `[[target]]` entry. `index` is its position in the
    /// config file, used to address errors at the offending entry.
    pub fn validate(&self, index: usize, diag: &mut ConfigDiagnostics) {
        let field = |part: &str| format!("target[{index}].{part}");

        if self.name.is_empty() {
            diag.error(field("name"), "must not be empty");
        } else if self.name == "." || self.name == ".." {
            diag.error(field("name"), format!("'{}' is not a valid name", self.name));
        } else if self.name.contains(['/', '\\']) {
            diag.error_with_hint(
                field("name"),
                format!("'{}' must not contain path separators", self.name),
                "the name becomes both the URL tail and the cache filename",
            );
        }

        if self.files.is_empty() {
            diag.error(field("files"), "must list at least one source file");
        }
        for (n, file) in self.files.iter().enumerate() {
            if !is_safe_relative(file) {
                diag.error_with_hint(
                    format!("target[{index}].files[{n}]"),
                    format!("'{}' must be relative without '..'", file.display()),
                    "source files are resolved from the config file's directory",
                );
            }
        }
    }

    /// Convert to a build target with sources resolved against the config
    /// root.
    pub fn to_target(&self, root: &Path) -> BuildTarget {
        let sources = self.files.iter().map(|f| resolve_from(f, root)).collect();
        BuildTarget::new(&self.name, sources)
    }
}

/// A path is safe when it stays inside the config root: relative, with no
/// `..` components.
fn is_safe_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path.is_relative()
        && path.components().all(|c| !matches!(c, Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn target(name: &str, files: &[&str]) -> TargetConfig {
        TargetConfig {
            name: name.to_string(),
            files: files.iter().map(PathBuf::from).collect(),
        }
    }

    fn validate(target: &TargetConfig) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        target.validate(0, &mut diag);
        diag
    }

    #[test]
    fn test_target_config() {
        let config = test_parse_config(
            "[[target]]\nname = \"all.css\"\nfiles = [\"css/reset.css\", \"css/theme.css\"]",
        );

        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].name, "all.css");
        assert_eq!(
            config.targets[0].files,
            vec![PathBuf::from("css/reset.css"), PathBuf::from("css/theme.css")]
        );
    }

    #[test]
    fn test_valid_target_passes() {
        let diag = validate(&target("all.css", &["css/reset.css"]));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let diag = validate(&target("", &["a.css"]));

        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, "target[0].name");
    }

    #[test]
    fn test_name_with_separator_rejected() {
        for name in ["css/all.css", "css\\all.css"] {
            let diag = validate(&target(name, &["a.css"]));
            assert_eq!(diag.len(), 1, "name {name:?} should be rejected");
        }
    }

    #[test]
    fn test_dot_names_rejected() {
        for name in [".", ".."] {
            let diag = validate(&target(name, &["a.css"]));
            assert_eq!(diag.len(), 1, "name {name:?} should be rejected");
        }
    }

    #[test]
    fn test_empty_files_rejected() {
        let diag = validate(&target("all.css", &[]));

        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, "target[0].files");
    }

    #[test]
    fn test_escaping_file_rejected() {
        let diag = validate(&target("all.css", &["../outside.css"]));

        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, "target[0].files[0]");
    }

    #[test]
    fn test_absolute_file_rejected() {
        let diag = validate(&target("all.css", &["/etc/passwd"]));
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_index_addresses_entry() {
        let mut diag = ConfigDiagnostics::new();
        target("", &["a.css"]).validate(3, &mut diag);

        assert_eq!(diag.errors()[0].field, "target[3].name");
    }

    #[test]
    fn test_to_target_resolves_sources() {
        let built = target("all.css", &["css/a.css"]).to_target(Path::new("/project"));

        assert_eq!(built.name(), "all.css");
        assert_eq!(built.ext(), "css");
        assert_eq!(built.sources(), [PathBuf::from("/project/css/a.css")]);
    }
}
