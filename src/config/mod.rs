//! Project configuration management for `packrat.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── serve      # [serve]
//! │   ├── cache      # [cache]
//! │   └── target     # [[target]]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                      |
//! |--------------|----------------------------------------------|
//! | `[serve]`    | Development server (interface, port, prefix) |
//! | `[cache]`    | Cache directory and freshness policy         |
//! | `[[target]]` | Named builds and their source files          |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{CacheConfig, ServeConfig, TargetConfig};

// Re-export from types/
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, cfg, init_config, reload_config};

use crate::{
    asset::AssetCollection,
    cli::{Cli, Commands, CommonArgs},
    log,
};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing packrat.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Development server settings
    pub serve: ServeConfig,

    /// Cache settings
    pub cache: CacheConfig,

    /// Named builds
    #[serde(rename = "target")]
    pub targets: Vec<TargetConfig>,
}

impl AppConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is determined by the config file's parent directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if !exists {
            log!(
                "error";
                "Config file '{}' not found. Create one with [[target]] entries to get started.",
                cli.config.display()
            );
            std::process::exit(1);
        }

        let mut config = Self::from_path(&config_path)?;

        // Validate raw paths before normalization
        config.validate_paths()?;

        // Set paths and apply CLI options
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        // Full validation after CLI overrides are in place
        config.validate()?;

        Ok(config)
    }

    /// Resolve config file path by searching upward from cwd.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => {
                let cwd =
                    std::env::current_dir().context("Failed to get current working directory")?;
                Ok((cwd.join(&cli.config), false))
            }
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.root = crate::utils::path::normalize_path(&root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);

        self.apply_command_options(cli);

        // Cache dir resolves against the project root, never cwd
        self.cache.normalize(&self.root);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get CLI arguments reference
    pub const fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Build the named-target lookup table with sources resolved against
    /// the project root.
    pub fn collection(&self) -> AssetCollection {
        AssetCollection::new(self.targets.iter().map(|t| t.to_target(&self.root)))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve {
                common,
                interface,
                port,
                prefix,
            } => {
                self.apply_common_args(common);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.prefix, prefix.as_ref());
            }
            Commands::Build { common } | Commands::Clear { common } => {
                self.apply_common_args(common);
            }
        }
    }

    /// Apply arguments shared by every command.
    fn apply_common_args(&mut self, args: &CommonArgs) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.cache.dir, args.cache_dir.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate target entries before normalization.
    ///
    /// This must be called before `finalize()` because path normalization
    /// converts relative paths to absolute paths, making it impossible to
    /// detect if the user specified an absolute path in the config.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        let mut seen = FxHashSet::default();
        for (index, target) in self.targets.iter().enumerate() {
            target.validate(index, &mut diag);

            if !target.name.is_empty() && !seen.insert(target.name.as_str()) {
                diag.error(
                    format!("target[{index}].name"),
                    format!("duplicate name '{}'", target.name),
                );
            }
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once. Runs after
    /// CLI overrides so a bad `--prefix` is caught the same way as a bad
    /// config value.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if !self.config_path.exists() {
            bail!(ConfigError::Validation("config file not found".into()));
        }

        self.serve.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from TOML content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result: Result<AppConfig, _> = toml::from_str("[serve\nport = 4880");
        assert!(result.is_err());
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.serve.port, 4880);
        assert_eq!(config.serve.prefix, "/asset/");
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[serve]\nport = 8080\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = AppConfig::parse_with_ignored(content).unwrap();

        // Config should parse successfully
        assert_eq!(config.serve.port, 8080);

        // Unknown fields should be collected
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[serve]\nport = 8080";
        let (_, ignored) = AppConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_duplicate_target_names_rejected() {
        let config = test_parse_config(
            "[[target]]\nname = \"all.css\"\nfiles = [\"a.css\"]\n\n[[target]]\nname = \"all.css\"\nfiles = [\"b.css\"]",
        );

        let err = config.validate_paths().unwrap_err();
        assert!(err.to_string().contains("duplicate name 'all.css'"));
    }

    #[test]
    fn test_distinct_target_names_accepted() {
        let config = test_parse_config(
            "[[target]]\nname = \"all.css\"\nfiles = [\"a.css\"]\n\n[[target]]\nname = \"all.js\"\nfiles = [\"b.js\"]",
        );

        assert!(config.validate_paths().is_ok());
    }

    #[test]
    fn test_collection_resolves_against_root() {
        let mut config = test_parse_config("[[target]]\nname = \"all.css\"\nfiles = [\"a.css\"]");
        config.root = PathBuf::from("/project");

        let collection = config.collection();
        let target = collection.get("all.css").unwrap();
        assert_eq!(target.sources(), [PathBuf::from("/project/a.css")]);
    }
}
