//! Build target definition.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A named build: one served asset produced from an ordered list of
/// source files.
///
/// The name doubles as the request path segment under the serve prefix
/// and as the artifact file name in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    name: String,
    ext: String,
    sources: Vec<PathBuf>,
}

impl BuildTarget {
    /// Create a target. The extension is derived from the name.
    pub fn new(name: impl Into<String>, sources: Vec<PathBuf>) -> Self {
        let name = name.into();
        let ext = Path::new(&name)
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("")
            .to_string();
        Self { name, ext, sources }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File extension of the build name, without the dot.
    /// Empty when the name has none.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Source files in concatenation order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}
