//! Configuration section definitions.
//!
//! Each module corresponds to a section in `packrat.toml`:
//!
//! | Module   | TOML Section | Purpose                          |
//! |----------|--------------|----------------------------------|
//! | `serve`  | `[serve]`    | Development server               |
//! | `cache`  | `[cache]`    | Cache dir and freshness policy   |
//! | `target` | `[[target]]` | Named builds and their sources   |

mod cache;
mod serve;
mod target;

// Re-export section configs
pub use cache::CacheConfig;
pub use serve::ServeConfig;
pub use target::TargetConfig;
