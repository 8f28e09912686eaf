//! MIME type detection for built assets.
//!
//! Provides consistent Content-Type strings across the codebase.

/// Common MIME type constants.
pub mod types {
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const SVG: &str = "image/svg+xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess MIME type from a file extension string (without the dot).
///
/// Returns a full MIME type string suitable for an HTTP Content-Type
/// header. Unknown and empty extensions map to `application/octet-stream`.
pub fn from_extension(ext: &str) -> &'static str {
    match ext {
        "css" => types::CSS,
        "js" | "mjs" | "cjs" => types::JAVASCRIPT,
        "json" | "map" => types::JSON,
        "svg" => types::SVG,
        "txt" => types::PLAIN,
        _ => types::OCTET_STREAM,
    }
}
