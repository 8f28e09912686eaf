//! `[serve]` section configuration.
//!
//! Contains development server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 4880                 # HTTP port number
//! prefix = "/asset/"          # URL prefix that routes to built assets
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// URL prefix that routes to built assets.
    /// Must start and end with `/` so build names attach cleanly.
    pub prefix: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 4880,
            prefix: "/asset/".to_string(),
        }
    }
}

impl ServeConfig {
    /// Validate the `[serve]` section.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.prefix.is_empty() {
            diag.error_with_hint("serve.prefix", "must not be empty", "the default is \"/asset/\"");
            return;
        }

        let suggested = format!("/{}/", self.prefix.trim_matches('/'));
        if !self.prefix.starts_with('/') {
            diag.error_with_hint(
                "serve.prefix",
                "must start with '/'",
                format!("try \"{suggested}\""),
            );
        }
        if !self.prefix.ends_with('/') {
            diag.error_with_hint(
                "serve.prefix",
                "must end with '/'",
                format!("try \"{suggested}\""),
            );
        }
    }
}
