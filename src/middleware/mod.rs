//! Request handling for the asset prefix.
//!
//! [`AssetMiddleware`] is the decision engine of the serve path: it maps
//! a decoded request path onto a configured build, serves cached bytes
//! when they are fresh, compiles and caches them when they are not, and
//! hands everything else back to the host.
//!
//! Requests and responses are plain data (`AssetRequest`, `AssetResponse`)
//! so the engine stays independent of the HTTP framework. The tiny_http
//! adapter lives in `cli::serve`.

mod gateway;
mod resolve;

#[cfg(test)]
mod tests;

pub use gateway::BuildError;

use gateway::CacheGateway;
use resolve::Resolution;

use crate::asset::AssetCollection;
use crate::cache::Cacher;
use crate::compiler::Compiler;
use crate::utils::mime;

/// Incoming request descriptor: just the decoded URL path.
///
/// Hosts adapt their request type down to this before calling the
/// middleware. The path must be percent-decoded and query-free.
#[derive(Debug, Clone, Copy)]
pub struct AssetRequest<'a> {
    pub path: &'a str,
}

/// Plain-data response, independent of the HTTP framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// 200 response carrying built asset bytes.
    pub fn asset(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    /// 400 response carrying a build failure message as plain text.
    pub fn build_failure(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            content_type: mime::types::PLAIN,
            body: message.into().into_bytes(),
        }
    }
}

/// What the middleware decided to do with a request.
#[derive(Debug)]
pub enum Handling {
    /// Not an asset request; the host handles it.
    Pass,
    /// Serve this response.
    Respond(AssetResponse),
}

/// Decision engine for requests under the asset prefix.
///
/// One instance serves many requests concurrently and is only rebuilt
/// when the config changes, so the build collection is constructed once,
/// not per request.
pub struct AssetMiddleware<C, K> {
    prefix: String,
    collection: AssetCollection,
    gateway: CacheGateway<C, K>,
}

impl<C: Compiler, K: Cacher> AssetMiddleware<C, K> {
    pub fn new(
        prefix: impl Into<String>,
        collection: AssetCollection,
        compiler: C,
        cacher: K,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            collection,
            gateway: CacheGateway::new(compiler, cacher),
        }
    }

    /// The configured URL prefix, e.g. `/asset/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn collection(&self) -> &AssetCollection {
        &self.collection
    }

    /// Decide how to handle a request.
    ///
    /// Returns [`Handling::Pass`] for paths outside the prefix and for
    /// unknown build names. Build failures become 400 responses whose
    /// body is the failure message; they are never cached, so the next
    /// request retries the build.
    pub fn handle(&self, request: &AssetRequest<'_>) -> Handling {
        let target = match resolve::resolve(request.path, &self.prefix, &self.collection) {
            Resolution::NotAsset => return Handling::Pass,
            Resolution::UnknownBuild => {
                crate::debug!("serve"; "{} matches no configured build, passing through", request.path);
                return Handling::Pass;
            }
            Resolution::Build(target) => target,
        };

        match self.gateway.fetch(target) {
            Ok(bytes) => {
                Handling::Respond(AssetResponse::asset(mime::from_extension(target.ext()), bytes))
            }
            Err(err) => {
                crate::log!("error"; "build '{}' failed: {}", target.name(), err);
                Handling::Respond(AssetResponse::build_failure(err.to_string()))
            }
        }
    }
}
