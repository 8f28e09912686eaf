//! Development server that builds assets on demand.

mod lifecycle;
mod response;

use crate::{
    cache::FsCacher,
    compiler::ConcatCompiler,
    config::{AppConfig, cfg, reload_config},
    debug, log,
    middleware::{AssetMiddleware, AssetRequest, Handling},
    utils::plural_count,
};
use anyhow::Result;
use arc_swap::ArcSwap;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// The middleware variant the dev server runs: concatenating compiler
/// backed by the filesystem cache.
pub type DevMiddleware = AssetMiddleware<ConcatCompiler, FsCacher>;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    lifecycle::register_server_for_shutdown(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        run_request_loop(&self.server);
        Ok(())
    }
}

/// Assemble the middleware from the current config.
fn build_middleware(config: &AppConfig) -> DevMiddleware {
    AssetMiddleware::new(
        config.serve.prefix.clone(),
        config.collection(),
        ConcatCompiler,
        FsCacher::new(config.cache.dir.clone(), config.cache.freshness),
    )
}

fn run_request_loop(server: &Server) {
    let initial = build_middleware(&cfg());
    log!(
        "serve";
        "{} under {}",
        plural_count(initial.collection().len(), "target"),
        initial.prefix()
    );
    let middleware = ArcSwap::from_pointee(initial);

    // Use thread pool to handle requests concurrently
    // This prevents on-demand compilation from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        maybe_reload(&middleware);

        let middleware = middleware.load_full();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &middleware) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Pick up config edits between requests.
///
/// The middleware is rebuilt only when the config file content actually
/// changed; a broken edit keeps the previous config running.
fn maybe_reload(middleware: &ArcSwap<DevMiddleware>) {
    match reload_config() {
        Ok(true) => {
            let rebuilt = build_middleware(&cfg());
            log!(
                "serve";
                "config reloaded, {} under {}",
                plural_count(rebuilt.collection().len(), "target"),
                rebuilt.prefix()
            );
            middleware.store(Arc::new(rebuilt));
        }
        Ok(false) => {}
        Err(e) => log!("warning"; "config reload failed: {e:#}"),
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, middleware: &DevMiddleware) -> Result<()> {
    // Early exit if shutdown requested
    if crate::state::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let path = normalize_url(request.url());
    debug!("serve"; "{} {}", request.method(), path);

    match middleware.handle(&AssetRequest { path: &path }) {
        Handling::Respond(r) => response::respond(request, r.status, r.content_type, r.body),
        Handling::Pass => response::respond_fallback(request, middleware, &path),
    }
}

/// Normalize URL: decode percent escapes and strip the query string.
///
/// The leading slash is kept so the result lines up with the configured
/// prefix.
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    decoded.split('?').next().unwrap_or(&decoded).to_string()
}
