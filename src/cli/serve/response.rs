//! HTTP response handlers.

use super::DevMiddleware;
use crate::utils::{mime::types::PLAIN, plural_count};
use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with an asset engine response, honoring HEAD requests.
pub fn respond(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, status, content_type);
    }
    send_body(request, status, content_type, body)
}

/// Respond to a passed-through request.
///
/// The server only exists to serve assets, so everything outside the
/// prefix gets a plain 404, except `/` which lists the configured
/// targets for quick inspection.
pub fn respond_fallback(request: Request, middleware: &DevMiddleware, path: &str) -> Result<()> {
    if path == "/" {
        return respond_index(request, middleware);
    }

    if is_head_request(&request) {
        return send_head(request, 404, PLAIN);
    }
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Respond with a plain-text listing of the configured targets.
fn respond_index(request: Request, middleware: &DevMiddleware) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 200, PLAIN);
    }

    let targets = middleware.collection().sorted();

    let mut body = format!("packrat {}\n\n", env!("CARGO_PKG_VERSION"));
    if targets.is_empty() {
        body.push_str("no targets configured\n");
    } else {
        body.push_str(&format!("{}:\n", plural_count(targets.len(), "target")));
        for target in targets {
            body.push_str(&format!("  {}{}\n", middleware.prefix(), target.name()));
        }
    }

    send_body(request, 200, PLAIN, body.into_bytes())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
