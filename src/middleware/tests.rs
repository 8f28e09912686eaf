//! Decision engine scenarios with fake build capabilities.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use parking_lot::Mutex;

use super::gateway::{BuildError, CacheGateway};
use super::{AssetMiddleware, AssetRequest, AssetResponse, Handling};
use crate::asset::{AssetCollection, BuildTarget};
use crate::cache::Cacher;
use crate::compiler::Compiler;
use crate::utils::mime;

// ----------------------------------------------------------------------------
// fakes
// ----------------------------------------------------------------------------

/// Compiler fake that counts invocations and returns canned output.
struct FakeCompiler {
    output: Vec<u8>,
    fail_with: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl FakeCompiler {
    fn returning(bytes: &[u8]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let compiler = Self {
            output: bytes.to_vec(),
            fail_with: None,
            delay: None,
            calls: calls.clone(),
        };
        (compiler, calls)
    }

    fn failing(message: &str) -> (Self, Arc<AtomicUsize>) {
        let (mut compiler, calls) = Self::returning(b"");
        compiler.fail_with = Some(message.to_string());
        (compiler, calls)
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Compiler for FakeCompiler {
    fn generate(&self, _target: &BuildTarget) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        Ok(self.output.clone())
    }
}

/// In-memory cache with controllable freshness.
#[derive(Default)]
struct MemCacher {
    store: Mutex<Option<Vec<u8>>>,
    always_stale: bool,
    fail_write: bool,
}

impl MemCacher {
    fn empty() -> Self {
        Self::default()
    }

    fn preloaded(bytes: &[u8]) -> Self {
        let cacher = Self::default();
        *cacher.store.lock() = Some(bytes.to_vec());
        cacher
    }

    fn stored(&self) -> Option<Vec<u8>> {
        self.store.lock().clone()
    }
}

impl Cacher for MemCacher {
    fn is_fresh(&self, _target: &BuildTarget) -> Result<bool> {
        Ok(!self.always_stale && self.store.lock().is_some())
    }

    fn read(&self, target: &BuildTarget) -> Result<Vec<u8>> {
        self.store
            .lock()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no cached artifact for '{}'", target.name()))
    }

    fn write(&self, _target: &BuildTarget, bytes: &[u8]) -> Result<()> {
        if self.fail_write {
            bail!("cache write refused");
        }
        *self.store.lock() = Some(bytes.to_vec());
        Ok(())
    }
}

// Lets tests keep a handle on the cache the engine owns.
impl Cacher for Arc<MemCacher> {
    fn is_fresh(&self, target: &BuildTarget) -> Result<bool> {
        self.as_ref().is_fresh(target)
    }

    fn read(&self, target: &BuildTarget) -> Result<Vec<u8>> {
        self.as_ref().read(target)
    }

    fn write(&self, target: &BuildTarget, bytes: &[u8]) -> Result<()> {
        self.as_ref().write(target, bytes)
    }
}

// ----------------------------------------------------------------------------
// helpers
// ----------------------------------------------------------------------------

fn middleware<C: Compiler, K: Cacher>(compiler: C, cacher: K) -> AssetMiddleware<C, K> {
    let collection = AssetCollection::new(vec![
        BuildTarget::new("app.js", vec![]),
        BuildTarget::new("all.css", vec![]),
    ]);
    AssetMiddleware::new("/asset/", collection, compiler, cacher)
}

fn request(path: &str) -> AssetRequest<'_> {
    AssetRequest { path }
}

fn expect_response(handling: Handling) -> AssetResponse {
    match handling {
        Handling::Respond(response) => response,
        Handling::Pass => panic!("expected a response, got pass-through"),
    }
}

// ----------------------------------------------------------------------------
// pass-through
// ----------------------------------------------------------------------------

#[test]
fn test_pass_through_outside_prefix() {
    let (compiler, calls) = FakeCompiler::returning(b"bundle");
    let engine = middleware(compiler, MemCacher::empty());

    assert!(matches!(
        engine.handle(&request("/index.html")),
        Handling::Pass
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_pass_through_unknown_build() {
    let (compiler, calls) = FakeCompiler::returning(b"bundle");
    let engine = middleware(compiler, MemCacher::empty());

    assert!(matches!(
        engine.handle(&request("/asset/missing.js")),
        Handling::Pass
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_pass_through_bare_prefix() {
    let (compiler, _) = FakeCompiler::returning(b"bundle");
    let engine = middleware(compiler, MemCacher::empty());

    assert!(matches!(engine.handle(&request("/asset/")), Handling::Pass));
}

// ----------------------------------------------------------------------------
// cache-or-compile
// ----------------------------------------------------------------------------

#[test]
fn test_compiles_on_first_request() {
    let (compiler, calls) = FakeCompiler::returning(b"let app = 1;");
    let engine = middleware(compiler, MemCacher::empty());

    let response = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, mime::types::JAVASCRIPT);
    assert_eq!(response.body, b"let app = 1;");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_compiled_bytes_are_cached() {
    let (compiler, _) = FakeCompiler::returning(b"let app = 1;");
    let collection = AssetCollection::new(vec![BuildTarget::new("app.js", vec![])]);
    let cacher = Arc::new(MemCacher::empty());
    let engine = AssetMiddleware::new("/asset/", collection, compiler, cacher.clone());

    expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(cacher.stored().as_deref(), Some(b"let app = 1;".as_slice()));
}

#[test]
fn test_serves_cached_without_compiling() {
    let (compiler, calls) = FakeCompiler::returning(b"fresh bytes");
    let engine = middleware(compiler, MemCacher::preloaded(b"cached bytes"));

    let response = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"cached bytes");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_second_request_hits_cache() {
    let (compiler, calls) = FakeCompiler::returning(b"bundle");
    let engine = middleware(compiler, MemCacher::empty());

    let first = expect_response(engine.handle(&request("/asset/app.js")));
    let second = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_stale_cache_recompiled() {
    let (compiler, calls) = FakeCompiler::returning(b"new bundle");
    let cacher = MemCacher {
        always_stale: true,
        ..MemCacher::preloaded(b"old bundle")
    };
    let engine = middleware(compiler, cacher);

    let response = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(response.body, b"new bundle");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_content_type_for_css_build() {
    let (compiler, _) = FakeCompiler::returning(b"a {}");
    let engine = middleware(compiler, MemCacher::empty());

    let response = expect_response(engine.handle(&request("/asset/all.css")));
    assert_eq!(response.content_type, mime::types::CSS);
}

#[test]
fn test_content_type_without_extension() {
    let (compiler, _) = FakeCompiler::returning(b"data");
    let collection = AssetCollection::new(vec![BuildTarget::new("bundle", vec![])]);
    let engine = AssetMiddleware::new("/asset/", collection, compiler, MemCacher::empty());

    let response = expect_response(engine.handle(&request("/asset/bundle")));
    assert_eq!(response.content_type, mime::types::OCTET_STREAM);
}

// ----------------------------------------------------------------------------
// failures
// ----------------------------------------------------------------------------

#[test]
fn test_compile_failure_returns_400() {
    let (compiler, _) = FakeCompiler::failing("app.js:3 unexpected token");
    let engine = middleware(compiler, MemCacher::empty());

    let response = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(response.status, 400);
    assert_eq!(response.content_type, mime::types::PLAIN);
    assert_eq!(response.body, b"app.js:3 unexpected token");
}

#[test]
fn test_compile_failure_is_not_cached() {
    let (compiler, calls) = FakeCompiler::failing("boom");
    let collection = AssetCollection::new(vec![BuildTarget::new("app.js", vec![])]);
    let cacher = Arc::new(MemCacher::empty());
    let engine = AssetMiddleware::new("/asset/", collection, compiler, cacher.clone());

    expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(cacher.stored(), None);

    // The next request retries instead of serving a poisoned entry
    let response = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(response.status, 400);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_write_failure_returns_400() {
    let (compiler, _) = FakeCompiler::returning(b"bundle");
    let cacher = MemCacher {
        fail_write: true,
        ..MemCacher::empty()
    };
    let engine = middleware(compiler, cacher);

    let response = expect_response(engine.handle(&request("/asset/app.js")));
    assert_eq!(response.status, 400);
    assert_eq!(
        String::from_utf8_lossy(&response.body),
        "cache write refused"
    );
}

// ----------------------------------------------------------------------------
// gateway
// ----------------------------------------------------------------------------

#[test]
fn test_gateway_distinguishes_error_kinds() {
    let target = BuildTarget::new("app.js", vec![]);

    let (compiler, _) = FakeCompiler::failing("syntax error");
    let gateway = CacheGateway::new(compiler, MemCacher::empty());
    let err = gateway.fetch(&target).unwrap_err();
    assert!(matches!(err, BuildError::Compile(_)));
    assert_eq!(err.to_string(), "syntax error");

    let (compiler, _) = FakeCompiler::returning(b"bundle");
    let cacher = MemCacher {
        fail_write: true,
        ..MemCacher::empty()
    };
    let gateway = CacheGateway::new(compiler, cacher);
    let err = gateway.fetch(&target).unwrap_err();
    assert!(matches!(err, BuildError::Cache(_)));
}

#[test]
fn test_concurrent_requests_compile_once() {
    let (compiler, calls) = FakeCompiler::returning(b"bundle");
    let compiler = compiler.with_delay(Duration::from_millis(25));
    let engine = middleware(compiler, MemCacher::empty());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let response = expect_response(engine.handle(&request("/asset/app.js")));
                assert_eq!(response.status, 200);
                assert_eq!(response.body, b"bundle");
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_different_builds_do_not_serialize() {
    // Both builds compile; the per-name locks are independent so this
    // must not deadlock or cross-pollinate outputs.
    let (compiler, calls) = FakeCompiler::returning(b"shared output");
    let cacher = MemCacher {
        always_stale: true,
        ..MemCacher::empty()
    };
    let engine = middleware(compiler, cacher);

    std::thread::scope(|scope| {
        let js = scope.spawn(|| expect_response(engine.handle(&request("/asset/app.js"))));
        let css = scope.spawn(|| expect_response(engine.handle(&request("/asset/all.css"))));
        assert_eq!(js.join().unwrap().content_type, mime::types::JAVASCRIPT);
        assert_eq!(css.join().unwrap().content_type, mime::types::CSS);
    });

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
