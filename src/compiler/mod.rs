//! Build target compilation.
//!
//! A [`Compiler`] turns a build target's source list into the bytes that
//! get cached and served. The only production implementation concatenates
//! sources in order; tests substitute counting fakes to observe when
//! compilation actually happens.

use anyhow::{Context, Result};
use std::fs;

use crate::asset::BuildTarget;

/// Produces the bytes of a build target from its sources.
///
/// Implementations are called from the request worker pool and must be
/// safe to share across threads.
pub trait Compiler: Send + Sync {
    fn generate(&self, target: &BuildTarget) -> Result<Vec<u8>>;
}

/// Concatenates source files in configured order.
///
/// A newline is inserted between chunks that do not already end in one,
/// so the last statement of one file and the first of the next never
/// share a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatCompiler;

impl ConcatCompiler {
    pub const fn new() -> Self {
        Self
    }
}

impl Compiler for ConcatCompiler {
    fn generate(&self, target: &BuildTarget) -> Result<Vec<u8>> {
        let mut output = Vec::new();

        for source in target.sources() {
            let bytes = fs::read(source)
                .with_context(|| format!("Failed to read source file '{}'", source.display()))?;

            if !output.is_empty() && !output.ends_with(b"\n") {
                output.push(b'\n');
            }
            output.extend_from_slice(&bytes);
        }

        Ok(output)
    }
}
