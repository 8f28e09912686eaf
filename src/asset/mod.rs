//! Build target definitions and lookup.

mod collection;
mod target;

pub use collection::AssetCollection;
pub use target::BuildTarget;
