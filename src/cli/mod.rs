//! Command-line interface module.

mod args;
pub mod build;
pub mod clear;
pub mod serve;

pub use args::{Cli, Commands, CommonArgs};
