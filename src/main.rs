//! Packrat - a development-time asset build tool and server.

#![allow(dead_code)]

mod asset;
mod cache;
mod cli;
mod compiler;
mod config;
mod freshness;
mod logger;
mod middleware;
mod state;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{AppConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    state::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(AppConfig::load(cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::bind_server()?.run(),
        Commands::Build { .. } => cli::build::build_targets(&config),
        Commands::Clear { .. } => cli::clear::clear_cache(&config),
    }
}
