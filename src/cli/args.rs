//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Packrat asset build tool CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: packrat.toml)
    #[arg(short = 'C', long, default_value = "packrat.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the development asset server
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// URL prefix that routes to built assets (e.g., /asset/)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Compile every configured target into the cache
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Remove cached artifacts for every configured target
    #[command(visible_alias = "c")]
    Clear {
        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Arguments shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Cache directory override (relative to project root)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[allow(unused)]
impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_clear(&self) -> bool {
        matches!(self.command, Commands::Clear { .. })
    }
}
