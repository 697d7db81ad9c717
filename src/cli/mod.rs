//! CLI interface for minance
//!
//! Provides subcommands for:
//! - `serve`: Run the HTTP API
//! - `holdings`: Print valued holdings for an account
//! - `config`: Show the effective configuration

mod holdings;
mod serve;

pub use holdings::HoldingsArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "minance")]
#[command(about = "Binance portfolio backend: valuation and batch market orders")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Print valued holdings for an account
    Holdings(HoldingsArgs),
    /// Show configuration
    Config,
}
