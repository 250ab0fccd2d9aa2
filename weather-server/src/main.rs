//! Binary crate for the `weather` service.
//!
//! This crate focuses on:
//! - Serving `/weather`, `/health` and `/` over HTTP
//! - One-off lookups and interactive configuration from the command line
//! - Mapping core errors onto HTTP responses

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod handler;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
