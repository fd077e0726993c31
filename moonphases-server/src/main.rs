//! Binary crate for the `moonphases` service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and layering them over the config file
//! - Logger setup
//! - Serving the GetPhases RPC over HTTP

use clap::Parser;

mod cli;
mod logging;
mod rpc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
