//! Server CLI entrypoint for the `server` binary.
use clap::Parser as _;
use eyre::Result;
use floorboard_server::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Delegate to library entrypoint
    floorboard_server::inner_main(Cli::parse()).await
}
