//! Display CLI entrypoint for the `display` binary.
use clap::Parser as _;
use floorboard_display::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    floorboard_display::inner_main(Cli::parse()).await
}
