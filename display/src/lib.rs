//! Library entry for the `display` crate.
//!
//! Exposes `inner_main` so a workspace-level shim binary can call into the display logic.
//!
//! A display finds the API on its own, pulls floor data for its screen, and follows the
//! screen count and carousel speed shared by every display on the machine.
#![cfg_attr(
    test,
    expect(clippy::indexing_slicing, reason = "This is not problematic in tests",)
)]

extern crate alloc;
extern crate core;

pub mod api;
pub mod cli;
pub mod resolver;
pub mod runner;
pub mod sync;

use alloc::sync::Arc;
use core::time::Duration;
use std::{env, sync::Once};

use eyre::WrapErr as _;
use floorboard_common::{ConfigKind, DisplayConfig, net::local_ipv4_addresses};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use api::FloorClient;
use cli::{Cli, Command, DisplayOptions, LogFormat, SetCommand};
use resolver::{EndpointResolver, HttpProbe, ResolverConfig};
use runner::Dashboard;
use sync::{ConfigSyncBus, FileStore};

static INIT_TRACING: Once = Once::new();

/// Installs the global tracing subscriber once.
fn init_tracing(log_format: LogFormat) {
    INIT_TRACING.call_once(move || {
        let default_level = if env::var("FLOORBOARD_INTEGRATION_TEST").is_ok() {
            "error"
        } else {
            "info"
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_timer(ChronoLocal::rfc_3339())
            // stdout carries the rendered screens
            .with_writer(std::io::stderr);

        match log_format {
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Json => builder.json().init(),
            LogFormat::Pretty => builder.pretty().init(),
        }
    });
}

/// Builds the resolver from the global options and this machine's interfaces.
///
/// # Errors
///
/// Returns an error if the probe's HTTP client cannot be built.
pub fn build_resolver(options: &DisplayOptions) -> eyre::Result<EndpointResolver<HttpProbe>> {
    let local_hosts = match local_ipv4_addresses() {
        Ok(addrs) => addrs.iter().map(ToString::to_string).collect(),
        Err(e) => {
            warn!(?e, "Failed to enumerate network interfaces, probing loopback only");
            Vec::new()
        }
    };
    let config = ResolverConfig {
        explicit_url: options.api_url.clone(),
        default_port: options.api_port,
        page_host: options.page_host.clone(),
        local_hosts,
        loopback_first: options.loopback_first,
        ports: options.probe_ports.clone(),
    };
    let probe = HttpProbe::new(Duration::from_millis(options.probe_timeout_ms))
        .wrap_err("Failed to build the probe HTTP client")?;
    Ok(EndpointResolver::new(config, probe))
}

/// Opens the settings bus, seeding an unwritten store with the server's defaults if reachable.
async fn open_bus(options: &DisplayOptions, client: Option<&FloorClient<HttpProbe>>) -> ConfigSyncBus {
    let defaults = match client {
        Some(client) => client.display_defaults().await.unwrap_or_else(|e| {
            warn!("Using built-in display defaults: {}", eyre::Report::new(e));
            DisplayConfig::default()
        }),
        None => DisplayConfig::default(),
    };
    ConfigSyncBus::open(FileStore::new(&options.store), defaults).await
}

/// The display's main function; can be called from a shim binary.
///
/// # Errors
///
/// Returns an error if a setting is rejected, the settings store cannot be written,
/// or a display loop fails.
pub async fn inner_main(invocation: Cli) -> eyre::Result<()> {
    let options = invocation.options;
    init_tracing(options.log_format);

    match invocation.command {
        Command::Set(set) => {
            let (kind, value) = match set {
                SetCommand::Screens { count } => (ConfigKind::Screens, count),
                SetCommand::Speed { ms } => (ConfigKind::Speed, ms),
            };
            let bus = open_bus(&options, None).await;
            let change = bus
                .notify(kind, value)
                .await
                .wrap_err("Failed to change display setting")?;
            println!("{} = {}", kind.storage_key(), change.data);
            Ok(())
        }
        Command::Resolve => {
            let resolver = build_resolver(&options)?;
            let api_url = resolver.resolve().await;
            match resolver.current_value() {
                Some(resolution) => println!("{api_url} ({})", resolution.strategy),
                None => println!("{api_url}"),
            }
            Ok(())
        }
        Command::Show { screen } => {
            let dashboard = start_dashboard(&options).await?;
            info!(screen, "Showing screen");
            dashboard.show(screen).await
        }
        Command::Carousel => {
            let dashboard = start_dashboard(&options).await?;
            info!("Starting carousel");
            dashboard.carousel().await
        }
    }
}

async fn start_dashboard(options: &DisplayOptions) -> eyre::Result<Dashboard> {
    let resolver = Arc::new(build_resolver(options)?);
    let client = Arc::new(FloorClient::new(resolver, reqwest::Client::new()));
    let bus = Arc::new(open_bus(options, Some(&*client)).await);
    Ok(Dashboard::start(
        bus,
        client,
        Duration::from_secs(options.poll_interval_secs),
    ))
}
