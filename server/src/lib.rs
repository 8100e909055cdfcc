//! Library entry for the `server` crate.
//!
//! Exposes `inner_main` so a workspace-level shim binary can call into the server logic.
//!
//! On boot the server secures a free port, works out the address it advertises, derives the
//! CORS allow-list from it, publishes the resulting endpoint for clients, and serves the API.
#![cfg_attr(
    test,
    expect(clippy::indexing_slicing, reason = "This is not problematic in tests",)
)]

extern crate alloc;
extern crate core;

pub mod app;
pub mod cli;
pub mod endpoint;
pub mod http;
pub mod network;
pub mod store;

use std::env;
use std::sync::Once;

use tracing::{Instrument as _, info};
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use cli::{Cli, Command, LogFormat};
use network::{OriginOptions, detect_host, generate_origins};

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
            .with_timer(ChronoLocal::rfc_3339());

        match log_format {
            LogFormat::Compact => builder.compact().init(),
            LogFormat::Json => builder.json().init(),
            LogFormat::Pretty => builder.pretty().init(),
        }
    });
}

/// The server's main function; can be called from a shim binary.
///
/// Parses CLI and dispatches to the service or the origin listing.
///
/// # Errors
///
/// Returns an error if the server fails to start, in particular when no port can be bound.
pub async fn inner_main(invocation: Cli) -> eyre::Result<()> {
    match invocation.command {
        Command::ControlService(args) => {
            init_tracing(args.log_format);

            let startup_span = tracing::info_span!("server.startup", data = ?args.data, pid = ?std::process::id(), version = env!("CARGO_PKG_VERSION"));

            info!(parent: &startup_span, "Starting server");
            app::start(&args).instrument(startup_span).await
        }
        Command::Origins { cors_origins } => {
            init_tracing(LogFormat::Compact);
            let host = detect_host();
            let origins =
                generate_origins(&host, cors_origins.as_deref(), &OriginOptions::default());
            for origin in origins {
                println!("{origin}");
            }
            Ok(())
        }
    }
}
