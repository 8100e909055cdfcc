//! Server boot: port, advertised host, origins, publication, then serving.

use alloc::sync::Arc;
use core::net::IpAddr;

use eyre::WrapErr as _;
use floorboard_common::EndpointInfo;
use tokio::{signal, sync::watch};
use tracing::{debug, info, warn};

use crate::{
    app::AppState,
    cli::ServiceArgs,
    endpoint,
    http::router,
    network::{self, BindError, OriginOptions, bind_free_port, detect_host, generate_origins},
    store::{self, watch_data_file},
};

/// Creates a future that resolves when a shutdown signal is received.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler, only Ctrl-C will stop the server: {e}");
                drop(signal::ctrl_c().await);
            }
        }
    }
    #[cfg(not(unix))]
    {
        drop(signal::ctrl_c().await);
    }
}

/// Emit startup warnings based on the resolved configuration.
fn emit_startup_warnings(args: &ServiceArgs, endpoint: &EndpointInfo) {
    if !endpoint.is_default_port {
        warn!(
            "Port {} was taken, serving on {} instead. Clients will find it through {} or by probing.",
            args.port,
            endpoint.port,
            args.endpoint_file.display()
        );
    }
    match args.jwt_secret.as_deref() {
        None | Some("") => warn!(
            "JWT_SECRET is not set. The CORS allow-list is not an access control; put the API behind token authentication."
        ),
        Some(_) => debug!(expires_in = %args.jwt_expires_in, "Bearer-token authentication configured"),
    }
}

/// Boots the server and serves until a shutdown signal arrives.
///
/// No other initialization happens before a port is secured.
///
/// # Errors
///
/// Returns an error if the bind address is invalid, no port can be bound, the floor data
/// file exists but cannot be loaded, or serving fails.
#[tracing::instrument(skip_all)]
pub(crate) async fn start(args: &ServiceArgs) -> eyre::Result<()> {
    let listen_ip: IpAddr = args
        .bind
        .parse()
        .map_err(|_| BindError::InvalidAddress(args.bind.clone()))?;

    let bound = bind_free_port(listen_ip, args.port).await?;

    let host = detect_host();
    let origins = generate_origins(&host, args.cors_origins.as_deref(), &OriginOptions::default());
    info!(count = origins.len(), "Computed allowed CORS origins");
    debug!(?origins, "Allowed CORS origins");

    let initial_data = store::load_or_empty(&args.data).await?;
    let (data_tx, data_rx) = watch::channel(Arc::new(initial_data));
    {
        let path = args.data.clone();
        tokio::spawn(async move {
            watch_data_file(path, data_tx).await;
        });
    }

    let endpoint = Arc::new(EndpointInfo::new(host, bound.port, args.port, args.electron));
    let app = router::create_app(
        AppState {
            endpoint: endpoint.clone(),
            data_rx,
        },
        &origins,
    );

    for url in network::identify::reachable_urls(bound.port) {
        info!("Listening on {url}");
    }
    emit_startup_warnings(args, &endpoint);

    endpoint::publish(&args.endpoint_file, &endpoint).await;

    axum::serve(bound.listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("HTTP server failed")?;
    info!("Received shutdown, shut down");
    Ok(())
}
