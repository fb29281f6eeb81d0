//! Vox admin backend stub -- standalone development server.
//!
//! Serves the REST contract that `vox-client` calls, backed by DashMaps
//! seeded with mock disputes, incidents, trials, tier assignments,
//! customers and compliance requests. Nothing is persisted; data resets on
//! restart.
//!
//! Every `/api` route requires a bearer token. If `VOX_STUB_TOKEN` is set
//! only that token is accepted, otherwise any non-empty token is.

mod routes;
mod seed;
mod store;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("VOX_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8090);
    let token = std::env::var("VOX_STUB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let state = store::AppState::seeded(token);
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("vox-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
