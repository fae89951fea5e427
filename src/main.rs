use gym_tracker::config::{Config, StoreBackend};
use gym_tracker::{router, AppState};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        mode = ?config.mode,
        api = %config.api_base(),
        reconcile = ?config.reconcile_policy,
        "starting tracker"
    );
    if config.store == StoreBackend::File {
        info!(path = %config.data_path.display(), "log document");
    }

    let state = AppState::from_config(config);
    info!(store = state.logs.backend(), "log store ready");
    let app = router(state);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
