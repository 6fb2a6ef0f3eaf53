use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use advisora_server::config::ServerConfig;
use advisora_server::maintenance::spawn_purge_task;
use advisora_server::router;
use advisora_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let config = ServerConfig::from_env()?;
    config.log_summary();

    let state = AppState::from_config(&config).await?;
    let purge = spawn_purge_task(state.clone(), config.document_retention);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    purge.abort();
    tracing::info!("server stopped");
    Ok(())
}

/// JSON output when `LOG_FORMAT=json`, human-readable otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
