use metrics_dashboard::{load_snapshot, router, AppState, Config, MetricsClient};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let client = MetricsClient::new(&config.base_url, &config.api_key)?;

    let payload = load_snapshot(&config.snapshot_path).await;
    if payload.is_some() {
        info!("loaded snapshot from {}", config.snapshot_path.display());
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        "serving {} dashboard on http://{addr}",
        config.environment.label()
    );

    let app = router(AppState::new(config, client, payload));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
