use axum::http::HeaderValue;
use budget_ledger_backend::{config::AppConfig, create_router, initialize_backend};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_state = initialize_backend(&config).await?;
    let cors_origin = config.cors_origin.parse::<HeaderValue>()?;
    let app = create_router(app_state, cors_origin);

    let addr = config.socket_addr();
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
