use clap::Parser;
use flatstore_server::{ServerConfig, StartupError, build_app};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    tokio::fs::create_dir_all(&config.data_dir).await?;
    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "flatstore-server listening on http://{} with data in {}",
        config.bind,
        config.data_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("flatstore-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
