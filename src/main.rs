mod config;
mod email;
mod html;
mod http;
mod openai;
mod rank;
mod serp;
mod server;
mod stripe;

pub const USER_AGENT: &str = concat!("lvb/", env!("CARGO_PKG_VERSION"));

use config::Settings;
use server::AppState;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lvb=info".parse()?),
        )
        .init();

    let settings = Settings::from_env()?;
    let state = AppState::from_env(http::build_client()?, settings);
    let bind = state.settings().bind;

    let listener = TcpListener::bind(bind).await?;
    info!(%bind, "starting lvb server");

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("server error: {e}"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
