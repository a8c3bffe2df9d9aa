mod config;
mod shim;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use courier_api::{Router, RouterConfig};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug,tower_http=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    if config.migrate {
        let dsn = config.database_url.clone();
        tokio::task::spawn_blocking(move || courier_db::migrations::bootstrap(&dsn)).await??;
    }

    let router = Arc::new(Router::new(RouterConfig {
        database_url: config.database_url.clone(),
    }));

    let app = shim::app(router);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Courier listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
