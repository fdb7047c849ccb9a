use std::sync::Arc;

use anyhow::{Context, Result};
use post_routes::{cms::CmsClient, config::Config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("post_routes=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let client = CmsClient::new(&config).context("Failed to build CMS client")?;
    info!("Using CMS endpoint {}", client.endpoint());

    let app = server::router(Arc::new(client));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
