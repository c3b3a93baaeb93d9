use std::{path::PathBuf, sync::Arc};

use tracing::info;

use forum_core::{config, ForumCore};

mod error;
mod handlers;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum=info,forum_core=info,tower_http=info".into()),
        )
        .init();

    // Config
    let config = match std::env::var("FORUM_CONFIG") {
        Ok(path) => config::load_or_init(&PathBuf::from(path)).await?,
        Err(_) => config::get_or_init().await?,
    };

    // Database + services
    let core = ForumCore::start(config).await?;
    let listen_addr = core.config.listen_addr.clone();

    let app = routes::router(Arc::new(core));

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("forum server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
