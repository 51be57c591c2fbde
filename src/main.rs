use anyhow::Result;
use tracing::info;

use folio_site::config::Config;
use folio_site::server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (absent in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folio_site=info".parse()?),
        )
        .init();

    info!("Starting folio site");

    let config = Config::from_env()?;
    info!(
        "Content store: {}, native language: {}",
        config.supabase_url, config.native_language_code
    );

    server::run_server(config).await
}
