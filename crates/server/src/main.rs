use std::path::PathBuf;

use anyhow::Context;
use enjoyrecord_search::{Catalog, SearchConfig};
use enjoyrecord_server::state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_path: PathBuf = std::env::var("ENJOYRECORD_LOG_PATH")
        .unwrap_or_else(|_| "data/enjoyrecord.log".to_string())
        .into();
    let _log_guard =
        enjoyrecord_server::logging::init(&log_path).context("failed to initialize logging")?;

    let config = SearchConfig::from_env();
    info!(
        tmdb = config.tmdb_api_key.is_some(),
        omdb = config.omdb_api_key.is_some(),
        rawg = config.rawg_api_key.is_some(),
        search_timeout_secs = config.search_timeout.as_secs(),
        bulk_timeout_secs = config.bulk_timeout.as_secs(),
        "search configuration loaded"
    );

    let admin_password = std::env::var("ENJOYRECORD_ADMIN_PASSWORD").ok();
    let app_state = AppState::new(Catalog::new(&config), admin_password);
    if !app_state.admin_configured() {
        info!("ENJOYRECORD_ADMIN_PASSWORD not set; admin routes are open");
    }

    let app = enjoyrecord_server::routes::build_router(app_state);

    let bind_addr =
        std::env::var("ENJOYRECORD_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
