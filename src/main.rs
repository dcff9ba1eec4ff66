use std::sync::Arc;

use anyhow::Context;

use goodfriends_api::config::AppConfig;
use goodfriends_api::services::memory::InMemoryStore;
use goodfriends_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up FRIENDS_APPSETTINGS etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env().context("loading configuration")?);
    let set = config.active_db_set();
    tracing::info!(
        "active database set: {} on {} ({} logins)",
        set.db_location,
        set.db_server,
        set.db_logins.len()
    );

    let store = Arc::new(InMemoryStore::bootstrap(config.clone()));
    let state = AppState {
        config,
        friends: store.clone(),
        logins: store,
    };

    // Allow tests or deployments to override port via env
    let port = std::env::var("FRIENDS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("GoodFriends API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
