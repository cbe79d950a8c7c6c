use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use webhook_chat::config::WidgetConfig;
use webhook_chat::routes;
use webhook_chat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = WidgetConfig::from_env()?;

    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: CHAT_LOG='{}' is not a valid tracing filter ({}); falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(
        webhook = %cfg.webhook_url,
        format = %cfg.request_format,
        "chat widget starting"
    );

    let state = Arc::new(AppState::new(cfg.clone()));

    // Tabs that stop talking are dropped after the configured TTL.
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let period = (sessions.ttl() / 4).max(Duration::from_secs(1));
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                info!(removed, "expired tab sessions purged");
            }
        }
    });

    let app = routes::create_router(&cfg.static_dir)
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_address).await?;
    info!(address = %cfg.bind_address, "chat widget listening");

    if let Err(e) = axum::serve(listener, app).await {
        warn!(error = %e, "server exited with error");
        return Err(e.into());
    }
    Ok(())
}
