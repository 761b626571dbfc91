mod comparison;
mod config;
mod documents;
mod errors;
mod extract;
mod page;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::comparison::scoring_client::HttpScoringClient;
use crate::config::Config;
use crate::documents::decoder::PreviewDecoder;
use crate::page::session::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV-JD Matcher v{}", env!("CARGO_PKG_VERSION"));
    info!("Scoring service: {}", config.scoring_service_url);

    let sessions = Arc::new(SessionStore::default());
    spawn_session_sweeper(sessions.clone(), config.session_idle_secs);

    let state = AppState {
        sessions,
        scoring: Arc::new(HttpScoringClient::new(config.scoring_service_url.clone())),
        decoder: Arc::new(PreviewDecoder),
        config: config.clone(),
    };

    // The page shell may be served from a different origin.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Evicts idle sessions once a minute for the life of the process.
fn spawn_session_sweeper(sessions: Arc<SessionStore>, idle_secs: u64) {
    // chrono durations top out at i64::MAX milliseconds.
    let max_idle = chrono::Duration::seconds(idle_secs.min(i64::MAX as u64 / 1000) as i64);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let evicted = sessions.sweep_idle(chrono::Utc::now(), max_idle);
            if evicted > 0 {
                info!("Swept {evicted} idle sessions, {} open", sessions.open_count());
            }
        }
    });
}
