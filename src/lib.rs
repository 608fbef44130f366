//! # ytdigest
//!
//! An HTTP service that turns YouTube transcripts into summaries, timestamped
//! highlights, enhanced transcripts, and comment analyses via an LLM, featuring:
//! - Fixed-window rate limiting (per client IP, minute and day horizons)
//! - Bounded least-recently-used result caching with a freshness TTL
//! - Strict video-id and language validation
//! - Bounded timeouts on both external collaborators

pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod features;
pub mod handlers;
pub mod prompts;
pub mod providers;
pub mod state;
pub mod utils;
pub mod validate;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{Level, info};

use crate::config::AppConfig;
use crate::constants::{cache as cache_constants, monitoring, rate_limiter as rl_constants};
use crate::features::{
    cache::TranscriptCache,
    rate_limiter::{FixedWindowLimiter, RateLimitState},
};
use crate::providers::{openai::OpenAiChatModel, youtube::YouTubeTranscripts};
use crate::state::AppState;
use crate::utils::SystemClock;

/// Starts the analysis server.
///
/// # Arguments
/// * `port_override` - Listen port, taking precedence over the PORT variable
///
/// # Returns
/// * `Result<()>` - Ok if the server ran to completion
pub async fn run(port_override: Option<u16>) -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::from_env()?;
    let port = port_override.unwrap_or(config.port);

    if config.youtube_api_key.is_some() {
        info!("Video provider API key configured");
    }

    let clock = Arc::new(SystemClock);

    let cache = TranscriptCache::new(
        cache_constants::MAX_CAPACITY,
        Duration::from_secs(cache_constants::TTL_SECONDS),
        clock.clone(),
    );

    let rate_limiter = Arc::new(FixedWindowLimiter::new(clock.clone()));

    let transcripts = Arc::new(YouTubeTranscripts::new()?);
    let model = Arc::new(OpenAiChatModel::new(&config.openai_api_key, &config.model));

    let app_state = Arc::new(AppState {
        config,
        cache,
        rate_limiter: rate_limiter.clone(),
        transcripts,
        model,
        clock,
    });

    // Periodic maintenance: purge stale cache entries and idle rate-limit
    // clients, logging counts for monitoring.
    let maintenance_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(
            monitoring::METRICS_INTERVAL_SECONDS,
        ));
        loop {
            interval.tick().await;
            let purged = maintenance_state.cache.purge_stale().await;
            if purged > 0 {
                info!(purged, "purged stale cache entries");
            }
            let cache_entries = maintenance_state.cache.len().await;
            info!(
                cache_entries,
                rate_limit_clients = maintenance_state.rate_limiter.active_clients(),
                "maintenance tick"
            );
        }
    });

    let cleanup_limiter = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(rl_constants::IDLE_TTL_SECONDS));
        loop {
            interval.tick().await;
            cleanup_limiter.cleanup_idle_clients();
        }
    });

    let app = app::create_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("ytdigest listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
