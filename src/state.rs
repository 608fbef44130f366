use std::sync::Arc;

use crate::config::AppConfig;
use crate::features::cache::TranscriptCache;
use crate::features::rate_limiter::RateLimitState;
use crate::providers::{ChatModel, TranscriptProvider};
use crate::utils::Clock;

/// Shared application state, explicitly constructed at startup and passed to
/// every handler. Collaborators are trait objects so tests can inject fakes.
pub struct AppState {
    pub config: AppConfig,
    pub cache: TranscriptCache,
    pub rate_limiter: Arc<dyn RateLimitState>,
    pub transcripts: Arc<dyn TranscriptProvider>,
    pub model: Arc<dyn ChatModel>,
    pub clock: Arc<dyn Clock>,
}
