use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use axum_client_ip::ClientIpSource;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{handlers, state::AppState};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn create_app(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/timestamped-summary", post(handlers::timestamped_summary))
        .route("/api/enhanced-transcript", post(handlers::enhanced_transcript))
        .route("/api/top-comments", post(handlers::top_comments))
        .route("/api/health", get(handlers::health))
        .with_state(state)
        .layer(ClientIpSource::ConnectInfo.into_extension());

    router.layer(
        TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let uuid = Uuid::new_v4().to_string();
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or(uuid.as_str());

            tracing::error_span!(
                "request",
                id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    )
}
