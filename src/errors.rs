use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::providers::{LlmError, ProviderError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Trop de requêtes. Veuillez réessayer plus tard.")]
    RateLimited,

    #[error("Aucun sous-titre disponible dans les langues spécifiées ({0})")]
    TranscriptNotFound(String),

    #[error("Transcription désactivée pour cette vidéo")]
    TranscriptsDisabled,

    #[error("Délai dépassé lors de l'appel au service externe")]
    UpstreamTimeout,

    #[error("Erreur lors du traitement: {0}")]
    Upstream(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::TranscriptNotFound(_) => StatusCode::NOT_FOUND,
            AppError::TranscriptsDisabled => StatusCode::FORBIDDEN,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        }

        // Standardized error body: {"error": {"message": ..., "status": ...}}
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::NotFound(lang) => AppError::TranscriptNotFound(lang),
            ProviderError::Disabled => AppError::TranscriptsDisabled,
            ProviderError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(error: LlmError) -> Self {
        AppError::Upstream(error.to_string())
    }
}
