use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devbox_preview::PreviewError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("Generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Preview(e) => match e {
                PreviewError::GenerationInFlight | PreviewError::StaleGeneration(_) => {
                    StatusCode::CONFLICT
                }
                PreviewError::EmptyPrompt
                | PreviewError::SelectionOutOfRange { .. }
                | PreviewError::UnknownViewMode(_)
                | PreviewError::UnknownPolicy(_) => StatusCode::BAD_REQUEST,
                PreviewError::SandboxUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                PreviewError::Target(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Io(_) | ServerError::Watch(_) | ServerError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
