use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use medichat_core::response::ApiResponse;
use medichat_core::storage::{repository_error_to_status_code, RepositoryError};

/// Catch-all handler error, rendered as the response envelope.
///
/// Repository errors keep their semantic status codes; everything else
/// becomes a 500.
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Builds an error with an explicit status code.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Response {
        let message = message.into();
        tracing::warn!(status = %status, message = %message, "API error");
        let body: ApiResponse<()> = ApiResponse::error(status.as_u16(), message);
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body: ApiResponse<()> = ApiResponse::error(status_code.as_u16(), self.0.to_string());
        (status_code, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
