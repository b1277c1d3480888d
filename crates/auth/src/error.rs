use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use medichat_core::response::ApiResponse;

/// Auth errors for the medichat_auth crate.
///
/// Wraps the core `AuthError` and adds crate-specific variants for the
/// I/O that can't live in the functional core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module.
    #[error(transparent)]
    Core(#[from] medichat_core::auth::AuthError),

    /// Login ID is already taken.
    #[error("login ID already taken: {0}")]
    LoginIdTaken(String),

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use medichat_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid login ID or password".to_string(),
                ),
                CoreError::SessionNotFound | CoreError::SessionExpired => {
                    (StatusCode::UNAUTHORIZED, self.to_string())
                }
                CoreError::PasswordHash(_) | CoreError::Storage(_) => {
                    tracing::error!(error = %self, "Auth error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::LoginIdTaken(_) => (StatusCode::CONFLICT, self.to_string()),
            AuthError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body: ApiResponse<()> = ApiResponse::error(status.as_u16(), message);
        (status, Json(body)).into_response()
    }
}
