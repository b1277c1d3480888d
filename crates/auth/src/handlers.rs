//! Register, login and logout routes.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use medichat_core::auth::{calculate_expiry, generate_session_id, Session, SessionId};
use medichat_core::auth::AuthError as CoreAuthError;
use medichat_core::domain::User;
use medichat_core::response::ApiResponse;
use medichat_core::storage::RepositoryError;

use crate::error::AuthError;
use crate::extractors::CurrentUser;
use crate::password::{hash_password, verify_password};
use crate::state::AuthState;

/// Request payload for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub login_id: String,
    pub name: String,
    pub password: String,
}

/// Request payload for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

/// User details returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub user_id: Uuid,
    pub login_id: String,
    pub name: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            login_id: user.login_id.clone(),
            name: user.name.clone(),
        }
    }
}

/// Login response payload: the session token, also set as a cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

/// Builds the auth sub-router (`/register`, `/login`, `/logout`, `/me`).
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), AuthError> {
    if payload.login_id.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AuthError::Validation(
            "login_id and name must not be empty".to_string(),
        ));
    }
    if payload.password.len() < 8 {
        return Err(AuthError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let existing = state
        .users
        .get_user_by_login_id(&payload.login_id)
        .await
        .map_err(|e| CoreAuthError::Storage(e.to_string()))?;
    if existing.is_some() {
        return Err(AuthError::LoginIdTaken(payload.login_id));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| CoreAuthError::PasswordHash(e.to_string()))?;
    let user = User::new(payload.login_id, payload.name, password_hash);

    // A concurrent registration can slip past the lookup above; the
    // unique constraint still reports it as a conflict.
    state.users.create_user(&user).await.map_err(|e| match e {
        RepositoryError::AlreadyExists { .. } => AuthError::LoginIdTaken(user.login_id.clone()),
        e => AuthError::Core(CoreAuthError::Storage(e.to_string())),
    })?;

    tracing::info!(user_id = %user.id, login_id = %user.login_id, "Registered user");

    let body = ApiResponse::success(201, UserDto::from(&user), "Account created");
    Ok((StatusCode::CREATED, Json(body)))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AuthError> {
    let user = state
        .users
        .get_user_by_login_id(&payload.login_id)
        .await
        .map_err(|e| CoreAuthError::Storage(e.to_string()))?
        .ok_or(CoreAuthError::InvalidCredentials)?;

    let matches = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| CoreAuthError::PasswordHash(e.to_string()))?;
    if !matches {
        return Err(CoreAuthError::InvalidCredentials.into());
    }

    let now = Utc::now();
    let session = Session {
        id: generate_session_id(),
        user_id: user.id.to_string(),
        created_at: now,
        expires_at: calculate_expiry(
            now,
            Duration::seconds(state.config.session_ttl.as_secs() as i64),
        ),
    };
    state
        .sessions
        .create_session(&session)
        .await
        .map_err(AuthError::Core)?;

    tracing::info!(user_id = %user.id, "User logged in");

    let cookie = Cookie::build((state.config.cookie_name.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64
        ))
        .build();
    let jar = jar.add(cookie);

    let body = ApiResponse::success(
        200,
        LoginResponse {
            token: session.id.to_string(),
            user: UserDto::from(&user),
        },
        "Login successful",
    );
    Ok((jar, Json(body)))
}

async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<()>>), AuthError> {
    // Bearer token takes precedence, matching the extractors.
    let session_id = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| SessionId::new(token.to_string()))
        .or_else(|| {
            jar.get(&state.config.cookie_name)
                .map(|c| SessionId::new(c.value().to_string()))
        });

    if let Some(id) = session_id {
        state
            .sessions
            .delete_session(&id)
            .await
            .map_err(AuthError::Core)?;
    }

    let jar = jar.remove(Cookie::from(state.config.cookie_name.clone()));
    let body = ApiResponse::success_empty(200, "Logged out");
    Ok((jar, Json(body)))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(
        200,
        UserDto::from(&user),
        "Profile fetched",
    ))
}
