//! Authentication endpoints
//!
//! Signup and login hand back the user together with a fresh session token;
//! logout revokes the token; verify resolves a token back to its user.

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::api::middleware::{extract_token, ApiError, AppState, AuthenticatedUser};
use crate::api::responses::ApiResponse;
use crate::models::User;
use crate::services::auth::{AuthServiceError, SignUpInput};

/// Request body for signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User as exposed over the API. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Payload returned by signup and login
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: UserResponse,
    pub token: String,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let (user, session) = state
        .auth_service
        .sign_up(SignUpInput {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        "Signup successful",
        AuthData {
            user: user.into(),
            token: session.token,
        },
    )))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, ApiError> {
    let (user, session) = state
        .auth_service
        .log_in(&request.username, &request.password)
        .await?;

    Ok(Json(ApiResponse::success(
        "Login successful",
        AuthData {
            user: user.into(),
            token: session.token,
        },
    )))
}

/// POST /api/auth/logout
///
/// Idempotent from the client's point of view: revoking a token that is
/// already gone still answers success.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = extract_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authorization token"))?;

    match state.auth_service.log_out(token).await {
        Ok(()) | Err(AuthServiceError::InvalidSession) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(Json(ApiResponse::success_empty("Logout successful")))
}

/// GET /api/auth/verify
pub async fn verify(
    AuthenticatedUser(user): AuthenticatedUser,
) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::success("Token valid", user.into()))
}
