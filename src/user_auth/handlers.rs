use axum::{Extension, extract::State};
use std::sync::Arc;

use super::service::{
    AuthResponse, Claims, LoginRequest, RegisterRequest, UpdateLocationRequest, UserProfile,
};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiJson, ApiResponse, ApiResult, created, ok};

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let resp = state.user_auth.register(req).await.inspect_err(|e| {
        tracing::warn!(error = %e, "registration rejected");
    })?;
    created(resp)
}

/// Login user
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let resp = state.user_auth.login(req).await.inspect_err(|e| {
        tracing::warn!(error = %e, "login failed");
    })?;
    ok(resp)
}

/// Current user's profile
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Authentication failed")
    ),
    security(("jwt_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<UserProfile> {
    let user_id = claims.user_id()?;
    ok(state.user_auth.profile(user_id).await?)
}

/// Overwrite the caller's stored location
///
/// PATCH /api/v1/auth/update-location
#[utoipa::path(
    patch,
    path = "/api/v1/auth/update-location",
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Coordinates out of range"),
        (status = 401, description = "Authentication failed")
    ),
    security(("jwt_auth" = [])),
    tag = "Auth"
)]
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<UpdateLocationRequest>,
) -> ApiResult<UserProfile> {
    let user_id = claims.user_id()?;
    ok(state.user_auth.update_location(user_id, req).await?)
}
