use axum::{
    Extension,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::service::Claims;
use crate::gateway::{
    state::AppState,
    types::{ApiError, error_codes},
};
use crate::models::UserRole;

/// Claims of an optionally authenticated request; `None` for anonymous
#[derive(Debug, Clone)]
pub struct MaybeClaims(pub Option<Claims>);

/// `Ok(None)` when there is no Authorization header at all
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized(error_codes::AUTH_FAILED, "Invalid token format"))?;
    Ok(Some(token))
}

fn verify(state: &AppState, token: &str) -> Result<Claims, ApiError> {
    state.user_auth.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "rejected bearer token");
        ApiError::unauthorized(error_codes::AUTH_FAILED, "Invalid or expired token")
    })
}

/// Requires a valid bearer token; inserts [`Claims`]
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract Authorization header
    let token = bearer_token(request.headers())?.ok_or_else(|| {
        ApiError::unauthorized(error_codes::MISSING_AUTH, "Missing Authorization header")
    })?;

    // 2. Verify token and inject claims
    let claims = verify(&state, token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Accepts anonymous requests; a token that is present must still be valid.
/// Always inserts [`MaybeClaims`].
pub async fn optional_jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = match bearer_token(request.headers())? {
        Some(token) => Some(verify(&state, token)?),
        None => None,
    };
    request.extensions_mut().insert(MaybeClaims(claims));
    Ok(next.run(request).await)
}

/// Role gate layered after [`jwt_auth_middleware`]
pub async fn require_laundry_owner(
    Extension(claims): Extension<Claims>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if claims.role() != Some(UserRole::LaundryOwner) {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "laundry owner role required");
        return Err(ApiError::forbidden("laundry owner role required"));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers).unwrap(), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        let err = bearer_token(&headers).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, error_codes::AUTH_FAILED);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());
    }
}
