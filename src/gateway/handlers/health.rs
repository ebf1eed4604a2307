//! Health check handler

use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult, ok};

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
}

/// Health check endpoint
///
/// Pings PostgreSQL when one is configured; the in-memory store is always
/// healthy. Failure details are logged, never returned.
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms}}
/// - Unhealthy: 503 Service Unavailable + {code: 5001, msg: "unavailable"}
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    if let Some(db) = &state.db {
        db.health_check().await.map_err(|e| {
            tracing::error!(error = %e, "[HEALTH] PostgreSQL ping failed");
            ApiError::service_unavailable("unavailable")
        })?;
    }

    ok(HealthResponse {
        timestamp_ms: Utc::now().timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::StatusPolicy;
    use crate::persistence::MemoryStore;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_memory_mode_is_healthy() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            None,
            "health-secret".to_string(),
            1,
            StatusPolicy::default(),
        );
        let (status, body) = health_check(State(Arc::new(state))).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body.0.data.unwrap().timestamp_ms > 0);
    }
}
