//! Extractors whose rejections speak the `ApiResponse` envelope
//!
//! axum's stock `Json` / `Query` rejections reply with plain text. These
//! wrappers run the same extraction and turn any failure into a 400
//! `INVALID_PARAMETER` so every client error has one shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;

/// JSON body extractor
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e.body_text(), "rejected request body");
            ApiError::bad_request(format!("invalid request body: {}", e.body_text()))
        })?;
        Ok(ApiJson(value))
    }
}

/// Query string extractor
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid query: {}", e.body_text())))?;
        Ok(ApiQuery(value))
    }
}

/// Parse a path segment as an id
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid {} id", what)))
}
