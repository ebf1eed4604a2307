//! Handler error type
//!
//! `ApiError` carries the HTTP status plus the envelope's error code. Core
//! errors convert into it with `?`; persistence and crypto failures are
//! logged here and surface only as an opaque internal error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::response::{ApiResponse, error_codes};
use crate::error::BookingError;
use crate::user_auth::AuthError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 with the success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 with the success envelope
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn unauthorized(code: i32, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::FORBIDDEN, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, error_codes::CONFLICT, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.msg)),
        )
            .into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::Validation(msg) => ApiError::bad_request(msg),
            BookingError::NotFound(what) => ApiError::not_found(format!("{} not found", what)),
            BookingError::Unauthorized => ApiError::forbidden("unauthorized"),
            BookingError::Conflict { reason, .. } => ApiError::conflict(reason),
            BookingError::Persistence(err) => {
                tracing::error!(error = %err, "persistence failure");
                ApiError::internal("internal server error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::bad_request(msg),
            AuthError::EmailTaken => ApiError::conflict("email already registered"),
            AuthError::InvalidCredentials => {
                ApiError::unauthorized(error_codes::AUTH_FAILED, "invalid email or password")
            }
            AuthError::InvalidToken => {
                ApiError::unauthorized(error_codes::AUTH_FAILED, "invalid or expired token")
            }
            AuthError::UserNotFound => ApiError::not_found("user not found"),
            other => {
                tracing::error!(error = %other, "auth failure");
                ApiError::internal("internal server error")
            }
        }
    }
}
