//! Booking core error taxonomy.
//!
//! Every core operation returns [`BookingError`]; the gateway maps each
//! variant onto an HTTP status and error code.

use thiserror::Error;

use crate::geo::GeoError;
use crate::order::OrderStatus;
use crate::order::pricing::PricingError;
use crate::order::status::UnknownStatus;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum BookingError {
    /// Malformed or out-of-domain input
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller does not own the resource
    #[error("unauthorized")]
    Unauthorized,

    /// Operation not allowed in the current state
    #[error("{reason}")]
    Conflict {
        reason: String,
        current: Option<OrderStatus>,
    },

    /// Store unavailable or write failed
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl BookingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BookingError::Validation(msg.into())
    }

    /// Conflict that reports the order's current status
    pub fn invalid_state(current: OrderStatus, reason: impl Into<String>) -> Self {
        BookingError::Conflict {
            reason: format!("{} (current status: {})", reason.into(), current),
            current: Some(current),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BookingError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BookingError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BookingError::Unauthorized)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, BookingError::Conflict { .. })
    }
}

impl From<PricingError> for BookingError {
    fn from(e: PricingError) -> Self {
        BookingError::Validation(e.to_string())
    }
}

impl From<GeoError> for BookingError {
    fn from(e: GeoError) -> Self {
        BookingError::Validation(e.to_string())
    }
}

impl From<UnknownStatus> for BookingError {
    fn from(e: UnknownStatus) -> Self {
        BookingError::Validation(e.to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_carries_current_status() {
        let err = BookingError::invalid_state(OrderStatus::Ready, "order cannot be cancelled");
        assert!(err.is_conflict());
        assert_eq!(
            err.to_string(),
            "order cannot be cancelled (current status: ready)"
        );
        match err {
            BookingError::Conflict { current, .. } => assert_eq!(current, Some(OrderStatus::Ready)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_conversions_are_validation() {
        let err: BookingError = PricingError::EmptyBundle.into();
        assert!(err.is_validation());
        let err: BookingError = GeoError::InvalidLatitude(91.0).into();
        assert!(err.is_validation());
        let err: BookingError = "bogus".parse::<OrderStatus>().unwrap_err().into();
        assert_eq!(err.to_string(), "invalid status 'bogus'");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(BookingError::NotFound("laundry").to_string(), "laundry not found");
    }
}
