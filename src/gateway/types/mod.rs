//! Gateway types module
//!
//! Types that live only at the HTTP boundary:
//!
//! ## Input Types
//! - [`StrictDecimal`]: Format-validated decimal for quantities
//! - [`ApiJson`] / [`ApiQuery`]: Extractors that reject with the unified envelope
//! - Query structs for listing endpoints, order request bodies
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Status + error code, built from core errors
//! - Order response bodies

pub mod error;
pub mod extract;
pub mod money;
pub mod order;
pub mod query;
pub mod response;

// Re-export commonly used types at module root
pub use error::{ApiError, ApiResult, created, ok};
pub use extract::{ApiJson, ApiQuery, parse_id};
pub use money::StrictDecimal;
pub use order::{
    CreateOrderRequest, OrderItemResponse, OrderListResponse, OrderResponse, OrderServiceRequest,
    UpdateStatusRequest,
};
pub use query::{LaundryDetailQuery, LaundryListQuery, OrderListQuery, parse_coordinates};
pub use response::{ApiResponse, error_codes};
