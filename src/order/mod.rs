//! Order pricing and lifecycle
//!
//! - [`status`]: closed status set and transition rules
//! - [`pricing`]: subtotal / total / lead-time computation
//! - [`service`]: create, read, cancel and status updates

pub mod pricing;
pub mod service;
pub mod status;

pub use pricing::{PricingError, Quote, quote};
pub use service::{NewOrder, OrderPage, OrderService, RequestedService};
pub use status::{OrderStatus, StatusPolicy, UnknownStatus};
