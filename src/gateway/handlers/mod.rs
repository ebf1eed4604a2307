//! HTTP handlers, one module per resource

pub mod health;
pub mod laundry;
pub mod order;

pub use health::{HealthResponse, health_check};
pub use laundry::{get_laundry, list_laundries};
pub use order::{cancel_order, create_order, get_order, list_orders, update_order_status};
