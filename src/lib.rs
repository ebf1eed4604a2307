//! Laundry Hub - laundry marketplace booking backend
//!
//! Customers discover nearby laundries and book orders; laundry owners move
//! those orders through washing to delivery.
//!
//! # Modules
//!
//! - [`geo`] - Haversine distance and geo-context resolution
//! - [`models`] - Users, laundries, services, orders
//! - [`laundry`] - Search engine: filter, rank by distance or rating, paginate
//! - [`order`] - Pricing, status machine, order lifecycle
//! - [`store`] - Persistence traits the core depends on
//! - [`persistence`] - PostgreSQL and in-memory stores
//! - [`user_auth`] - Registration, login, JWT middleware
//! - [`gateway`] - axum HTTP surface and OpenAPI docs

// Core domain
pub mod error;
pub mod geo;
pub mod models;
pub mod pagination;

// Engines
pub mod laundry;
pub mod order;

// Persistence
pub mod db;
pub mod persistence;
pub mod store;

// Services
pub mod config;
pub mod gateway;
pub mod logging;
pub mod user_auth;

// Convenient re-exports at crate root
pub use error::{BookingError, BookingResult};
pub use geo::{Coordinates, distance_km};
pub use laundry::{LaundrySearch, SearchQuery};
pub use models::{Laundry, Order, OrderLineItem, Service, User, UserRole};
pub use order::{NewOrder, OrderService, OrderStatus, StatusPolicy};
pub use pagination::{PageRequest, Pagination};
pub use persistence::{MemoryStore, PgStore};
