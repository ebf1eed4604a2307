//! Store implementations
//!
//! - [`PgStore`]: PostgreSQL via sqlx
//! - [`MemoryStore`]: in-process tables for tests and database-less runs
//! - [`seed`]: demo dataset either store can load

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use seed::{SeedData, SeedError, demo_data};
