//! Persistence boundary
//!
//! The booking core only talks to storage through these traits. The
//! Postgres implementation lives in [`crate::persistence::PgStore`]; an
//! in-process [`crate::persistence::MemoryStore`] backs tests and demos.
//!
//! Write contracts:
//! - [`OrderStore::create_order`] persists the order row and all its line
//!   items as one unit, or nothing.
//! - [`OrderStore::update_order`] overwrites the mutable order fields only if
//!   the stored status still equals `expected_status` (compare-and-swap).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::laundry::PriceRange;
use crate::models::{Laundry, Order, Service, User};
use crate::order::OrderStatus;
use crate::pagination::PageRequest;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Text / open-flag filter for laundry listings
#[derive(Debug, Clone, Default)]
pub struct LaundryFilter {
    /// Case-insensitive substring of name or address
    pub search: Option<String>,
    pub is_open: Option<bool>,
}

impl LaundryFilter {
    pub fn new(search: Option<String>, is_open: Option<bool>) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { search, is_open }
    }

    /// In-process equivalent of the SQL predicate
    pub fn matches(&self, laundry: &Laundry) -> bool {
        if let Some(is_open) = self.is_open
            && laundry.is_open != is_open
        {
            return false;
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                laundry.name.to_lowercase().contains(&needle)
                    || laundry.address.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

#[async_trait]
pub trait LaundryStore: Send + Sync {
    /// Laundry with its active services
    async fn find_laundry(&self, id: Uuid) -> Result<Option<Laundry>, StoreError>;

    /// Every laundry matching the filter, in stable creation order, without services
    async fn search_laundries(&self, filter: &LaundryFilter) -> Result<Vec<Laundry>, StoreError>;

    async fn find_laundries_by_owner(&self, owner_id: Uuid) -> Result<Vec<Laundry>, StoreError>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Any service, active or not
    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, StoreError>;

    /// Min/max active price; `None` when the laundry has no active service
    async fn active_price_range(&self, laundry_id: Uuid) -> Result<Option<PriceRange>, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Atomically insert the order and its line items
    async fn create_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Order with line items and laundry name
    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Newest first; returns the page and the total matching count
    async fn list_orders_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), StoreError>;

    /// CAS overwrite of mutable fields; `false` if the status moved meanwhile
    async fn update_order(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if the email is taken
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;

    /// Returns `false` if the user does not exist
    async fn update_location(&self, id: Uuid, location: Coordinates) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperatingHours;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn laundry(name: &str, address: &str, is_open: bool) -> Laundry {
        Laundry {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            address: address.to_string(),
            location: None,
            image_url: String::new(),
            rating: Decimal::ZERO,
            review_count: 0,
            is_open,
            operating_hours: OperatingHours {
                open: "08:00".to_string(),
                close: "20:00".to_string(),
            },
            services: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_matches_name_or_address_case_insensitive() {
        let l = laundry("Bersih Kilat", "Jl. Kemang Raya 10", true);
        assert!(LaundryFilter::new(Some("kilat".into()), None).matches(&l));
        assert!(LaundryFilter::new(Some("KEMANG".into()), None).matches(&l));
        assert!(!LaundryFilter::new(Some("menteng".into()), None).matches(&l));
    }

    #[test]
    fn test_filter_open_flag() {
        let closed = laundry("Bersih Kilat", "Kemang", false);
        assert!(!LaundryFilter::new(None, Some(true)).matches(&closed));
        assert!(LaundryFilter::new(None, Some(false)).matches(&closed));
        assert!(LaundryFilter::default().matches(&closed));
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        let f = LaundryFilter::new(Some("   ".into()), None);
        assert!(f.search.is_none());
    }
}
