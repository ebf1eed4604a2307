//! In-process store
//!
//! Backs tests, and the gateway when no `postgres_url` is configured. Tables live
//! behind one mutex so every trait method is a single critical section,
//! which gives the same atomicity the Postgres store gets from transactions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::laundry::PriceRange;
use crate::models::{Laundry, Order, OrderLineItem, Service, User};
use crate::order::OrderStatus;
use crate::pagination::PageRequest;
use crate::persistence::seed::SeedData;
use crate::store::{
    LaundryFilter, LaundryStore, OrderStore, ServiceStore, StoreError, UserStore,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order doubles as creation order
    laundries: Vec<Laundry>,
    services: Vec<Service>,
    /// Order rows without line items; `laundry_name` is joined on read
    orders: Vec<Order>,
    line_items: HashMap<Uuid, Vec<OrderLineItem>>,
}

impl Tables {
    fn laundry_name(&self, id: Uuid) -> String {
        self.laundries
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.clone())
            .unwrap_or_default()
    }

    fn hydrate(&self, row: &Order) -> Order {
        let mut order = row.clone();
        order.laundry_name = self.laundry_name(row.laundry_id);
        order.line_items = self.line_items.get(&row.id).cloned().unwrap_or_default();
        order
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_line_items: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }

    // ------------------------------------------------------------
    // Seeding (laundries and services have no write path in the core)
    // ------------------------------------------------------------

    pub fn insert_user(&self, user: User) {
        if let Ok(mut t) = self.tables() {
            t.users.insert(user.id, user);
        }
    }

    pub fn insert_laundry(&self, mut laundry: Laundry) {
        if let Ok(mut t) = self.tables() {
            t.services.append(&mut laundry.services);
            t.laundries.push(laundry);
        }
    }

    pub fn insert_service(&self, service: Service) {
        if let Ok(mut t) = self.tables() {
            t.services.push(service);
        }
    }

    /// Load a dataset under one lock; readers never see a partial load
    pub fn load(&self, data: &SeedData) -> Result<(), StoreError> {
        let mut t = self.tables()?;
        for user in &data.users {
            t.users.insert(user.id, user.clone());
        }
        for laundry in &data.laundries {
            let mut row = laundry.clone();
            t.services.append(&mut row.services);
            t.laundries.push(row);
        }
        for order in &data.orders {
            let mut row = order.clone();
            t.line_items.insert(order.id, std::mem::take(&mut row.line_items));
            t.orders.push(row);
        }
        Ok(())
    }

    /// Make the line-item half of `create_order` fail
    pub fn fail_line_item_writes(&self, fail: bool) {
        self.fail_line_items.store(fail, Ordering::SeqCst);
    }

    pub fn order_count(&self) -> usize {
        self.tables().map(|t| t.orders.len()).unwrap_or(0)
    }

    pub fn line_item_count(&self) -> usize {
        self.tables()
            .map(|t| t.line_items.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl LaundryStore for MemoryStore {
    async fn find_laundry(&self, id: Uuid) -> Result<Option<Laundry>, StoreError> {
        let t = self.tables()?;
        Ok(t.laundries.iter().find(|l| l.id == id).map(|l| {
            let mut laundry = l.clone();
            laundry.services = t
                .services
                .iter()
                .filter(|s| s.laundry_id == id && s.is_active)
                .cloned()
                .collect();
            laundry
        }))
    }

    async fn search_laundries(&self, filter: &LaundryFilter) -> Result<Vec<Laundry>, StoreError> {
        let t = self.tables()?;
        Ok(t.laundries
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }

    async fn find_laundries_by_owner(&self, owner_id: Uuid) -> Result<Vec<Laundry>, StoreError> {
        let t = self.tables()?;
        Ok(t.laundries
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ServiceStore for MemoryStore {
    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let t = self.tables()?;
        Ok(t.services.iter().find(|s| s.id == id).cloned())
    }

    async fn active_price_range(&self, laundry_id: Uuid) -> Result<Option<PriceRange>, StoreError> {
        let t = self.tables()?;
        let prices = t
            .services
            .iter()
            .filter(|s| s.laundry_id == laundry_id && s.is_active)
            .map(|s| s.price);
        Ok(prices.fold(None, |acc: Option<PriceRange>, p| {
            Some(match acc {
                None => PriceRange { min: p, max: p },
                Some(r) => PriceRange {
                    min: r.min.min(p),
                    max: r.max.max(p),
                },
            })
        }))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut t = self.tables()?;

        let mut row = order.clone();
        row.line_items.clear();
        t.orders.push(row);

        if self.fail_line_items.load(Ordering::SeqCst) {
            // Roll back the order row
            t.orders.retain(|o| o.id != order.id);
            return Err(StoreError::Unavailable(
                "line item write failed".to_string(),
            ));
        }

        t.line_items.insert(order.id, order.line_items.clone());
        Ok(())
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let t = self.tables()?;
        Ok(t.orders.iter().find(|o| o.id == id).map(|o| t.hydrate(o)))
    }

    async fn list_orders_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let t = self.tables()?;
        // Newest insert first, then a stable sort on created_at
        let mut rows: Vec<&Order> = t
            .orders
            .iter()
            .rev()
            .filter(|o| o.customer_id == customer_id)
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = rows.len() as u64;
        let orders = page.slice(rows).into_iter().map(|o| t.hydrate(o)).collect();
        Ok((orders, total))
    }

    async fn update_order(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> Result<bool, StoreError> {
        let mut t = self.tables()?;
        let Some(row) = t.orders.iter_mut().find(|o| o.id == order.id) else {
            return Ok(false);
        };
        if row.status != expected_status {
            return Ok(false);
        }
        row.status = order.status;
        row.actual_pickup_at = order.actual_pickup_at;
        row.actual_delivery_at = order.actual_delivery_at;
        row.updated_at = order.updated_at;
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let t = self.tables()?;
        Ok(t.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables()?;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut t = self.tables()?;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        t.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_location(&self, id: Uuid, location: Coordinates) -> Result<bool, StoreError> {
        let mut t = self.tables()?;
        match t.users.get_mut(&id) {
            Some(user) => {
                user.location = Some(location);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Budi".to_string(),
            email: email.to_string(),
            password_hash: "x".to_string(),
            phone: "0812".to_string(),
            address: "Jakarta".to_string(),
            location: None,
            role: UserRole::Customer,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(&user("budi@example.com")).await.unwrap();
        let err = store
            .create_user(&user("budi@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[tokio::test]
    async fn test_update_location_overwrites() {
        let store = MemoryStore::new();
        let u = user("budi@example.com");
        store.create_user(&u).await.unwrap();

        let first = Coordinates::new(-6.2, 106.8).unwrap();
        let second = Coordinates::new(-6.3, 106.9).unwrap();
        assert!(store.update_location(u.id, first).await.unwrap());
        assert!(store.update_location(u.id, second).await.unwrap());
        let found = store.find_user(u.id).await.unwrap().unwrap();
        assert_eq!(found.location, Some(second));

        assert!(!store.update_location(Uuid::new_v4(), first).await.unwrap());
    }

    #[tokio::test]
    async fn test_load_demo_data() {
        let data = crate::persistence::seed::demo_data().unwrap();
        let store = MemoryStore::new();
        store.load(&data).unwrap();

        let all = store.search_laundries(&LaundryFilter::default()).await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(store.order_count(), data.orders.len());

        let first = &data.orders[0];
        let stored = store.find_order(first.id).await.unwrap().unwrap();
        assert_eq!(stored.laundry_name, first.laundry_name);
        assert_eq!(stored.line_items.len(), first.line_items.len());
        assert_eq!(stored.total_price, stored.line_item_total());

        let catalog = store.find_laundry(first.laundry_id).await.unwrap().unwrap();
        assert_eq!(catalog.services.len(), 4);
    }
}
