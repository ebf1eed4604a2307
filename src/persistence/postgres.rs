//! PostgreSQL store
//!
//! Runtime-checked `sqlx::query` calls only; the schema lives in
//! `sql/schema.sql`. Order statuses are stored by name, money as NUMERIC,
//! opening hours as TIME (read back as text).

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::laundry::PriceRange;
use crate::models::{Laundry, OperatingHours, Order, OrderLineItem, Service, User, UserRole};
use crate::order::OrderStatus;
use crate::pagination::PageRequest;
use crate::persistence::seed::SeedData;
use crate::store::{
    LaundryFilter, LaundryStore, OrderStore, ServiceStore, StoreError, UserStore,
};

const LAUNDRY_COLUMNS: &str = r#"
    id, owner_id, name, description, address, latitude, longitude, image_url,
    rating, review_count, is_open,
    operating_hours_open::text AS open_at, operating_hours_close::text AS close_at,
    created_at
"#;

const SERVICE_COLUMNS: &str = r#"
    id, laundry_id, name, description, price, unit, estimated_time_hours, category, is_active
"#;

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, phone, address, latitude, longitude, role, created_at
"#;

const ORDER_COLUMNS: &str = r#"
    o.id, o.customer_id, o.laundry_id, l.name AS laundry_name, o.status, o.total_price,
    o.delivery_address, o.notes, o.estimated_pickup_at, o.estimated_delivery_at,
    o.actual_pickup_at, o.actual_delivery_at, o.created_at, o.updated_at
"#;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_laundry(row: &PgRow) -> Result<Laundry, StoreError> {
        Ok(Laundry {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            name: row.try_get("name")?,
            description: row
                .try_get::<Option<String>, _>("description")?
                .unwrap_or_default(),
            address: row.try_get("address")?,
            location: Coordinates::from_parts(row.try_get("latitude")?, row.try_get("longitude")?),
            image_url: row
                .try_get::<Option<String>, _>("image_url")?
                .unwrap_or_default(),
            rating: row.try_get("rating")?,
            review_count: row.try_get("review_count")?,
            is_open: row.try_get("is_open")?,
            operating_hours: OperatingHours {
                open: row.try_get::<Option<String>, _>("open_at")?.unwrap_or_default(),
                close: row.try_get::<Option<String>, _>("close_at")?.unwrap_or_default(),
            },
            services: Vec::new(),
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_service(row: &PgRow) -> Result<Service, StoreError> {
        let hours: i32 = row.try_get("estimated_time_hours")?;
        let id: Uuid = row.try_get("id")?;
        Ok(Service {
            id,
            laundry_id: row.try_get("laundry_id")?,
            name: row.try_get("name")?,
            description: row
                .try_get::<Option<String>, _>("description")?
                .unwrap_or_default(),
            price: row.try_get("price")?,
            unit: row.try_get("unit")?,
            lead_time_hours: u32::try_from(hours)
                .map_err(|_| StoreError::Corrupt(format!("service {id}: lead time {hours}")))?,
            category: row
                .try_get::<Option<String>, _>("category")?
                .unwrap_or_default(),
            is_active: row.try_get("is_active")?,
        })
    }

    fn row_to_user(row: &PgRow) -> Result<User, StoreError> {
        let role: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            phone: row
                .try_get::<Option<String>, _>("phone")?
                .unwrap_or_default(),
            address: row
                .try_get::<Option<String>, _>("address")?
                .unwrap_or_default(),
            location: Coordinates::from_parts(row.try_get("latitude")?, row.try_get("longitude")?),
            role: UserRole::from_db(&role)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown role '{role}'")))?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: &PgRow) -> Result<Order, StoreError> {
        let status: String = row.try_get("status")?;
        Ok(Order {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            laundry_id: row.try_get("laundry_id")?,
            laundry_name: row.try_get("laundry_name")?,
            status: status
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("{e}")))?,
            total_price: row.try_get::<Decimal, _>("total_price")?.normalize(),
            delivery_address: row.try_get("delivery_address")?,
            notes: row.try_get("notes")?,
            estimated_pickup_at: row.try_get("estimated_pickup_at")?,
            estimated_delivery_at: row.try_get("estimated_delivery_at")?,
            actual_pickup_at: row.try_get("actual_pickup_at")?,
            actual_delivery_at: row.try_get("actual_delivery_at")?,
            line_items: Vec::new(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_line_item(row: &PgRow) -> Result<(Uuid, OrderLineItem), StoreError> {
        Ok((
            row.try_get("order_id")?,
            OrderLineItem {
                id: row.try_get("id")?,
                service_id: row.try_get("service_id")?,
                service_name: row.try_get("service_name")?,
                quantity: row.try_get("quantity")?,
                unit_price: row.try_get("unit_price")?,
                unit: row.try_get("unit")?,
                subtotal: row.try_get::<Decimal, _>("subtotal")?.normalize(),
            },
        ))
    }

    // ------------------------------------------------------------
    // Row writers shared by the trait methods and `seed`
    // ------------------------------------------------------------

    async fn insert_user(conn: &mut PgConnection, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, phone, address, latitude, longitude, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.location.map(|c| c.latitude))
        .bind(user.location.map(|c| c.longitude))
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn insert_laundry(conn: &mut PgConnection, laundry: &Laundry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO laundries
                (id, owner_id, name, description, address, latitude, longitude, image_url,
                 rating, review_count, is_open, operating_hours_open, operating_hours_close,
                 created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    NULLIF($12, '')::time, NULLIF($13, '')::time, $14)
            "#,
        )
        .bind(laundry.id)
        .bind(laundry.owner_id)
        .bind(&laundry.name)
        .bind(&laundry.description)
        .bind(&laundry.address)
        .bind(laundry.location.map(|c| c.latitude))
        .bind(laundry.location.map(|c| c.longitude))
        .bind(&laundry.image_url)
        .bind(laundry.rating)
        .bind(laundry.review_count)
        .bind(laundry.is_open)
        .bind(&laundry.operating_hours.open)
        .bind(&laundry.operating_hours.close)
        .bind(laundry.created_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn insert_service(conn: &mut PgConnection, service: &Service) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO services
                (id, laundry_id, name, description, price, unit, estimated_time_hours,
                 category, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(service.id)
        .bind(service.laundry_id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(&service.unit)
        .bind(i32::try_from(service.lead_time_hours).unwrap_or(i32::MAX))
        .bind(&service.category)
        .bind(service.is_active)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Order row plus its line items; the caller owns the transaction
    async fn insert_order(conn: &mut PgConnection, order: &Order) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO orders
                (id, customer_id, laundry_id, status, total_price, delivery_address, notes,
                 estimated_pickup_at, estimated_delivery_at, actual_pickup_at, actual_delivery_at,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.laundry_id)
        .bind(order.status.as_str())
        .bind(order.total_price)
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(order.estimated_pickup_at)
        .bind(order.estimated_delivery_at)
        .bind(order.actual_pickup_at)
        .bind(order.actual_delivery_at)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;

        for (position, item) in order.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_line_items
                    (id, order_id, position, service_id, service_name, quantity, unit_price, unit, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id)
            .bind(order.id)
            .bind(position as i32)
            .bind(item.service_id)
            .bind(&item.service_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(&item.unit)
            .bind(item.subtotal)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Insert a whole dataset in one transaction
    pub async fn seed(&self, data: &SeedData) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for user in &data.users {
            Self::insert_user(&mut *tx, user).await?;
        }
        for laundry in &data.laundries {
            Self::insert_laundry(&mut *tx, laundry).await?;
            for service in &laundry.services {
                Self::insert_service(&mut *tx, service).await?;
            }
        }
        for order in &data.orders {
            Self::insert_order(&mut *tx, order).await?;
        }

        tx.commit().await?;
        tracing::info!(
            users = data.users.len(),
            laundries = data.laundries.len(),
            services = data.service_count(),
            orders = data.orders.len(),
            "dataset seeded"
        );
        Ok(())
    }

    /// Line items for a batch of orders, keyed by order id
    async fn line_items_for(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<OrderLineItem>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, service_id, service_name, quantity, unit_price, unit, subtotal
            FROM order_line_items
            WHERE order_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<OrderLineItem>> = HashMap::new();
        for row in &rows {
            let (order_id, item) = Self::row_to_line_item(row)?;
            grouped.entry(order_id).or_default().push(item);
        }
        Ok(grouped)
    }
}

/// `%term%` with LIKE wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl LaundryStore for PgStore {
    async fn find_laundry(&self, id: Uuid) -> Result<Option<Laundry>, StoreError> {
        let row = sqlx::query(&format!("SELECT {LAUNDRY_COLUMNS} FROM laundries WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut laundry = Self::row_to_laundry(&row)?;

        let services = sqlx::query(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE laundry_id = $1 AND is_active = TRUE ORDER BY name"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        laundry.services = services
            .iter()
            .map(Self::row_to_service)
            .collect::<Result<_, _>>()?;

        Ok(Some(laundry))
    }

    async fn search_laundries(&self, filter: &LaundryFilter) -> Result<Vec<Laundry>, StoreError> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let rows = sqlx::query(&format!(
            r#"
            SELECT {LAUNDRY_COLUMNS}
            FROM laundries
            WHERE ($1::text IS NULL OR name ILIKE $1 OR address ILIKE $1)
              AND ($2::boolean IS NULL OR is_open = $2)
            ORDER BY created_at, id
            "#
        ))
        .bind(pattern)
        .bind(filter.is_open)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_laundry).collect()
    }

    async fn find_laundries_by_owner(&self, owner_id: Uuid) -> Result<Vec<Laundry>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {LAUNDRY_COLUMNS} FROM laundries WHERE owner_id = $1 ORDER BY created_at"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_laundry).collect()
    }
}

#[async_trait]
impl ServiceStore for PgStore {
    async fn find_service(&self, id: Uuid) -> Result<Option<Service>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_service).transpose()
    }

    async fn active_price_range(&self, laundry_id: Uuid) -> Result<Option<PriceRange>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT MIN(price) AS min_price, MAX(price) AS max_price
            FROM services
            WHERE laundry_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(laundry_id)
        .fetch_one(&self.pool)
        .await?;

        let min: Option<Decimal> = row.try_get("min_price")?;
        let max: Option<Decimal> = row.try_get("max_price")?;
        Ok(min.zip(max).map(|(min, max)| PriceRange { min, max }))
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        Self::insert_order(&mut *tx, order).await?;

        // Dropping `tx` on any early return above rolls the order row back
        tx.commit().await?;
        Ok(())
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            JOIN laundries l ON l.id = o.laundry_id
            WHERE o.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut order = Self::row_to_order(&row)?;
        order.line_items = self
            .line_items_for(&[order.id])
            .await?
            .remove(&order.id)
            .unwrap_or_default();
        Ok(Some(order))
    }

    async fn list_orders_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let status = status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE customer_id = $1 AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(customer_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        let total = total.max(0) as u64;

        let Some(offset) = page.sql_offset() else {
            return Ok((vec![], total));
        };

        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders o
            JOIN laundries l ON l.id = o.laundry_id
            WHERE o.customer_id = $1 AND ($2::text IS NULL OR o.status = $2)
            ORDER BY o.created_at DESC, o.id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(customer_id)
        .bind(status)
        .bind(i64::from(page.limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut orders: Vec<Order> = rows
            .iter()
            .map(Self::row_to_order)
            .collect::<Result<_, _>>()?;
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items = self.line_items_for(&ids).await?;
        for order in &mut orders {
            order.line_items = items.remove(&order.id).unwrap_or_default();
        }

        Ok((orders, total))
    }

    async fn update_order(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1, actual_pickup_at = $2, actual_delivery_at = $3, updated_at = $4
            WHERE id = $5 AND status = $6
            "#,
        )
        .bind(order.status.as_str())
        .bind(order.actual_pickup_at)
        .bind(order.actual_delivery_at)
        .bind(order.updated_at)
        .bind(order.id)
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = Self::insert_user(&mut *conn, user).await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate("email"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_location(&self, id: Uuid, location: Coordinates) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users SET latitude = $1, longitude = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
