// models.rs - Marketplace domain types (users, laundries, services, orders)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinates;
use crate::order::OrderStatus;

// ============================================================
// USER
// ============================================================

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    LaundryOwner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::LaundryOwner => "laundry_owner",
        }
    }

    /// Lenient parse used at registration: anything unknown is a customer
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("laundry_owner") => UserRole::LaundryOwner,
            _ => UserRole::Customer,
        }
    }

    /// Strict parse for stored rows and token claims
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(UserRole::Customer),
            "laundry_owner" => Some(UserRole::LaundryOwner),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    /// Current location; may be set after registration
    pub location: Option<Coordinates>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// ============================================================
// LAUNDRY & SERVICE
// ============================================================

/// Daily opening window, time-of-day strings as stored (e.g. "08:00:00")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OperatingHours {
    #[schema(example = "08:00")]
    pub open: String,
    #[schema(example = "21:00")]
    pub close: String,
}

/// A laundry business
#[derive(Debug, Clone)]
pub struct Laundry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    /// Unknown for laundries that never registered a location
    pub location: Option<Coordinates>,
    pub image_url: String,
    /// Aggregate rating in [0, 5]
    pub rating: Decimal,
    pub review_count: i32,
    pub is_open: bool,
    pub operating_hours: OperatingHours,
    /// Active services only; empty when loaded for listings
    pub services: Vec<Service>,
    pub created_at: DateTime<Utc>,
}

/// An orderable service offered by one laundry
#[derive(Debug, Clone)]
pub struct Service {
    pub id: Uuid,
    pub laundry_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Billing unit, e.g. "kg" or "pcs"
    pub unit: String,
    pub lead_time_hours: u32,
    pub category: String,
    pub is_active: bool,
}

// ============================================================
// ORDER
// ============================================================

/// Frozen copy of a service at order time
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineItem {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit: String,
    /// quantity × unit_price
    pub subtotal: Decimal,
}

/// Customer order with its line items
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub laundry_id: Uuid,
    /// Joined from the laundry on read; not part of the order row
    pub laundry_name: String,
    pub status: OrderStatus,
    /// Always the sum of `line_items[*].subtotal`
    pub total_price: Decimal,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub estimated_pickup_at: Option<DateTime<Utc>>,
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    pub actual_pickup_at: Option<DateTime<Utc>>,
    pub actual_delivery_at: Option<DateTime<Utc>>,
    pub line_items: Vec<OrderLineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line-item subtotals
    pub fn line_item_total(&self) -> Decimal {
        self.line_items.iter().map(|item| item.subtotal).sum()
    }
}
