//! Order request / response bodies

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::StrictDecimal;
use crate::models::{Order, OrderLineItem};
use crate::order::{NewOrder, OrderPage, OrderStatus, RequestedService};
use crate::pagination::Pagination;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderServiceRequest {
    pub service_id: Uuid,
    /// Units of the service's billing unit (kg, pcs, ...)
    #[schema(value_type = String, example = "2.5")]
    pub quantity: StrictDecimal,
}

/// POST /api/v1/orders
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub laundry_id: Uuid,
    pub services: Vec<OrderServiceRequest>,
    #[schema(example = "Jl. Kemang Raya 10, Jakarta")]
    pub delivery_address: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// RFC 3339; enables the delivery estimate
    #[serde(default)]
    pub estimated_pickup_at: Option<DateTime<Utc>>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        NewOrder {
            laundry_id: req.laundry_id,
            services: req
                .services
                .into_iter()
                .map(|s| RequestedService {
                    service_id: s.service_id,
                    quantity: s.quantity.inner(),
                })
                .collect(),
            delivery_address: req.delivery_address,
            notes: req.notes,
            estimated_pickup_at: req.estimated_pickup_at,
        }
    }
}

/// PATCH /api/v1/orders/{id}/status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "picked-up")]
    pub status: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub service_id: Uuid,
    pub service_name: String,
    #[schema(value_type = String, example = "2.5")]
    pub quantity: Decimal,
    /// Unit price frozen at order time
    #[schema(value_type = String, example = "8000")]
    pub price: Decimal,
    pub unit: String,
    #[schema(value_type = String, example = "20000")]
    pub subtotal: Decimal,
}

impl From<&OrderLineItem> for OrderItemResponse {
    fn from(item: &OrderLineItem) -> Self {
        Self {
            service_id: item.service_id,
            service_name: item.service_name.clone(),
            quantity: item.quantity,
            price: item.unit_price,
            unit: item.unit.clone(),
            subtotal: item.subtotal,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub laundry_id: Uuid,
    pub laundry_name: String,
    pub services: Vec<OrderItemResponse>,
    #[schema(value_type = String, example = "20000")]
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub estimated_pickup: Option<DateTime<Utc>>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_pickup: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,
    pub address: String,
    pub notes: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            laundry_id: order.laundry_id,
            services: order.line_items.iter().map(OrderItemResponse::from).collect(),
            laundry_name: order.laundry_name,
            total_price: order.total_price,
            status: order.status,
            created_at: order.created_at,
            estimated_pickup: order.estimated_pickup_at,
            estimated_delivery: order.estimated_delivery_at,
            actual_pickup: order.actual_pickup_at,
            actual_delivery: order.actual_delivery_at,
            address: order.delivery_address,
            notes: order.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: Pagination,
}

impl From<OrderPage> for OrderListResponse {
    fn from(page: OrderPage) -> Self {
        Self {
            orders: page.orders.into_iter().map(OrderResponse::from).collect(),
            pagination: page.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_numeric_quantity() {
        let laundry = Uuid::new_v4();
        let service = Uuid::new_v4();
        let body = format!(
            r#"{{"laundry_id":"{laundry}","services":[{{"service_id":"{service}","quantity":2.5}}],"delivery_address":"Jl. Melati 3"}}"#
        );
        let req: CreateOrderRequest = serde_json::from_str(&body).unwrap();
        let new_order = NewOrder::from(req);
        assert_eq!(new_order.laundry_id, laundry);
        assert_eq!(new_order.services[0].quantity, Decimal::new(25, 1));
        assert!(new_order.notes.is_none());
        assert!(new_order.estimated_pickup_at.is_none());
    }

    #[test]
    fn test_create_request_rejects_bad_ids_and_quantities() {
        let bad_id = r#"{"laundry_id":"42","services":[],"delivery_address":"x"}"#;
        assert!(serde_json::from_str::<CreateOrderRequest>(bad_id).is_err());

        let service = Uuid::new_v4();
        let negative = format!(
            r#"{{"laundry_id":"{}","services":[{{"service_id":"{service}","quantity":"-1"}}],"delivery_address":"x"}}"#,
            Uuid::new_v4()
        );
        assert!(serde_json::from_str::<CreateOrderRequest>(&negative).is_err());
    }

    #[test]
    fn test_order_response_shape() {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            laundry_id: Uuid::new_v4(),
            laundry_name: "Bersih Kilat".to_string(),
            status: OrderStatus::PickedUp,
            total_price: Decimal::from(16000),
            delivery_address: "Jl. Melati 3".to_string(),
            notes: None,
            estimated_pickup_at: None,
            estimated_delivery_at: None,
            actual_pickup_at: None,
            actual_delivery_at: None,
            line_items: vec![OrderLineItem {
                id: Uuid::new_v4(),
                service_id: Uuid::new_v4(),
                service_name: "Cuci Kering".to_string(),
                quantity: Decimal::from(2),
                unit_price: Decimal::from(8000),
                unit: "kg".to_string(),
                subtotal: Decimal::from(16000),
            }],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();
        assert_eq!(json["status"], "picked-up");
        assert_eq!(json["total_price"], "16000");
        assert_eq!(json["address"], "Jl. Melati 3");
        assert_eq!(json["services"][0]["price"], "8000");
        assert!(json.get("actual_pickup").is_none());
    }
}
