//! Order Lifecycle Manager
//!
//! Every mutation follows the same shape: read the order, validate against
//! its current status, then persist the full record with a compare-and-swap
//! on that status. A concurrent writer that got there first turns into a
//! Conflict instead of a lost update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::pricing;
use super::status::{OrderStatus, StatusPolicy};
use crate::error::{BookingError, BookingResult};
use crate::models::{Order, Service};
use crate::pagination::{PageRequest, Pagination};
use crate::store::{LaundryStore, OrderStore, ServiceStore};

/// One requested (service, quantity) pair
#[derive(Debug, Clone)]
pub struct RequestedService {
    pub service_id: Uuid,
    pub quantity: Decimal,
}

/// Order creation request
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub laundry_id: Uuid,
    pub services: Vec<RequestedService>,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub estimated_pickup_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

pub struct OrderService {
    laundries: Arc<dyn LaundryStore>,
    services: Arc<dyn ServiceStore>,
    orders: Arc<dyn OrderStore>,
    policy: StatusPolicy,
}

impl OrderService {
    pub fn new(
        laundries: Arc<dyn LaundryStore>,
        services: Arc<dyn ServiceStore>,
        orders: Arc<dyn OrderStore>,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            laundries,
            services,
            orders,
            policy,
        }
    }

    /// Validate, price and atomically persist a new `pending` order
    pub async fn create(&self, customer_id: Uuid, req: NewOrder) -> BookingResult<Order> {
        if req.services.is_empty() {
            return Err(BookingError::validation("at least one service is required"));
        }
        let delivery_address = req.delivery_address.trim();
        if delivery_address.is_empty() {
            return Err(BookingError::validation("delivery address is required"));
        }

        let laundry = self
            .laundries
            .find_laundry(req.laundry_id)
            .await?
            .ok_or(BookingError::NotFound("laundry"))?;

        let mut resolved: Vec<(Service, Decimal)> = Vec::with_capacity(req.services.len());
        for item in &req.services {
            let service = self
                .services
                .find_service(item.service_id)
                .await?
                .ok_or(BookingError::NotFound("service"))?;
            if service.laundry_id != laundry.id {
                warn!(
                    service_id = %service.id,
                    laundry_id = %laundry.id,
                    "service belongs to another laundry"
                );
                return Err(BookingError::validation(format!(
                    "service {} does not belong to this laundry",
                    service.id
                )));
            }
            if !service.is_active {
                return Err(BookingError::validation(format!(
                    "service {} is not available",
                    service.id
                )));
            }
            resolved.push((service, item.quantity));
        }

        let lines: Vec<(&Service, Decimal)> = resolved.iter().map(|(s, q)| (s, *q)).collect();
        let quote = pricing::quote(&lines)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id,
            laundry_id: laundry.id,
            laundry_name: laundry.name.clone(),
            status: OrderStatus::Pending,
            total_price: quote.total,
            delivery_address: delivery_address.to_string(),
            notes: req
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            estimated_pickup_at: req.estimated_pickup_at,
            estimated_delivery_at: quote.estimated_delivery(req.estimated_pickup_at),
            actual_pickup_at: None,
            actual_delivery_at: None,
            line_items: quote.line_items,
            created_at: now,
            updated_at: now,
        };

        self.orders.create_order(&order).await.inspect_err(|e| {
            tracing::error!(order_id = %order.id, error = %e, "order create failed");
        })?;

        info!(
            order_id = %order.id,
            customer_id = %customer_id,
            laundry_id = %laundry.id,
            total = %order.total_price,
            items = order.line_items.len(),
            "order created"
        );
        Ok(order)
    }

    /// Order owned by `customer_id`
    pub async fn get(&self, customer_id: Uuid, order_id: Uuid) -> BookingResult<Order> {
        let order = self.load(order_id).await?;
        if order.customer_id != customer_id {
            warn!(order_id = %order_id, requester = %customer_id, "order read by non-owner");
            return Err(BookingError::Unauthorized);
        }
        Ok(order)
    }

    /// Customer's orders, newest first, optionally filtered by status
    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
        status: Option<&str>,
        page: PageRequest,
    ) -> BookingResult<OrderPage> {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<OrderStatus>)
            .transpose()?;

        let (orders, total) = self
            .orders
            .list_orders_by_customer(customer_id, status, page)
            .await?;

        Ok(OrderPage {
            orders,
            pagination: page.pagination(total),
        })
    }

    /// Customer cancel; only from `pending` or `confirmed`
    pub async fn cancel(&self, customer_id: Uuid, order_id: Uuid) -> BookingResult<Order> {
        let order = self.get(customer_id, order_id).await?;
        if !order.status.is_cancellable() {
            warn!(order_id = %order_id, status = %order.status, "cancel rejected");
            return Err(BookingError::invalid_state(
                order.status,
                "order cannot be cancelled",
            ));
        }

        let mut updated = order.clone();
        updated.status = OrderStatus::Cancelled;
        updated.updated_at = Utc::now();
        self.persist(&updated, order.status).await?;

        info!(order_id = %order_id, from = %order.status, "order cancelled");
        Ok(updated)
    }

    /// Laundry-owner status change.
    ///
    /// Ownership is checked through the order's laundry before the status
    /// value is looked at, so a non-owner learns nothing about the order.
    pub async fn update_status(
        &self,
        owner_id: Uuid,
        order_id: Uuid,
        new_status: &str,
    ) -> BookingResult<Order> {
        let order = self.load(order_id).await?;

        let owned = self.laundries.find_laundries_by_owner(owner_id).await?;
        if !owned.iter().any(|l| l.id == order.laundry_id) {
            warn!(order_id = %order_id, requester = %owner_id, "status update by non-owner");
            return Err(BookingError::Unauthorized);
        }

        let next: OrderStatus = new_status.trim().parse()?;
        if !self.policy.allows(order.status, next) {
            warn!(order_id = %order_id, from = %order.status, to = %next, "transition rejected");
            return Err(BookingError::invalid_state(
                order.status,
                format!("cannot move order to {next}"),
            ));
        }

        let now = Utc::now();
        let mut updated = order.clone();
        updated.status = next;
        updated.updated_at = now;
        match next {
            OrderStatus::PickedUp if updated.actual_pickup_at.is_none() => {
                updated.actual_pickup_at = Some(now);
            }
            OrderStatus::Delivered if updated.actual_delivery_at.is_none() => {
                updated.actual_delivery_at = Some(now);
            }
            _ => {}
        }
        self.persist(&updated, order.status).await?;

        info!(order_id = %order_id, from = %order.status, to = %next, "order status updated");
        Ok(updated)
    }

    async fn load(&self, order_id: Uuid) -> BookingResult<Order> {
        self.orders
            .find_order(order_id)
            .await?
            .ok_or(BookingError::NotFound("order"))
    }

    async fn persist(&self, order: &Order, expected: OrderStatus) -> BookingResult<()> {
        if self.orders.update_order(order, expected).await? {
            return Ok(());
        }
        // Lost the CAS: report whatever status won
        let current = self.load(order.id).await?.status;
        warn!(order_id = %order.id, expected = %expected, current = %current, "concurrent order update");
        Err(BookingError::invalid_state(
            current,
            "order was modified concurrently",
        ))
    }
}
