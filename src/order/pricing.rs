//! Pricing calculator
//!
//! Pure computation over an already-verified service bundle: per-line
//! subtotals, order total, and the longest lead time (which drives the
//! delivery estimate).

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{OrderLineItem, Service};

/// Decimal places accepted for quantities and unit prices
pub const INPUT_SCALE: u32 = 2;
/// Decimal places of a subtotal or total: `INPUT_SCALE` twice over
pub const AMOUNT_SCALE: u32 = INPUT_SCALE * 2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("at least one service is required")]
    EmptyBundle,

    #[error("invalid quantity {quantity} for service {service_id}: must be positive")]
    InvalidQuantity { service_id: Uuid, quantity: Decimal },

    #[error("quantity {quantity} for service {service_id} has more than 2 decimal places")]
    QuantityPrecision { service_id: Uuid, quantity: Decimal },

    #[error("service {0} has a non-positive price or more than 2 decimal places")]
    InvalidPrice(Uuid),
}

/// Priced bundle, ready to become an order
#[derive(Debug, Clone)]
pub struct Quote {
    /// Snapshot line items, in request order
    pub line_items: Vec<OrderLineItem>,
    pub total: Decimal,
    pub max_lead_time_hours: u32,
}

impl Quote {
    /// Delivery = pickup + longest lead time; no pickup, no estimate
    pub fn estimated_delivery(&self, pickup: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        pickup.map(|at| at + Duration::hours(i64::from(self.max_lead_time_hours)))
    }
}

/// Price a bundle of `(service, quantity)` pairs.
///
/// Subtotals are exact decimal products and the total is their sum. Inputs
/// are limited to `INPUT_SCALE` places so every amount fits `AMOUNT_SCALE`
/// and is stored without rounding.
pub fn quote(lines: &[(&Service, Decimal)]) -> Result<Quote, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::EmptyBundle);
    }

    let mut line_items = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;
    let mut max_lead_time_hours = 0;

    for (service, quantity) in lines {
        if *quantity <= Decimal::ZERO {
            return Err(PricingError::InvalidQuantity {
                service_id: service.id,
                quantity: *quantity,
            });
        }
        if quantity.normalize().scale() > INPUT_SCALE {
            return Err(PricingError::QuantityPrecision {
                service_id: service.id,
                quantity: *quantity,
            });
        }
        if service.price <= Decimal::ZERO || service.price.normalize().scale() > INPUT_SCALE {
            return Err(PricingError::InvalidPrice(service.id));
        }

        let subtotal = service.price * *quantity;
        total += subtotal;
        max_lead_time_hours = max_lead_time_hours.max(service.lead_time_hours);

        line_items.push(OrderLineItem {
            id: Uuid::new_v4(),
            service_id: service.id,
            service_name: service.name.clone(),
            quantity: *quantity,
            unit_price: service.price,
            unit: service.unit.clone(),
            subtotal,
        });
    }

    Ok(Quote {
        line_items,
        total,
        max_lead_time_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn service(name: &str, price: &str, unit: &str, lead_time_hours: u32) -> Service {
        Service {
            id: Uuid::new_v4(),
            laundry_id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            price: dec(price),
            unit: unit.to_string(),
            lead_time_hours,
            category: "wash".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_subtotals_and_total() {
        let wash = service("Cuci Kering", "8000", "kg", 24);
        let bedcover = service("Bed Cover", "25000", "pcs", 48);

        let q = quote(&[(&wash, dec("2.5")), (&bedcover, dec("2"))]).unwrap();

        assert_eq!(q.line_items.len(), 2);
        assert_eq!(q.line_items[0].subtotal, dec("20000"));
        assert_eq!(q.line_items[1].subtotal, dec("50000"));
        assert_eq!(q.total, dec("70000"));
        let sum: Decimal = q.line_items.iter().map(|i| i.subtotal).sum();
        assert_eq!(q.total, sum);
        assert_eq!(q.max_lead_time_hours, 48);
    }

    #[test]
    fn test_subtotal_is_exact_decimal_product() {
        let ironing = service("Setrika", "3333.33", "kg", 12);
        let q = quote(&[(&ironing, dec("0.3"))]).unwrap();
        assert_eq!(q.line_items[0].subtotal, dec("999.999"));
        assert_eq!(q.total, dec("999.999"));
    }

    #[test]
    fn test_total_equals_sum_of_sub_cent_subtotals() {
        let wash = service("Cuci Kering", "8000.25", "kg", 24);
        let q = quote(&[(&wash, dec("0.5")), (&wash, dec("0.5"))]).unwrap();

        assert_eq!(q.line_items[0].subtotal, dec("4000.125"));
        let sum: Decimal = q.line_items.iter().map(|i| i.subtotal).sum();
        assert_eq!(q.total, sum);
        assert_eq!(q.total, dec("8000.25"));
        for item in &q.line_items {
            assert!(item.subtotal.normalize().scale() <= AMOUNT_SCALE);
        }
    }

    #[test]
    fn test_widest_inputs_fit_amount_scale() {
        let odd = service("Karpet", "0.99", "pcs", 72);
        let q = quote(&[(&odd, dec("0.99")), (&odd, dec("99.99"))]).unwrap();
        assert_eq!(q.line_items[0].subtotal, dec("0.9801"));
        assert_eq!(q.total, dec("99.9702"));
        assert_eq!(q.total.normalize().scale(), AMOUNT_SCALE);
    }

    #[test]
    fn test_quantity_precision_limited_to_cents() {
        let wash = service("Cuci Kering", "8000", "kg", 24);
        assert!(matches!(
            quote(&[(&wash, dec("1.255"))]),
            Err(PricingError::QuantityPrecision { .. })
        ));
        // Trailing zeros are not extra precision
        assert!(quote(&[(&wash, dec("1.2500"))]).is_ok());
    }

    #[test]
    fn test_sub_cent_price_rejected() {
        let odd = service("Cuci", "8000.125", "kg", 24);
        assert_eq!(
            quote(&[(&odd, dec("1"))]).unwrap_err(),
            PricingError::InvalidPrice(odd.id)
        );
    }

    #[test]
    fn test_line_items_snapshot_service_fields() {
        let wash = service("Cuci Kering", "8000", "kg", 24);
        let q = quote(&[(&wash, dec("1"))]).unwrap();
        let item = &q.line_items[0];
        assert_eq!(item.service_id, wash.id);
        assert_eq!(item.service_name, "Cuci Kering");
        assert_eq!(item.unit_price, dec("8000"));
        assert_eq!(item.unit, "kg");
    }

    #[test]
    fn test_empty_bundle_rejected() {
        assert_eq!(quote(&[]).unwrap_err(), PricingError::EmptyBundle);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let wash = service("Cuci Kering", "8000", "kg", 24);
        assert!(matches!(
            quote(&[(&wash, Decimal::ZERO)]),
            Err(PricingError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            quote(&[(&wash, dec("-1"))]),
            Err(PricingError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_delivery_estimate_uses_max_lead_time() {
        let express = service("Express", "15000", "kg", 6);
        let regular = service("Regular", "7000", "kg", 48);
        let q = quote(&[(&express, dec("1")), (&regular, dec("1"))]).unwrap();

        let pickup = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        assert_eq!(
            q.estimated_delivery(Some(pickup)),
            Some(Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap())
        );
        assert_eq!(q.estimated_delivery(None), None);
    }
}
