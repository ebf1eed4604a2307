//! Laundry Search Engine
//!
//! Listing flow:
//! 1. resolve the geo-context (request coordinates > requester profile > none)
//! 2. load every laundry matching the text / open filter
//! 3. annotate distance and rank the full set (stable sort)
//! 4. slice the requested page and attach each listing's price range
//!
//! Ranking happens before slicing so that distance order spans pages.

use std::cmp::Ordering;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{BookingError, BookingResult};
use crate::geo::{Coordinates, distance_km, resolve_geo_context};
use crate::models::{Laundry, OperatingHours, Service};
use crate::pagination::{PageRequest, Pagination};
use crate::store::{LaundryFilter, LaundryStore, ServiceStore, UserStore};

// ============================================================
// PRICE RANGE
// ============================================================

/// Min/max active-service price of one laundry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

/// Render a price range in rupiah, whole units rounded half-up.
///
/// `None` (no active service) and an all-zero range both render as "Rp 0".
pub fn format_price_range(range: Option<PriceRange>) -> String {
    let rupiah = |d: Decimal| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match range {
        None => "Rp 0".to_string(),
        Some(r) if r.min.is_zero() && r.max.is_zero() => "Rp 0".to_string(),
        Some(r) if rupiah(r.min) == rupiah(r.max) => format!("Rp {}", rupiah(r.min)),
        Some(r) => format!("Rp {} - Rp {}", rupiah(r.min), rupiah(r.max)),
    }
}

// ============================================================
// RESPONSE SHAPES
// ============================================================

/// Laundry as shown in search results
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Listing {
    pub id: Uuid,
    #[schema(example = "Bersih Kilat Laundry")]
    pub name: String,
    pub description: String,
    pub address: String,
    #[schema(value_type = String, example = "4.5")]
    pub rating: Decimal,
    pub review_count: i32,
    pub image: String,
    #[schema(example = "Rp 8000 - Rp 25000")]
    pub price_range: String,
    /// Kilometers from the geo-context; absent without one
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 2.98)]
    pub distance: Option<f64>,
    pub is_open: bool,
    pub operating_hours: OperatingHours,
}

impl Listing {
    fn new(laundry: &Laundry, distance: Option<f64>, price_range: Option<PriceRange>) -> Self {
        Self {
            id: laundry.id,
            name: laundry.name.clone(),
            description: laundry.description.clone(),
            address: laundry.address.clone(),
            rating: laundry.rating,
            review_count: laundry.review_count,
            image: laundry.image_url.clone(),
            price_range: format_price_range(price_range),
            distance,
            is_open: laundry.is_open,
            operating_hours: laundry.operating_hours.clone(),
        }
    }
}

/// Orderable service in a laundry's catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "8000")]
    pub price: Decimal,
    #[schema(example = "kg")]
    pub unit: String,
    /// Lead time in hours
    #[schema(example = 24)]
    pub estimated_time: u32,
    pub category: String,
}

impl From<&Service> for ServiceView {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            description: s.description.clone(),
            price: s.price,
            unit: s.unit.clone(),
            estimated_time: s.lead_time_hours,
            category: s.category.clone(),
        }
    }
}

/// Single laundry with its active service catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LaundryDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub services: Vec<ServiceView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingPage {
    pub laundries: Vec<Listing>,
    pub pagination: Pagination,
    /// Geo-context the page was ranked against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<Coordinates>,
}

// ============================================================
// RANKING
// ============================================================

/// A candidate with its computed distance
#[derive(Debug, Clone)]
pub struct Ranked {
    pub laundry: Laundry,
    pub distance: Option<f64>,
}

/// Annotate and order candidates.
///
/// With an origin: distance ascending, unlocated laundries last.
/// Without: rating descending. Both sorts are stable, so ties keep input order.
pub fn rank(laundries: Vec<Laundry>, origin: Option<&Coordinates>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = laundries
        .into_iter()
        .map(|laundry| {
            let distance = match (origin, laundry.location.as_ref()) {
                (Some(from), Some(to)) => Some(distance_km(from, to)),
                _ => None,
            };
            Ranked { laundry, distance }
        })
        .collect();

    if origin.is_some() {
        ranked.sort_by(|a, b| match (a.distance, b.distance) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    } else {
        ranked.sort_by(|a, b| b.laundry.rating.cmp(&a.laundry.rating));
    }
    ranked
}

// ============================================================
// ENGINE
// ============================================================

/// Listing request after parameter parsing
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub filter: LaundryFilter,
    /// Explicit coordinates supplied with the request
    pub coordinates: Option<Coordinates>,
    /// Authenticated caller, if any; supplies the profile location fallback
    pub requester: Option<Uuid>,
    pub page: PageRequest,
}

pub struct LaundrySearch {
    laundries: Arc<dyn LaundryStore>,
    services: Arc<dyn ServiceStore>,
    users: Arc<dyn UserStore>,
}

impl LaundrySearch {
    pub fn new(
        laundries: Arc<dyn LaundryStore>,
        services: Arc<dyn ServiceStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            laundries,
            services,
            users,
        }
    }

    /// Ranked, paginated laundry listings
    pub async fn list(&self, query: SearchQuery) -> BookingResult<ListingPage> {
        let profile = match (query.coordinates, query.requester) {
            (None, Some(user_id)) => self
                .users
                .find_user(user_id)
                .await?
                .and_then(|u| u.location),
            _ => None,
        };
        let origin = resolve_geo_context(query.coordinates, profile);

        let candidates = self.laundries.search_laundries(&query.filter).await?;
        let total = candidates.len() as u64;
        let page = query.page.slice(rank(candidates, origin.as_ref()));

        let mut laundries = Vec::with_capacity(page.len());
        for ranked in &page {
            let range = self.services.active_price_range(ranked.laundry.id).await?;
            laundries.push(Listing::new(&ranked.laundry, ranked.distance, range));
        }

        tracing::debug!(
            total,
            returned = laundries.len(),
            geo = origin.is_some(),
            "laundry listing"
        );

        Ok(ListingPage {
            laundries,
            pagination: query.page.pagination(total),
            user_location: origin,
        })
    }

    /// One laundry with its active services
    pub async fn get_by_id(
        &self,
        id: Uuid,
        coordinates: Option<Coordinates>,
    ) -> BookingResult<LaundryDetail> {
        let laundry = self
            .laundries
            .find_laundry(id)
            .await?
            .ok_or(BookingError::NotFound("laundry"))?;

        let distance = match (coordinates, laundry.location) {
            (Some(from), Some(to)) => Some(distance_km(&from, &to)),
            _ => None,
        };
        let range = self.services.active_price_range(laundry.id).await?;

        let services = laundry
            .services
            .iter()
            .filter(|s| s.is_active)
            .map(ServiceView::from)
            .collect();

        Ok(LaundryDetail {
            listing: Listing::new(&laundry, distance, range),
            services,
        })
    }
}
