//! Query-string parameters
//!
//! Every field arrives as a raw string so that bad paging values can fall
//! back to defaults instead of failing the whole request. Coordinates and
//! filters are parsed strictly.

use serde::Deserialize;
use utoipa::IntoParams;

use super::error::ApiError;
use crate::geo::Coordinates;
use crate::laundry::SearchQuery;
use crate::pagination::PageRequest;
use crate::store::LaundryFilter;

fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn page_request(page: Option<&str>, limit: Option<&str>) -> PageRequest {
    PageRequest::new(lenient_int(page), lenient_int(limit))
}

fn parse_f64(raw: &str, field: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::bad_request(format!("invalid {}", field)))
}

/// Request coordinates; only a complete `lat` + `lng` pair counts
pub fn parse_coordinates(
    lat: Option<&str>,
    lng: Option<&str>,
) -> Result<Option<Coordinates>, ApiError> {
    let (Some(lat), Some(lng)) = (
        lat.filter(|s| !s.trim().is_empty()),
        lng.filter(|s| !s.trim().is_empty()),
    ) else {
        return Ok(None);
    };
    let coordinates = Coordinates::new(parse_f64(lat, "lat")?, parse_f64(lng, "lng")?)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(Some(coordinates))
}

fn parse_bool(raw: Option<&str>, field: &str) -> Result<Option<bool>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(_) => Err(ApiError::bad_request(format!("invalid {}", field))),
    }
}

/// GET /api/v1/laundries
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LaundryListQuery {
    /// Case-insensitive match on name or address
    pub search: Option<String>,
    /// `true` / `false`
    pub is_open: Option<String>,
    #[param(example = "-6.2088")]
    pub lat: Option<String>,
    #[param(example = "106.8456")]
    pub lng: Option<String>,
    #[param(example = "1")]
    pub page: Option<String>,
    #[param(example = "10")]
    pub limit: Option<String>,
}

impl LaundryListQuery {
    /// The requester is filled in by the handler from the optional token
    pub fn into_search(self) -> Result<SearchQuery, ApiError> {
        Ok(SearchQuery {
            filter: LaundryFilter::new(
                self.search,
                parse_bool(self.is_open.as_deref(), "is_open")?,
            ),
            coordinates: parse_coordinates(self.lat.as_deref(), self.lng.as_deref())?,
            requester: None,
            page: page_request(self.page.as_deref(), self.limit.as_deref()),
        })
    }
}

/// GET /api/v1/laundries/{id}
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LaundryDetailQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// GET /api/v1/orders
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Only orders in this status
    #[param(example = "pending")]
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl OrderListQuery {
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page.as_deref(), self.limit.as_deref())
    }

    /// Blank means no filter
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
