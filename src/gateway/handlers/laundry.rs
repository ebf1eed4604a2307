//! Laundry discovery handlers (list, detail)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
};

use super::super::state::AppState;
use super::super::types::{
    ApiQuery, ApiResponse, ApiResult, LaundryDetailQuery, LaundryListQuery, ok,
    parse_coordinates, parse_id,
};
use crate::laundry::{LaundryDetail, ListingPage};
use crate::user_auth::MaybeClaims;

/// List laundries
///
/// GET /api/v1/laundries
///
/// Ranked by distance when `lat`/`lng` are given (or the bearer's stored
/// location), otherwise by rating.
#[utoipa::path(
    get,
    path = "/api/v1/laundries",
    params(LaundryListQuery),
    responses(
        (status = 200, description = "Ranked page of laundries", body = ApiResponse<ListingPage>),
        (status = 400, description = "Invalid parameters"),
        (status = 401, description = "Invalid bearer token")
    ),
    tag = "Laundries"
)]
pub async fn list_laundries(
    State(state): State<Arc<AppState>>,
    Extension(MaybeClaims(claims)): Extension<MaybeClaims>,
    ApiQuery(query): ApiQuery<LaundryListQuery>,
) -> ApiResult<ListingPage> {
    let mut search = query.into_search()?;
    search.requester = match claims {
        Some(claims) => Some(claims.user_id()?),
        None => None,
    };
    ok(state.search.list(search).await?)
}

/// Laundry detail with its active services
///
/// GET /api/v1/laundries/{id}
#[utoipa::path(
    get,
    path = "/api/v1/laundries/{id}",
    params(
        ("id" = String, Path, description = "Laundry id"),
        LaundryDetailQuery
    ),
    responses(
        (status = 200, description = "Laundry detail", body = ApiResponse<LaundryDetail>),
        (status = 400, description = "Invalid id or coordinates"),
        (status = 404, description = "Laundry not found")
    ),
    tag = "Laundries"
)]
pub async fn get_laundry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<LaundryDetailQuery>,
) -> ApiResult<LaundryDetail> {
    let id = parse_id(&id, "laundry")?;
    let coordinates = parse_coordinates(query.lat.as_deref(), query.lng.as_deref())?;
    ok(state.search.get_by_id(id, coordinates).await?)
}
