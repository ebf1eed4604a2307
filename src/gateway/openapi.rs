//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CreateOrderRequest, OrderItemResponse, OrderListResponse, OrderResponse, UpdateStatusRequest,
};
use crate::geo::Coordinates;
use crate::laundry::{LaundryDetail, Listing, ListingPage, ServiceView};
use crate::models::{OperatingHours, UserRole};
use crate::order::OrderStatus;
use crate::pagination::Pagination;
use crate::user_auth::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateLocationRequest, UserProfile,
};

/// Bearer JWT issued by /api/v1/auth/login or /register
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Authorization: Bearer {token}"))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Laundry Hub API",
        version = "1.0.0",
        description = "Laundry marketplace: geo-ranked laundry discovery and order booking.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::user_auth::handlers::me,
        crate::user_auth::handlers::update_location,
        crate::gateway::handlers::laundry::list_laundries,
        crate::gateway::handlers::laundry::get_laundry,
        crate::gateway::handlers::order::create_order,
        crate::gateway::handlers::order::list_orders,
        crate::gateway::handlers::order::get_order,
        crate::gateway::handlers::order::cancel_order,
        crate::gateway::handlers::order::update_order_status,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UpdateLocationRequest,
            AuthResponse,
            UserProfile,
            UserRole,
            Coordinates,
            Listing,
            ListingPage,
            LaundryDetail,
            ServiceView,
            OperatingHours,
            Pagination,
            CreateOrderRequest,
            UpdateStatusRequest,
            OrderResponse,
            OrderItemResponse,
            OrderListResponse,
            OrderStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Laundries", description = "Laundry discovery (no auth required)"),
        (name = "Orders", description = "Order booking and lifecycle (auth required)"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Laundry Hub API");
        assert!(spec.to_json().unwrap().contains("Laundry Hub API"));
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths.paths;
        for path in [
            "/health",
            "/api/v1/auth/register",
            "/api/v1/laundries",
            "/api/v1/laundries/{id}",
            "/api/v1/orders",
            "/api/v1/orders/{id}/cancel",
            "/api/v1/orders/{id}/status",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_security_scheme_registered() {
        let components = ApiDoc::openapi().components.unwrap();
        assert!(components.security_schemes.contains_key("jwt_auth"));
    }
}
