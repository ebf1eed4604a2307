pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::user_auth::middleware::{
    jwt_auth_middleware, optional_jwt_auth_middleware, require_laundry_owner,
};
use state::AppState;

/// Empty origin list = any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Build the complete router
pub fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    // ==========================================================================
    // Auth Routes
    // ==========================================================================
    let auth_routes = Router::new()
        .route("/register", post(crate::user_auth::handlers::register))
        .route("/login", post(crate::user_auth::handlers::login))
        .merge(
            Router::new()
                .route("/me", get(crate::user_auth::handlers::me))
                .route(
                    "/update-location",
                    patch(crate::user_auth::handlers::update_location),
                )
                .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
        );

    // ==========================================================================
    // Laundry Routes (public; a bearer token only adds the profile location)
    // ==========================================================================
    let laundry_routes = Router::new()
        .route(
            "/",
            get(handlers::list_laundries).route_layer(from_fn_with_state(
                state.clone(),
                optional_jwt_auth_middleware,
            )),
        )
        .route("/{id}", get(handlers::get_laundry));

    // ==========================================================================
    // Order Routes (JWT required; status updates for laundry owners only)
    // ==========================================================================
    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::create_order).get(handlers::list_orders),
        )
        .route("/{id}", get(handlers::get_order))
        .route("/{id}/cancel", patch(handlers::cancel_order))
        .route(
            "/{id}/status",
            patch(handlers::update_order_status).route_layer(from_fn(require_laundry_owner)),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/laundries", laundry_routes)
        .nest("/api/v1/orders", order_routes)
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(cors_layer(allowed_origins))
}

/// Start HTTP Gateway server
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} (port already in use?)", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

