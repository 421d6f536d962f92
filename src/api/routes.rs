//! Application route configuration.

use axum::{
    extract::State, http::StatusCode, middleware, response::Json, routing::get, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, auth_routes, cart_routes, catalog_admin_routes, catalog_routes,
    checkout_routes, order_routes, user_routes, webhook_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth_state = state.clone();
    let auth = move || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public
        .nest("/auth", auth_routes())
        .merge(catalog_routes())
        // Signature-checked, never bearer-authenticated
        .nest("/webhooks", webhook_routes())
        // Bearer token required
        .merge(catalog_admin_routes().route_layer(auth()))
        .nest("/cart", cart_routes().route_layer(auth()))
        .nest("/checkout", checkout_routes().route_layer(auth()))
        .nest("/orders", order_routes().route_layer(auth()))
        .nest("/users", user_routes().route_layer(auth()))
        .nest("/admin", admin_routes().route_layer(auth()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Storefront API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => match db.ping().await {
            Ok(()) => ServiceStatus {
                status: "healthy",
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Health check: database unreachable");
                ServiceStatus {
                    status: "unhealthy",
                    error: Some(e.to_string()),
                }
            }
        },
        None => ServiceStatus {
            status: "not_configured",
            error: None,
        },
    };

    let healthy = database.status != "unhealthy";
    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "degraded" },
            database,
        }),
    )
}
