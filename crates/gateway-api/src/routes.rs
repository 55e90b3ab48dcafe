//! # Routes
//!
//! Axum router configuration for the gateway API.

use crate::handlers;
use crate::middleware::require_api_key;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Public:
///   - GET  /health - Health check
///   - POST /accounts - Register an account (returns the API key)
///   - GET  /accounts - Account for the `X-API-KEY` header
///
/// - Behind the API key gate (`X-API-KEY`):
///   - POST  /invoice - Create and process an invoice
///   - GET   /invoice - List the caller's invoices
///   - GET   /invoice/{invoice_id} - Get one of the caller's invoices
///   - PATCH /invoice/{invoice_id}/status - Move a pending invoice
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route(
            "/accounts",
            post(handlers::create_account).get(handlers::get_account),
        )
        .merge(invoice_routes(state.clone()))
        // Middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}

/// Invoice routes; `route_layer` so unknown paths still 404 instead of 401
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/invoice",
            post(handlers::create_invoice).get(handlers::list_invoices),
        )
        .route("/invoice/{invoice_id}", get(handlers::get_invoice))
        .route(
            "/invoice/{invoice_id}/status",
            patch(handlers::update_invoice_status),
        )
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}
