//! # API Key Middleware
//!
//! Runs the [`AuthGate`](gateway_core::AuthGate) in front of invoice routes
//! and stores the resolved [`AuthenticatedAccount`] in request extensions.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/invoice", get(list_invoices))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_api_key));
//! ```

use crate::handlers::{gateway_error_to_response, ErrorResponse};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use gateway_core::AuthenticatedAccount;

/// Header carrying the account API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key from the request headers. Values that are not visible ASCII are
/// treated as missing.
pub fn api_key_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Middleware function that requires a valid API key
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    // Owned copy: the request body is not Sync, so no borrow of it may live
    // across the await below.
    let api_key = api_key_from_headers(request.headers()).map(str::to_owned);
    let caller: AuthenticatedAccount = state
        .gate
        .authenticate(api_key.as_deref())
        .await
        .map_err(gateway_error_to_response)?;

    tracing::debug!(account_id = %caller.account_id(), "API key accepted");
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
