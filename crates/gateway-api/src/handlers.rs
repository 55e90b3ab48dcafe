//! # Request Handlers
//!
//! Axum request handlers for the gateway API.
//! Invoice handlers run behind [`require_api_key`](crate::middleware::require_api_key)
//! and read the caller from request extensions.

use crate::middleware::api_key_from_headers;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use gateway_core::{
    Account, AccountProfile, AuthenticatedAccount, CreditCard, GatewayError, Invoice, InvoiceId,
    InvoiceStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create account request
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
}

/// Create invoice request.
///
/// Carries raw card data, so it deliberately has no `Debug` impl.
#[derive(Deserialize)]
pub struct CreateInvoiceRequest {
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub payment_type: String,
    pub card_number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
    pub cardholder_name: String,
}

impl CreateInvoiceRequest {
    fn card(&self) -> CreditCard {
        CreditCard::new(
            self.card_number.clone(),
            self.cvv.clone(),
            self.expiry_month,
            self.expiry_year,
            self.cardholder_name.clone(),
        )
    }
}

/// Explicit status change request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InvoiceStatus,
}

/// Invoice list response
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Invoice>,
    pub count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

pub fn gateway_error_to_response(err: GatewayError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    if err.is_client_error() {
        warn!("Request rejected: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

type HandlerResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Unwrap a JSON body, replacing axum's rejection text with a generic
/// `ErrorResponse`. The rejection quotes the offending value, which may be
/// card data.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> HandlerResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let status = rejection.status();
        warn!(status = %status, "Request body rejected");
        (
            status,
            Json(ErrorResponse::new("Invalid request body", status.as_u16())),
        )
    })
}

fn parse_invoice_id(raw: &str) -> Result<InvoiceId, GatewayError> {
    // A malformed id cannot name an existing invoice
    raw.parse().map_err(|_| GatewayError::invoice_not_found())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Register an account and return it with its API key
#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<Account>)> {
    let request = json_body(payload)?;
    let account = state
        .accounts
        .create(AccountProfile::new(request.name, request.email))
        .await
        .map_err(gateway_error_to_response)?;

    info!("Registered account {}", account.id);
    Ok((StatusCode::CREATED, Json(account)))
}

/// Account owning the `X-API-KEY` header
#[instrument(skip(state, headers))]
pub async fn get_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Json<Account>> {
    let caller = state
        .gate
        .authenticate(api_key_from_headers(&headers))
        .await
        .map_err(gateway_error_to_response)?;

    let account = state
        .accounts
        .get(caller.account_id())
        .await
        .map_err(gateway_error_to_response)?;

    Ok(Json(account))
}

/// Create, process and store an invoice for the caller
#[instrument(skip(state, caller, payload), fields(account_id = %caller.account_id()))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> HandlerResult<(StatusCode, Json<Invoice>)> {
    let request = json_body(payload)?;
    let card = request.card();
    let invoice = state
        .invoices
        .create(
            &caller,
            request.amount,
            request.description,
            request.payment_type,
            &card,
        )
        .await
        .map_err(gateway_error_to_response)?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

/// One of the caller's invoices
#[instrument(skip(state, caller), fields(account_id = %caller.account_id()))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    Path(invoice_id): Path<String>,
) -> HandlerResult<Json<Invoice>> {
    let invoice_id = parse_invoice_id(&invoice_id).map_err(gateway_error_to_response)?;
    let invoice = state
        .invoices
        .get_by_id(&caller, invoice_id)
        .await
        .map_err(gateway_error_to_response)?;

    Ok(Json(invoice))
}

/// All of the caller's invoices, oldest first
#[instrument(skip(state, caller), fields(account_id = %caller.account_id()))]
pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
) -> HandlerResult<Json<InvoiceListResponse>> {
    let invoices = state
        .invoices
        .list_by_account(&caller)
        .await
        .map_err(gateway_error_to_response)?;

    Ok(Json(InvoiceListResponse {
        count: invoices.len(),
        invoices,
    }))
}

/// Move a pending invoice to a new status
#[instrument(skip(state, caller, payload), fields(account_id = %caller.account_id()))]
pub async fn update_invoice_status(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    Path(invoice_id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> HandlerResult<Json<Invoice>> {
    let request = json_body(payload)?;
    let invoice_id = parse_invoice_id(&invoice_id).map_err(gateway_error_to_response)?;
    let invoice = state
        .invoices
        .update_status(&caller, invoice_id, request.status)
        .await
        .map_err(gateway_error_to_response)?;

    Ok(Json(invoice))
}
