//! # Gateway Error Types
//!
//! Typed error handling for the payment gateway simulator.
//! All core operations return `Result<T, GatewayError>`.
//!
//! None of the messages below ever embed card data: the card number and CVV
//! never reach an error path.

use crate::invoice::InvoiceStatus;
use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// Invoice amount is zero, negative or not a finite number
    #[error("Invalid amount: must be a positive value")]
    InvalidAmount,

    /// Card number too short to derive the last four digits
    #[error("Invalid card: number must have at least 4 characters")]
    InvalidCard,

    /// Explicit status update on an invoice that already left Pending
    #[error("Invalid status transition: invoice is {current}, only pending invoices can change status")]
    InvalidStatusTransition { current: InvoiceStatus },

    /// Missing, empty or unknown API key
    #[error("Unauthenticated: a valid API key is required")]
    Unauthenticated,

    /// Entity not found (or not visible to the caller)
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// An account with the same natural key already exists
    #[error("Account already exists: {email}")]
    DuplicateAccount { email: String },

    /// Malformed request data (account profile)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Storage collaborator failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn account_not_found() -> Self {
        GatewayError::NotFound { resource: "Account" }
    }

    pub fn invoice_not_found() -> Self {
        GatewayError::NotFound { resource: "Invoice" }
    }

    /// Returns true if the error was caused by the caller (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::InvalidAmount => 400,
            GatewayError::InvalidCard => 400,
            GatewayError::InvalidRequest(_) => 400,
            GatewayError::Unauthenticated => 401,
            GatewayError::NotFound { .. } => 404,
            GatewayError::InvalidStatusTransition { .. } => 409,
            GatewayError::DuplicateAccount { .. } => 409,
            GatewayError::Storage(_) => 500,
            GatewayError::Internal(_) => 500,
        }
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
