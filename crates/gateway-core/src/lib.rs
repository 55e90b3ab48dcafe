//! # gateway-core
//!
//! Core types and services for the payment gateway simulator.
//!
//! This crate provides:
//! - `Account` and `AccountService` for merchant registration and API keys
//! - `Invoice`, `InvoiceStatus` and `CreditCard` for the invoice lifecycle
//! - `InvoiceProcessor` with an injectable `RandomSource`
//! - `AuthGate` resolving API keys into an `AuthenticatedAccount`
//! - `InvoiceService` for account-scoped invoice operations
//! - `AccountStore` / `InvoiceStore` traits with in-memory implementations
//! - `GatewayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use gateway_core::*;
//! use std::sync::Arc;
//!
//! let accounts = AccountService::new(Arc::new(InMemoryAccountStore::new()));
//! let invoices = InvoiceService::new(
//!     Arc::new(InMemoryInvoiceStore::new()),
//!     InvoiceProcessor::default(),
//! );
//! let gate = AuthGate::new(accounts.clone());
//!
//! let account = accounts.create(AccountProfile::new("Acme", "ops@acme.io")).await?;
//! let caller = gate.authenticate(Some(&account.api_key)).await?;
//!
//! let card = CreditCard::new("4111111111114242", "123", 12, 2030, "Jane Doe");
//! let invoice = invoices.create(&caller, 50.0, "Book", "credit_card", &card).await?;
//! assert_eq!(invoice.card_last_digits(), "4242");
//! ```

pub mod account;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod invoice;
pub mod invoice_service;
pub mod memory;
pub mod processor;
pub mod store;

// Re-exports for convenience
pub use account::{generate_api_key, Account, AccountId, AccountProfile};
pub use account_service::AccountService;
pub use auth::{AuthGate, AuthenticatedAccount};
pub use error::{GatewayError, GatewayResult};
pub use invoice::{CreditCard, Invoice, InvoiceId, InvoiceStatus};
pub use invoice_service::InvoiceService;
pub use memory::{InMemoryAccountStore, InMemoryInvoiceStore};
pub use processor::{
    decide, FixedSample, InvoiceProcessor, RandomSource, SeededRandom, SharedRandomSource,
    ThreadRandom, APPROVAL_THRESHOLD, MANUAL_REVIEW_LIMIT,
};
pub use store::{AccountStore, BoxedAccountStore, BoxedInvoiceStore, InvoiceStore};
