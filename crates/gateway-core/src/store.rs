//! # Storage Traits
//!
//! Repository abstractions for accounts and invoices. Services receive these
//! as trait objects, so any backend (in-memory, SQL, ...) can be plugged in.
//!
//! Invoice lookups always take the owning account id together with the
//! invoice id; there is no id-only read path.

use crate::account::{Account, AccountId};
use crate::error::GatewayResult;
use crate::invoice::{Invoice, InvoiceId, InvoiceStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Persistence for accounts.
///
/// `save` must reject an account whose email or API key is already taken with
/// `GatewayError::DuplicateAccount`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn save(&self, account: Account) -> GatewayResult<()>;

    async fn find_by_key(&self, api_key: &str) -> GatewayResult<Option<Account>>;

    async fn find_by_id(&self, id: AccountId) -> GatewayResult<Option<Account>>;

    /// `email` is expected in normalized form (trimmed, lowercase)
    async fn find_by_email(&self, email: &str) -> GatewayResult<Option<Account>>;
}

/// Persistence for invoices.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn save(&self, invoice: Invoice) -> GatewayResult<()>;

    async fn find_by_id(
        &self,
        account_id: AccountId,
        invoice_id: InvoiceId,
    ) -> GatewayResult<Option<Invoice>>;

    /// Invoices of one account, oldest first
    async fn list_by_account(&self, account_id: AccountId) -> GatewayResult<Vec<Invoice>>;

    /// Atomically move the invoice from `expected` to `new_status`, setting
    /// `updated_at` to `at`.
    ///
    /// Fails with `NotFound` when the invoice does not exist for this account
    /// and with `InvalidStatusTransition` when its status is no longer
    /// `expected`. The check and the write happen under one lock or row
    /// transaction.
    async fn swap_status(
        &self,
        account_id: AccountId,
        invoice_id: InvoiceId,
        expected: InvoiceStatus,
        new_status: InvoiceStatus,
        at: DateTime<Utc>,
    ) -> GatewayResult<Invoice>;
}

pub type BoxedAccountStore = Arc<dyn AccountStore>;
pub type BoxedInvoiceStore = Arc<dyn InvoiceStore>;
