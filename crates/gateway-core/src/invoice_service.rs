//! # Invoice Service
//!
//! Creation, lookup, listing and explicit status changes of invoices. Every
//! operation is scoped to an [`AuthenticatedAccount`].

use crate::auth::AuthenticatedAccount;
use crate::error::{GatewayError, GatewayResult};
use crate::invoice::{CreditCard, Invoice, InvoiceId, InvoiceStatus};
use crate::processor::InvoiceProcessor;
use crate::store::BoxedInvoiceStore;
use chrono::Utc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct InvoiceService {
    store: BoxedInvoiceStore,
    processor: InvoiceProcessor,
}

impl InvoiceService {
    pub fn new(store: BoxedInvoiceStore, processor: InvoiceProcessor) -> Self {
        Self { store, processor }
    }

    /// Build, process and persist an invoice for the caller.
    #[instrument(
        skip(self, caller, description, payment_type, card),
        fields(account_id = %caller.account_id())
    )]
    pub async fn create(
        &self,
        caller: &AuthenticatedAccount,
        amount: f64,
        description: impl Into<String>,
        payment_type: impl Into<String>,
        card: &CreditCard,
    ) -> GatewayResult<Invoice> {
        let mut invoice = Invoice::new(
            caller.account_id(),
            amount,
            description,
            payment_type,
            card,
        )?;
        self.processor.process(&mut invoice);

        self.store.save(invoice.clone()).await?;

        info!(
            invoice_id = %invoice.id(),
            status = %invoice.status(),
            card_last_digits = invoice.card_last_digits(),
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Fetch one of the caller's invoices. Invoices of other accounts are
    /// reported as `NotFound`.
    pub async fn get_by_id(
        &self,
        caller: &AuthenticatedAccount,
        invoice_id: InvoiceId,
    ) -> GatewayResult<Invoice> {
        self.store
            .find_by_id(caller.account_id(), invoice_id)
            .await?
            .ok_or_else(GatewayError::invoice_not_found)
    }

    /// All of the caller's invoices, oldest first
    pub async fn list_by_account(&self, caller: &AuthenticatedAccount) -> GatewayResult<Vec<Invoice>> {
        self.store.list_by_account(caller.account_id()).await
    }

    /// Move a pending invoice to `new_status`.
    ///
    /// The pending check is a compare-and-swap in the store, so of two racing
    /// updates on the same invoice exactly one succeeds.
    #[instrument(skip(self, caller), fields(account_id = %caller.account_id()))]
    pub async fn update_status(
        &self,
        caller: &AuthenticatedAccount,
        invoice_id: InvoiceId,
        new_status: InvoiceStatus,
    ) -> GatewayResult<Invoice> {
        let mut invoice = self.get_by_id(caller, invoice_id).await?;

        // Validate on the local copy first; the store repeats the check atomically.
        let at = Utc::now();
        invoice.update_status_at(new_status, at)?;

        let updated = self
            .store
            .swap_status(
                caller.account_id(),
                invoice_id,
                InvoiceStatus::Pending,
                new_status,
                at,
            )
            .await?;

        info!(invoice_id = %invoice_id, status = %updated.status(), "Invoice status updated");
        Ok(updated)
    }
}
