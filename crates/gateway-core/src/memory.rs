//! # In-Memory Stores
//!
//! `AccountStore` and `InvoiceStore` backed by hash maps behind an `RwLock`.
//! Used by the server binary and in tests.

use crate::account::{Account, AccountId};
use crate::error::{GatewayError, GatewayResult};
use crate::invoice::{Invoice, InvoiceId, InvoiceStatus};
use crate::store::{AccountStore, InvoiceStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read<T>(lock: &RwLock<T>) -> GatewayResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| GatewayError::Storage(format!("Failed to acquire read lock: {}", e)))
}

fn write<T>(lock: &RwLock<T>) -> GatewayResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| GatewayError::Storage(format!("Failed to acquire write lock: {}", e)))
}

#[derive(Default)]
struct AccountIndex {
    accounts: HashMap<AccountId, Account>,
    by_key: HashMap<String, AccountId>,
    by_email: HashMap<String, AccountId>,
}

/// In-memory account store
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    inner: Arc<RwLock<AccountIndex>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> GatewayResult<usize> {
        Ok(read(self.inner.as_ref())?.accounts.len())
    }

    pub fn is_empty(&self) -> GatewayResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn save(&self, account: Account) -> GatewayResult<()> {
        let mut idx = write(self.inner.as_ref())?;

        if idx.by_email.contains_key(&account.email) || idx.by_key.contains_key(&account.api_key) {
            return Err(GatewayError::DuplicateAccount {
                email: account.email,
            });
        }

        idx.by_key.insert(account.api_key.clone(), account.id);
        idx.by_email.insert(account.email.clone(), account.id);
        idx.accounts.insert(account.id, account);
        Ok(())
    }

    async fn find_by_key(&self, api_key: &str) -> GatewayResult<Option<Account>> {
        let idx = read(self.inner.as_ref())?;
        Ok(idx
            .by_key
            .get(api_key)
            .and_then(|id| idx.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> GatewayResult<Option<Account>> {
        let idx = read(self.inner.as_ref())?;
        Ok(idx.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> GatewayResult<Option<Account>> {
        let idx = read(self.inner.as_ref())?;
        Ok(idx
            .by_email
            .get(email)
            .and_then(|id| idx.accounts.get(id))
            .cloned())
    }
}

#[derive(Default)]
struct InvoiceIndex {
    invoices: HashMap<InvoiceId, Invoice>,
    // insertion order per account
    by_account: HashMap<AccountId, Vec<InvoiceId>>,
}

impl InvoiceIndex {
    fn owned_mut(&mut self, account_id: AccountId, invoice_id: InvoiceId) -> Option<&mut Invoice> {
        self.invoices
            .get_mut(&invoice_id)
            .filter(|invoice| invoice.is_owned_by(account_id))
    }
}

/// In-memory invoice store
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    inner: Arc<RwLock<InvoiceIndex>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> GatewayResult<usize> {
        Ok(read(self.inner.as_ref())?.invoices.len())
    }

    pub fn is_empty(&self) -> GatewayResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn save(&self, invoice: Invoice) -> GatewayResult<()> {
        let mut idx = write(self.inner.as_ref())?;

        if idx.invoices.contains_key(&invoice.id()) {
            return Err(GatewayError::Storage(format!(
                "Invoice id already in use: {}",
                invoice.id()
            )));
        }

        idx.by_account
            .entry(invoice.account_id())
            .or_default()
            .push(invoice.id());
        idx.invoices.insert(invoice.id(), invoice);
        Ok(())
    }

    async fn find_by_id(
        &self,
        account_id: AccountId,
        invoice_id: InvoiceId,
    ) -> GatewayResult<Option<Invoice>> {
        let idx = read(self.inner.as_ref())?;
        Ok(idx
            .invoices
            .get(&invoice_id)
            .filter(|invoice| invoice.is_owned_by(account_id))
            .cloned())
    }

    async fn list_by_account(&self, account_id: AccountId) -> GatewayResult<Vec<Invoice>> {
        let idx = read(self.inner.as_ref())?;
        let mut invoices: Vec<Invoice> = idx
            .by_account
            .get(&account_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| idx.invoices.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // stable: equal timestamps keep insertion order
        invoices.sort_by_key(|invoice| invoice.created_at());
        Ok(invoices)
    }

    async fn swap_status(
        &self,
        account_id: AccountId,
        invoice_id: InvoiceId,
        expected: InvoiceStatus,
        new_status: InvoiceStatus,
        at: DateTime<Utc>,
    ) -> GatewayResult<Invoice> {
        let mut idx = write(self.inner.as_ref())?;
        let invoice = idx
            .owned_mut(account_id, invoice_id)
            .ok_or_else(GatewayError::invoice_not_found)?;

        if invoice.status() != expected {
            return Err(GatewayError::InvalidStatusTransition {
                current: invoice.status(),
            });
        }

        invoice.resolve(new_status, at);
        Ok(invoice.clone())
    }
}
