//! # Account Service
//!
//! Registration and lookup of merchant accounts.

use crate::account::{Account, AccountId, AccountProfile};
use crate::error::{GatewayError, GatewayResult};
use crate::store::BoxedAccountStore;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct AccountService {
    store: BoxedAccountStore,
}

impl AccountService {
    pub fn new(store: BoxedAccountStore) -> Self {
        Self { store }
    }

    /// Register a new account and issue its API key.
    ///
    /// Fails with `DuplicateAccount` when the email is already registered.
    #[instrument(skip(self, profile))]
    pub async fn create(&self, profile: AccountProfile) -> GatewayResult<Account> {
        profile.validate()?;

        let email = profile.normalized_email();
        if self.store.find_by_email(&email).await?.is_some() {
            warn!("Account registration rejected: email already registered");
            return Err(GatewayError::DuplicateAccount { email });
        }

        // The store enforces uniqueness again, covering concurrent registrations.
        let account = Account::new(profile);
        self.store.save(account.clone()).await?;

        info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    /// Resolve the account owning `api_key`
    pub async fn resolve_by_key(&self, api_key: &str) -> GatewayResult<Account> {
        self.store
            .find_by_key(api_key)
            .await?
            .ok_or_else(GatewayError::account_not_found)
    }

    pub async fn get(&self, id: AccountId) -> GatewayResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(GatewayError::account_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryAccountStore;
    use std::sync::Arc;

    fn service() -> AccountService {
        AccountService::new(Arc::new(InMemoryAccountStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let service = service();
        let account = service
            .create(AccountProfile::new("Acme", "ops@acme.io"))
            .await
            .unwrap();

        let resolved = service.resolve_by_key(&account.api_key).await.unwrap();
        assert_eq!(resolved, account);

        let fetched = service.get(account.id).await.unwrap();
        assert_eq!(fetched, account);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let service = service();
        service
            .create(AccountProfile::new("Acme", "ops@acme.io"))
            .await
            .unwrap();

        let err = service
            .create(AccountProfile::new("Acme Again", "  OPS@acme.io "))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::DuplicateAccount {
                email: "ops@acme.io".into()
            }
        );
    }

    #[tokio::test]
    async fn test_each_account_gets_its_own_key() {
        let service = service();
        let a = service.create(AccountProfile::new("A", "a@x.io")).await.unwrap();
        let b = service.create(AccountProfile::new("B", "b@x.io")).await.unwrap();

        assert_ne!(a.api_key, b.api_key);
        assert_eq!(service.resolve_by_key(&b.api_key).await.unwrap().id, b.id);
    }

    #[tokio::test]
    async fn test_unknown_lookups() {
        let service = service();
        assert_eq!(
            service.resolve_by_key("nope").await.unwrap_err(),
            GatewayError::account_not_found()
        );
        assert_eq!(
            service.get(AccountId::new()).await.unwrap_err(),
            GatewayError::account_not_found()
        );
    }

    #[tokio::test]
    async fn test_invalid_profile() {
        let err = service()
            .create(AccountProfile::new("", "ops@acme.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }
}
