//! # Authentication Gate
//!
//! Turns a presented API key into an [`AuthenticatedAccount`]. Every invoice
//! operation takes that type, and only the gate can build one outside this
//! crate, so invoice access cannot skip key resolution.

use crate::account::AccountId;
use crate::account_service::AccountService;
use crate::error::{GatewayError, GatewayResult};
use tracing::debug;

/// Identity resolved from a valid API key, scoped to a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    account_id: AccountId,
}

impl AuthenticatedAccount {
    pub(crate) fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}

/// API key gate in front of the invoice service.
///
/// Holds no state besides the account lookup; cheap to clone per request.
#[derive(Clone)]
pub struct AuthGate {
    accounts: AccountService,
}

impl AuthGate {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts }
    }

    /// Resolve `api_key` to the owning account.
    ///
    /// Missing, blank and unknown keys all fail with `Unauthenticated`.
    /// The key must match exactly; surrounding whitespace is not stripped.
    pub async fn authenticate(&self, api_key: Option<&str>) -> GatewayResult<AuthenticatedAccount> {
        let key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(GatewayError::Unauthenticated)?;

        match self.accounts.resolve_by_key(key).await {
            Ok(account) => Ok(AuthenticatedAccount::new(account.id)),
            Err(GatewayError::NotFound { .. }) => {
                debug!("Rejected unknown API key");
                Err(GatewayError::Unauthenticated)
            }
            Err(e) => Err(e),
        }
    }
}
