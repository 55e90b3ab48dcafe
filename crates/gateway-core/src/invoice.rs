//! # Invoice Types
//!
//! The invoice entity, its status lifecycle, and the transient card input it is
//! created from.
//!
//! ```text
//!              process (amount <= 10000)
//!   Pending ───────────────────────────────▶ Approved | Rejected
//!      │
//!      └── update_status (only while Pending) ──▶ any status
//! ```

use crate::account::AccountId;
use crate::error::{GatewayError, GatewayResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of trailing card characters retained on an invoice
pub const CARD_DIGITS_KEPT: usize = 4;

/// Invoice identifier
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub Uuid);

impl InvoiceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for InvoiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Invoice status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Created, not decided yet (or parked for manual review)
    Pending,
    /// Charge accepted
    Approved,
    /// Charge declined
    Rejected,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Approved => "approved",
            InvoiceStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, InvoiceStatus::Pending)
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credit card data submitted with an invoice.
///
/// Transient input only: the invoice keeps the last four characters of the
/// number and nothing else. `Debug` never prints the number or the CVV.
#[derive(Clone, Deserialize)]
pub struct CreditCard {
    pub number: String,
    pub cvv: String,
    pub expiry_month: u32,
    pub expiry_year: u32,
    pub cardholder_name: String,
}

impl CreditCard {
    pub fn new(
        number: impl Into<String>,
        cvv: impl Into<String>,
        expiry_month: u32,
        expiry_year: u32,
        cardholder_name: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            cvv: cvv.into(),
            expiry_month,
            expiry_year,
            cardholder_name: cardholder_name.into(),
        }
    }

    /// Last four characters of the card number, or `InvalidCard` when the
    /// number is shorter than that.
    pub fn last_digits(&self) -> GatewayResult<String> {
        let count = self.number.chars().count();
        if count < CARD_DIGITS_KEPT {
            return Err(GatewayError::InvalidCard);
        }
        Ok(self
            .number
            .chars()
            .skip(count - CARD_DIGITS_KEPT)
            .collect())
    }
}

impl std::fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &"[redacted]")
            .field("cvv", &"[redacted]")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cardholder_name", &self.cardholder_name)
            .finish()
    }
}

/// A request to charge a fixed amount to a card.
///
/// Fields are private so that `amount > 0` and the status rules hold for the
/// whole life of the value. The serialized form is the public response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    id: InvoiceId,
    account_id: AccountId,
    amount: f64,
    status: InvoiceStatus,
    description: String,
    payment_type: String,
    card_last_digits: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a new pending invoice for `account_id`.
    pub fn new(
        account_id: AccountId,
        amount: f64,
        description: impl Into<String>,
        payment_type: impl Into<String>,
        card: &CreditCard,
    ) -> GatewayResult<Self> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(GatewayError::InvalidAmount);
        }
        let card_last_digits = card.last_digits()?;

        let now = Utc::now();
        Ok(Self {
            id: InvoiceId::new(),
            account_id,
            amount,
            status: InvoiceStatus::Pending,
            description: description.into(),
            payment_type: payment_type.into(),
            card_last_digits,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn payment_type(&self) -> &str {
        &self.payment_type
    }

    pub fn card_last_digits(&self) -> &str {
        &self.card_last_digits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, account_id: AccountId) -> bool {
        self.account_id == account_id
    }

    /// Explicit status change. Only a pending invoice may move; the new value
    /// itself is not checked, so pending -> pending is accepted and still
    /// refreshes `updated_at`.
    pub fn update_status(&mut self, new_status: InvoiceStatus) -> GatewayResult<()> {
        self.update_status_at(new_status, Utc::now())
    }

    pub(crate) fn update_status_at(
        &mut self,
        new_status: InvoiceStatus,
        at: DateTime<Utc>,
    ) -> GatewayResult<()> {
        if !self.status.is_pending() {
            return Err(GatewayError::InvalidStatusTransition {
                current: self.status,
            });
        }
        self.status = new_status;
        self.updated_at = at;
        Ok(())
    }

    /// Automatic decision taken by the processor
    pub(crate) fn resolve(&mut self, status: InvoiceStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at;
    }
}
