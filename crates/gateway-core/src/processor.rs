//! # Invoice Processor
//!
//! Decides the outcome of a freshly created invoice.
//!
//! Invoices above [`MANUAL_REVIEW_LIMIT`] stay pending. Everything else is
//! approved when one uniform sample in `[0, 1)` is at most
//! [`APPROVAL_THRESHOLD`], rejected otherwise.
//!
//! The sample comes from a [`RandomSource`] so callers choose between the
//! thread RNG, a seeded RNG, or a fixed value.

use crate::invoice::{Invoice, InvoiceStatus};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Amounts strictly above this are left pending
pub const MANUAL_REVIEW_LIMIT: f64 = 10_000.0;

/// Samples at or below this approve the invoice
pub const APPROVAL_THRESHOLD: f64 = 0.7;

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Type alias for a shared random source (dynamic dispatch)
pub type SharedRandomSource = Arc<dyn RandomSource>;

/// Thread-local RNG, seeded from the OS
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic RNG for reproducible runs
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn sample(&self) -> f64 {
        // A panic while holding the lock cannot leave StdRng half-updated.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }
}

/// Always returns the same sample
#[derive(Debug, Clone, Copy)]
pub struct FixedSample(pub f64);

impl RandomSource for FixedSample {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Outcome for `amount` given a sampler. `None` means the invoice stays
/// pending and no sample is drawn.
pub fn decide(amount: f64, sample: impl FnOnce() -> f64) -> Option<InvoiceStatus> {
    if amount > MANUAL_REVIEW_LIMIT {
        return None;
    }
    if sample() <= APPROVAL_THRESHOLD {
        Some(InvoiceStatus::Approved)
    } else {
        Some(InvoiceStatus::Rejected)
    }
}

/// Applies [`decide`] to invoices using an injected random source
#[derive(Clone)]
pub struct InvoiceProcessor {
    source: SharedRandomSource,
}

impl InvoiceProcessor {
    pub fn new(source: SharedRandomSource) -> Self {
        Self { source }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Arc::new(SeededRandom::new(seed)))
    }

    /// Resolve a pending invoice in place. Large invoices are left untouched,
    /// `updated_at` included.
    pub fn process(&self, invoice: &mut Invoice) {
        self.process_at(invoice, Utc::now());
    }

    /// [`process`](Self::process) with an explicit decision time.
    pub fn process_at(&self, invoice: &mut Invoice, at: DateTime<Utc>) {
        if let Some(status) = decide(invoice.amount(), || self.source.sample()) {
            invoice.resolve(status, at);
        }
    }
}

impl Default for InvoiceProcessor {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl std::fmt::Debug for InvoiceProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceProcessor").finish_non_exhaustive()
    }
}
