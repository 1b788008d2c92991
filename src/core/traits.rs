//! Core trait for account persistence
//!
//! This module defines the [`AccountStore`] contract that the processing
//! core depends on. Concrete engines (relational, log-structured, document)
//! live outside the core; each must honor this contract identically. The
//! crate ships [`crate::core::InMemoryAccountStore`] as the reference
//! implementation.

use crate::types::{Account, BankingError};
use async_trait::async_trait;
use uuid::Uuid;

/// Durable account storage with conflict-detecting updates
///
/// Correctness across concurrently running process replicas rests entirely
/// on `update` behaving as a compare-and-swap: of two callers that loaded
/// the same account version, at most one update succeeds and the loser
/// observes [`BankingError::Conflict`] and must re-fetch before retrying.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch a snapshot of the account, including its current version token
    ///
    /// Performs no locking.
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::AccountNotFound`] if no record exists for
    /// `account_id`.
    async fn get_by_id(&self, account_id: Uuid) -> Result<Account, BankingError>;

    /// Atomically persist an updated account snapshot
    ///
    /// Must execute as one atomic unit:
    ///
    /// 1. Re-read the persisted version token for the account. Absent means
    ///    [`BankingError::AccountNotFound`]; present but different from the
    ///    snapshot's token means [`BankingError::Conflict`]. Only an update
    ///    built from the most recently observed state may proceed.
    /// 2. Durably insert each pending transaction as a new ledger row keyed
    ///    by transaction id. A uniqueness violation on this insert must be
    ///    reported as [`BankingError::DuplicateTransaction`] carrying the
    ///    offending id — this is the sole idempotency detector at the
    ///    storage boundary and must never surface as a generic storage
    ///    error.
    /// 3. Write the new balance and advance the version token to a
    ///    deterministically-different value.
    /// 4. Commit steps 1-3 together. On any failure after the gate check,
    ///    no partial effect (no subset of inserts, no balance change) may
    ///    remain visible.
    ///
    /// Returns a fresh snapshot carrying the new version token; the caller
    /// discards the instance it passed in.
    async fn update(&self, account: &Account) -> Result<Account, BankingError>;
}
