//! In-memory reference implementation of the account store contract
//!
//! This module provides [`InMemoryAccountStore`], an implementation of
//! [`AccountStore`] backed by process memory. It exists so the dispatcher
//! and processing loop can be exercised end to end without an external
//! database, and it serves as the executable specification of the
//! compare-and-swap update contract that any real backing engine must
//! honor identically.
//!
//! # Atomicity
//!
//! A single mutex guards both the account records and the transaction
//! ledger, so the version gate check, ledger inserts, balance write, and
//! token advance commit as one critical section. Nothing is awaited while
//! the lock is held.

use super::traits::AccountStore;
use crate::types::{Account, BankingError, Transaction};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Persisted account record: balance plus the current version token
#[derive(Debug, Clone)]
struct AccountRecord {
    balance: Decimal,
    version: u64,
}

/// Shared mutable state behind the store mutex
#[derive(Debug, Default)]
struct StoreState {
    /// Account records keyed by account id
    accounts: HashMap<Uuid, AccountRecord>,

    /// Transaction ledger keyed by transaction id
    ///
    /// The key uniqueness of this map is the replay detector: an insert
    /// against an existing key is reported as a duplicate transaction.
    ledger: HashMap<Uuid, Transaction>,
}

/// Thread-safe in-memory account store with optimistic concurrency
///
/// Version tokens are a monotonically increasing counter encoded as
/// big-endian bytes, so every successful update produces a
/// deterministically-different token.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    state: Mutex<StoreState>,
}

impl InMemoryAccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account record directly, bypassing the update contract
    ///
    /// Intended for seeding initial state in tests and demos. The account
    /// starts at version 1.
    pub fn seed_account(&self, account_id: Uuid, balance: Decimal) {
        let mut state = self.state.lock().expect("store mutex poisoned");
        state
            .accounts
            .insert(account_id, AccountRecord { balance, version: 1 });
    }

    /// Number of rows currently in the transaction ledger
    pub fn ledger_len(&self) -> usize {
        let state = self.state.lock().expect("store mutex poisoned");
        state.ledger.len()
    }

    /// Whether the ledger contains a row for the given transaction id
    pub fn ledger_contains(&self, transaction_id: Uuid) -> bool {
        let state = self.state.lock().expect("store mutex poisoned");
        state.ledger.contains_key(&transaction_id)
    }

    fn encode_version(version: u64) -> Vec<u8> {
        version.to_be_bytes().to_vec()
    }

    fn decode_version(bytes: &[u8]) -> Option<u64> {
        let bytes: [u8; 8] = bytes.try_into().ok()?;
        Some(u64::from_be_bytes(bytes))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_by_id(&self, account_id: Uuid) -> Result<Account, BankingError> {
        let state = self.state.lock().expect("store mutex poisoned");

        let record = state
            .accounts
            .get(&account_id)
            .ok_or_else(|| BankingError::account_not_found(account_id))?;

        Ok(Account::new(
            account_id,
            record.balance,
            Self::encode_version(record.version),
        ))
    }

    async fn update(&self, account: &Account) -> Result<Account, BankingError> {
        let mut state = self.state.lock().expect("store mutex poisoned");

        // Gate: only an update built from the most recently observed state
        // may proceed.
        let current_version = state
            .accounts
            .get(&account.id())
            .map(|record| record.version)
            .ok_or_else(|| BankingError::account_not_found(account.id()))?;

        if Self::decode_version(account.version()) != Some(current_version) {
            return Err(BankingError::conflict(account.id()));
        }

        // Check the whole pending batch against the ledger before touching
        // anything. The first duplicate aborts the entire update with no
        // partial inserts and no balance change.
        for transaction in account.pending_transactions() {
            if state.ledger.contains_key(&transaction.id()) {
                return Err(BankingError::duplicate_transaction(transaction.id()));
            }
        }

        for transaction in account.pending_transactions() {
            state.ledger.insert(transaction.id(), transaction.clone());
        }

        let new_version = current_version + 1;
        state.accounts.insert(
            account.id(),
            AccountRecord {
                balance: account.balance(),
                version: new_version,
            },
        );

        Ok(Account::new(
            account.id(),
            account.balance(),
            Self::encode_version(new_version),
        ))
    }
}
