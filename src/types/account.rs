//! Account aggregate for the transaction consumer
//!
//! This module defines the [`Account`] aggregate, the in-memory domain
//! object that enforces balance invariants and transaction idempotency at
//! the object level.
//!
//! # Lifecycle
//!
//! An account instance is created by the store on fetch (a snapshot of the
//! persisted state plus the version token at read time), mutated in-process
//! by applying exactly one transaction, handed back to the store for a
//! single atomic persist, and then discarded. The store returns a fresh
//! snapshot carrying the new version token rather than the mutated instance.
//!
//! The instance is exclusively owned by the call that fetched it; it is
//! never shared across concurrent operations.

use super::error::BankingError;
use super::transaction::{Transaction, TransactionDirection};
use rust_decimal::Decimal;
use uuid::Uuid;

/// In-memory account state with pending, not-yet-persisted transactions
///
/// Balance changes only through [`Account::apply_transaction`] (or the
/// underlying [`Account::credit`] / [`Account::debit`] operations) — never
/// by any other path. The pending list is append-only within the instance's
/// lifetime and starts empty at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The account identity (immutable)
    id: Uuid,

    /// The current balance, including applied pending transactions
    balance: Decimal,

    /// Opaque concurrency stamp observed at fetch time
    ///
    /// Immutable on a given instance; a new token is obtained only by
    /// re-fetching from the store. The store's update operation rejects the
    /// instance if the persisted token no longer matches this value.
    version: Vec<u8>,

    /// Transactions applied to this instance but not yet persisted
    pending_transactions: Vec<Transaction>,
}

impl Account {
    /// Create an account snapshot as read from the store
    ///
    /// # Arguments
    ///
    /// * `id` - The account identity
    /// * `balance` - The persisted balance at read time
    /// * `version` - The persisted version token at read time
    pub fn new(id: Uuid, balance: Decimal, version: Vec<u8>) -> Self {
        Account {
            id,
            balance,
            version,
            pending_transactions: Vec::new(),
        }
    }

    /// The account identity
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current balance, including applied pending transactions
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// The version token observed when this snapshot was read
    pub fn version(&self) -> &[u8] {
        &self.version
    }

    /// Transactions applied to this instance but not yet persisted
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending_transactions
    }

    /// Add funds to the balance
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Validation`] if `amount` is zero or negative;
    /// the balance is left unchanged.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), BankingError> {
        Self::ensure_positive(amount)?;
        self.balance += amount;
        Ok(())
    }

    /// Remove funds from the balance
    ///
    /// The resulting balance is allowed to go negative: overdraft protection
    /// is not enforced here.
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Validation`] if `amount` is zero or negative;
    /// the balance is left unchanged.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), BankingError> {
        Self::ensure_positive(amount)?;
        self.balance -= amount;
        Ok(())
    }

    /// Apply a transaction to this account
    ///
    /// Appends the transaction to the pending list, then mutates the balance
    /// per the transaction's direction. The append happens first so the
    /// pending list and balance are always consistent as of the moment of
    /// the call.
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Validation`] if:
    /// - the transaction's account id does not match this account
    /// - a transaction with the same id is already in the pending list
    ///
    /// On error, neither the balance nor the pending list is mutated.
    pub fn apply_transaction(&mut self, transaction: Transaction) -> Result<(), BankingError> {
        if transaction.account_id() != self.id {
            return Err(BankingError::validation(
                "Transaction does not belong to this account.",
            ));
        }

        if self
            .pending_transactions
            .iter()
            .any(|t| t.id() == transaction.id())
        {
            return Err(BankingError::validation(
                "Transaction with the same ID already exists in pending transactions.",
            ));
        }

        let amount = transaction.amount();
        let direction = transaction.direction();

        self.pending_transactions.push(transaction);

        // The amount was validated positive at construction, so credit/debit
        // cannot fail here and the pending list stays consistent with the
        // balance.
        match direction {
            TransactionDirection::Credit => self.credit(amount),
            TransactionDirection::Debit => self.debit(amount),
        }
    }

    fn ensure_positive(amount: Decimal) -> Result<(), BankingError> {
        if amount <= Decimal::ZERO {
            return Err(BankingError::validation(
                "Amount must be greater than zero.",
            ));
        }
        Ok(())
    }
}
