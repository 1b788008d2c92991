//! Transaction-related types for the transaction consumer
//!
//! This module defines the immutable [`Transaction`] value and its
//! classification enums. A `Transaction` describes exactly one credit or
//! debit against one account and is self-validating: construction either
//! yields a value satisfying every validity rule or fails immediately with
//! a validation error. No partially-valid instance can exist.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use super::error::BankingError;
use uuid::Uuid;

/// Direction of a balance mutation
///
/// Credit adds the transaction amount to the balance; Debit subtracts it.
/// These are the only two paths through which a balance ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionDirection {
    /// Add funds to the account balance
    Credit,

    /// Remove funds from the account balance
    Debit,
}

/// Business classification of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// An ordinary customer-originated transaction
    Regular,

    /// A correction produced by a reconciliation process
    Reconciliation,
}

/// Immutable description of a single credit or debit
///
/// Values are constructed only through [`Transaction::new`], which enforces:
///
/// - `id` is a non-nil UUID
/// - `account_id` is a non-nil UUID
/// - `amount` is strictly positive
///
/// Fields are private behind read-only accessors so a constructed instance
/// can never drift out of its validated state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Globally unique transaction identifier
    id: Uuid,

    /// The account this transaction applies to
    account_id: Uuid,

    /// Strictly positive transaction amount
    amount: Decimal,

    /// Business classification (regular or reconciliation)
    kind: TransactionKind,

    /// Whether the amount is credited or debited
    direction: TransactionDirection,

    /// When the transaction was observed by this process
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new validated transaction
    ///
    /// # Arguments
    ///
    /// * `id` - Globally unique transaction identifier (must be non-nil)
    /// * `account_id` - The target account (must be non-nil)
    /// * `amount` - The transaction amount (must be strictly positive)
    /// * `kind` - Business classification
    /// * `direction` - Credit or debit
    /// * `timestamp` - When the transaction was observed
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Validation`] if `id` or `account_id` is the
    /// nil UUID, or if `amount` is zero or negative.
    pub fn new(
        id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        kind: TransactionKind,
        direction: TransactionDirection,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, BankingError> {
        if id.is_nil() {
            return Err(BankingError::validation("Transaction ID cannot be empty."));
        }

        if account_id.is_nil() {
            return Err(BankingError::validation("Account ID cannot be empty."));
        }

        if amount <= Decimal::ZERO {
            return Err(BankingError::validation(
                "Transaction amount must be a positive value greater than zero.",
            ));
        }

        Ok(Transaction {
            id,
            account_id,
            amount,
            kind,
            direction,
            timestamp,
        })
    }

    /// The globally unique transaction identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The account this transaction applies to
    pub fn account_id(&self) -> Uuid {
        self.account_id
    }

    /// The strictly positive transaction amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Business classification of the transaction
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Whether the amount is credited or debited
    pub fn direction(&self) -> TransactionDirection {
        self.direction
    }

    /// When the transaction was observed by this process
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn build(
        id: Uuid,
        account_id: Uuid,
        amount: Decimal,
    ) -> Result<Transaction, BankingError> {
        Transaction::new(
            id,
            account_id,
            amount,
            TransactionKind::Regular,
            TransactionDirection::Credit,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_returns_validated_transaction() {
        let id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let amount = Decimal::new(10050, 2);

        let tx = build(id, account_id, amount).expect("transaction should be valid");

        assert_eq!(tx.id(), id);
        assert_eq!(tx.account_id(), account_id);
        assert_eq!(tx.amount(), amount);
        assert_eq!(tx.kind(), TransactionKind::Regular);
        assert_eq!(tx.direction(), TransactionDirection::Credit);
    }

    #[test]
    fn test_new_rejects_nil_transaction_id() {
        let result = build(Uuid::nil(), Uuid::new_v4(), Decimal::ONE);
        assert_eq!(
            result,
            Err(BankingError::validation("Transaction ID cannot be empty."))
        );
    }

    #[test]
    fn test_new_rejects_nil_account_id() {
        let result = build(Uuid::new_v4(), Uuid::nil(), Decimal::ONE);
        assert_eq!(
            result,
            Err(BankingError::validation("Account ID cannot be empty."))
        );
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-10050, 2))]
    fn test_new_rejects_non_positive_amount(#[case] amount: Decimal) {
        let result = build(Uuid::new_v4(), Uuid::new_v4(), amount);
        assert_eq!(
            result,
            Err(BankingError::validation(
                "Transaction amount must be a positive value greater than zero."
            ))
        );
    }
}
