//! Error types for the transaction consumer
//!
//! This module defines the single error taxonomy that every fallible
//! operation in the crate returns. Each variant carries a fixed retry
//! semantic that the dispatcher maps to a processing outcome exactly once:
//!
//! - **Validation / Parse**: the input is structurally wrong; retrying cannot
//!   help (permanent).
//! - **AccountNotFound**: the referenced account is absent; requires operator
//!   intervention (permanent).
//! - **Conflict**: an optimistic-concurrency collision; re-fetching and
//!   retrying is expected to succeed (transient).
//! - **DuplicateTransaction**: the transaction is already durably recorded;
//!   re-delivery is a safe no-op (treated as success, not a failure).
//! - **Storage**: anything else raised by a backing store; transient by
//!   default so a transaction is never silently dropped.
//! - **Cancelled**: shutdown was observed mid-operation; this variant is
//!   never classified into an outcome and always terminates processing.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for the transaction consumer
///
/// This enum represents all possible errors that can occur while fetching,
/// parsing, applying, and persisting transactions. Variants are explicit
/// tagged values so classification is an exhaustive `match`, never runtime
/// type inspection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankingError {
    /// Malformed input or a domain rule violation
    ///
    /// Covers invalid amounts, mismatched account ids, and duplicate ids in
    /// an account's in-memory pending set. Permanent: the message will be
    /// dead-lettered.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the violated rule
        message: String,
    },

    /// A message body that could not be decoded into a transaction
    ///
    /// Same retry semantics as [`BankingError::Validation`]: the payload is
    /// structurally wrong and retrying cannot help.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the decoding failure
        message: String,
    },

    /// The referenced account does not exist in the store
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// The account id that could not be resolved
        account_id: Uuid,
    },

    /// Another writer updated the account since it was read
    ///
    /// Raised by the store's compare-and-swap gate when the persisted
    /// version token no longer matches the snapshot's token. The caller must
    /// re-fetch before retrying.
    #[error("Account {account_id} was modified by another process")]
    Conflict {
        /// The account whose version token went stale
        account_id: Uuid,
    },

    /// The transaction id is already durably recorded in the ledger
    ///
    /// This is the idempotency detector: it means the desired effect already
    /// happened on a prior delivery, so re-delivery completes as success.
    #[error("Transaction {transaction_id} already exists")]
    DuplicateTransaction {
        /// The transaction id that collided with an existing ledger row
        transaction_id: Uuid,
    },

    /// A shutdown request was observed while an operation was in flight
    ///
    /// Propagates unmodified through every layer and terminates the
    /// processing loop. Never reclassified as a transient or permanent
    /// failure.
    #[error("Operation cancelled")]
    Cancelled,

    /// Any other failure raised by a message source or account store
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the underlying failure
        message: String,
    },
}

// Helper functions for creating common errors

impl BankingError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BankingError::Validation {
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        BankingError::Parse {
            message: message.into(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: Uuid) -> Self {
        BankingError::AccountNotFound { account_id }
    }

    /// Create a Conflict error
    pub fn conflict(account_id: Uuid) -> Self {
        BankingError::Conflict { account_id }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(transaction_id: Uuid) -> Self {
        BankingError::DuplicateTransaction { transaction_id }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        BankingError::Storage {
            message: message.into(),
        }
    }
}

// Conversion from serde_json::Error to BankingError
impl From<serde_json::Error> for BankingError {
    fn from(error: serde_json::Error) -> Self {
        BankingError::Parse {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        BankingError::validation("Amount must be greater than zero."),
        "Validation error: Amount must be greater than zero."
    )]
    #[case::parse(
        BankingError::parse("unexpected end of input"),
        "Parse error: unexpected end of input"
    )]
    #[case::cancelled(BankingError::Cancelled, "Operation cancelled")]
    #[case::storage(
        BankingError::storage("connection reset"),
        "Storage error: connection reset"
    )]
    fn test_error_display(#[case] error: BankingError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_account_not_found_display_includes_id() {
        let id = Uuid::new_v4();
        let error = BankingError::account_not_found(id);
        assert_eq!(error.to_string(), format!("Account {} not found", id));
    }

    #[test]
    fn test_duplicate_transaction_display_includes_id() {
        let id = Uuid::new_v4();
        let error = BankingError::duplicate_transaction(id);
        assert_eq!(
            error.to_string(),
            format!("Transaction {} already exists", id)
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: BankingError = json_error.into();
        assert!(matches!(error, BankingError::Parse { .. }));
    }
}
