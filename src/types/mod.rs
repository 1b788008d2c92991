//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the account aggregate and its invariants
//! - `transaction`: the immutable transaction value and its enums
//! - `error`: the error taxonomy for the transaction consumer

pub mod account;
pub mod error;
pub mod transaction;

pub use account::Account;
pub use error::BankingError;
pub use transaction::{Transaction, TransactionDirection, TransactionKind};
