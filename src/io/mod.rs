//! I/O module
//!
//! Wire-format handling for the transaction consumer. The [`MessageParser`]
//! trait turns a raw message body into a typed domain value; `json_parser`
//! provides the JSON implementation for the bank transaction wire format.

pub mod json_parser;

use crate::types::BankingError;

pub use json_parser::JsonTransactionParser;

/// Decodes a raw message body into a typed domain message
pub trait MessageParser<T>: Send + Sync {
    /// Parse the message body
    ///
    /// # Errors
    ///
    /// Returns [`BankingError::Parse`] or [`BankingError::Validation`] when
    /// the body is malformed; parse errors are permanent by classification.
    fn parse(&self, body: &str) -> Result<T, BankingError>;
}
