//! JSON parser for the bank transaction wire format
//!
//! Consumes payloads of the shape:
//!
//! ```json
//! { "id": "<uuid>", "messageType": "credit", "bankAccountId": "<uuid>", "amount": 100.00 }
//! ```
//!
//! Field names are matched case-insensitively and `amount` may be a JSON
//! number or a numeric string. The wire format carries no timestamp, so the
//! resulting transaction is stamped with the current processing time and a
//! fixed `Regular` classification.

use super::MessageParser;
use crate::types::{BankingError, Transaction, TransactionDirection, TransactionKind};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use uuid::Uuid;

/// Parser for JSON-encoded bank transaction messages
#[derive(Debug, Default, Clone)]
pub struct JsonTransactionParser;

impl JsonTransactionParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Look up an object field by case-insensitive name
    fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, BankingError> {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .ok_or_else(|| BankingError::parse(format!("Missing required field: {name}")))
    }

    fn uuid_field(object: &Map<String, Value>, name: &str) -> Result<Uuid, BankingError> {
        let value = Self::field(object, name)?;
        let text = value
            .as_str()
            .ok_or_else(|| BankingError::parse(format!("Field {name} must be a UUID string")))?;
        Uuid::parse_str(text)
            .map_err(|_| BankingError::parse(format!("Field {name} is not a valid UUID: {text}")))
    }

    fn string_field(object: &Map<String, Value>, name: &str) -> Result<String, BankingError> {
        let value = Self::field(object, name)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| BankingError::parse(format!("Field {name} must be a string")))
    }

    /// Read a decimal amount from either a JSON number or a numeric string
    fn decimal_field(object: &Map<String, Value>, name: &str) -> Result<Decimal, BankingError> {
        let value = Self::field(object, name)?;

        let text = match value {
            Value::Number(number) => number.to_string(),
            Value::String(text) => text.trim().to_owned(),
            _ => {
                return Err(BankingError::parse(format!(
                    "Field {name} must be a number or numeric string"
                )))
            }
        };

        Decimal::from_str(&text)
            .map_err(|_| BankingError::parse(format!("Field {name} is not a valid amount: {text}")))
    }
}

impl MessageParser<Transaction> for JsonTransactionParser {
    fn parse(&self, body: &str) -> Result<Transaction, BankingError> {
        if body.trim().is_empty() {
            return Err(BankingError::parse("Message cannot be null or empty."));
        }

        let value: Value = serde_json::from_str(body)?;
        let object = value
            .as_object()
            .ok_or_else(|| BankingError::parse("Transaction message is not in the expected format."))?;

        let id = Self::uuid_field(object, "id")?;
        let account_id = Self::uuid_field(object, "bankAccountId")?;
        let amount = Self::decimal_field(object, "amount")?;
        let message_type = Self::string_field(object, "messageType")?;

        let direction = match message_type.trim().to_ascii_lowercase().as_str() {
            "credit" => TransactionDirection::Credit,
            "debit" => TransactionDirection::Debit,
            _ => {
                return Err(BankingError::validation(format!(
                    "Unknown transaction type: {message_type}"
                )))
            }
        };

        // The wire format carries no timestamp; stamp with processing time.
        Transaction::new(
            id,
            account_id,
            amount,
            TransactionKind::Regular,
            direction,
            Utc::now(),
        )
    }
}
