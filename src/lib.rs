//! Bank Transaction Consumer Library
//! # Overview
//!
//! This library provides a durable, at-least-once consumer that applies
//! financial transactions from a message queue to account balances. The
//! design only guarantees idempotent at-least-once processing: messages may
//! be delivered more than once, and re-delivery of an already-applied
//! transaction completes as a safe no-op.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account aggregate, Transaction value, error taxonomy)
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - the account store contract (compare-and-swap update)
//!   - [`core::dispatcher`] - applies one transaction and classifies failures
//!   - [`core::memory_store`] - in-memory reference store implementation
//! - [`messaging`] - The reliability engine:
//!   - [`messaging::processor`] - the fetch/parse/dispatch/finalize loop
//!   - [`messaging::source`] - the peek-based message source contract
//! - [`io`] - Wire-format parsing (JSON transaction messages)
//! - [`app`] - The outer application loop with a systemic-failure guard
//! - [`cli`] - CLI argument parsing
//!
//! # Processing Outcomes
//!
//! Every message resolves to one of three outcomes:
//!
//! - **Success**: acknowledged and removed from the queue (including
//!   idempotent replays of already-recorded transactions)
//! - **TransientFailure**: rescheduled with exponential backoff (5s, 25s,
//!   125s), then dead-lettered once the budget is exhausted
//! - **PermanentFailure**: moved to the dead-letter destination for manual
//!   remediation
//!
//! # Concurrency Model
//!
//! A single sequential worker processes one message at a time. Multiple
//! process replicas may run against the same queue and store; correctness
//! across replicas rests entirely on the store's compare-and-swap update,
//! not on any in-process lock.

// Module declarations
pub mod app;
pub mod cli;
pub mod core;
pub mod io;
pub mod messaging;
pub mod types;

pub use app::BankingApplication;
pub use core::{AccountStore, InMemoryAccountStore, TransactionDispatcher};
pub use io::{JsonTransactionParser, MessageParser};
pub use messaging::{
    Cancelled, EventMessage, InMemoryMessageSource, MessageProcessor, MessageSource,
    ProcessingOutcome, ProcessorConfig,
};
pub use types::{Account, BankingError, Transaction, TransactionDirection, TransactionKind};
