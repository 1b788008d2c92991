//! Core business logic module
//!
//! This module contains the transaction-application components:
//! - `traits` - the account store contract the core depends on
//! - `dispatcher` - transaction dispatch and outcome classification
//! - `memory_store` - in-memory reference implementation of the store contract

pub mod dispatcher;
pub mod memory_store;
pub mod traits;

pub use dispatcher::TransactionDispatcher;
pub use memory_store::InMemoryAccountStore;
pub use traits::AccountStore;
