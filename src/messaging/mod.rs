//! Messaging module
//!
//! The reliability engine of the consumer:
//! - `message` - the message envelope and three-way processing outcome
//! - `source` - the peek-based message source contract and in-memory queue
//! - `processor` - the fetch/parse/dispatch/finalize loop with retry backoff

pub mod message;
pub mod processor;
pub mod source;

pub use message::{Cancelled, EventMessage, ProcessingOutcome};
pub use processor::{backoff_delay, MessageProcessor, ProcessorConfig};
pub use source::{InMemoryMessageSource, MessageSource};
