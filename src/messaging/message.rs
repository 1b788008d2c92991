//! Message envelope and processing outcome types
//!
//! An [`EventMessage`] is the raw envelope handed over by a message source:
//! an identifier, an optional text body, and the number of processing
//! attempts the source has already observed for it. The reliability loop
//! resolves every message into exactly one [`ProcessingOutcome`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raw message envelope delivered by a message source
///
/// Serializable so transports that persist envelopes (database outboxes,
/// file-backed queues) can round-trip them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    /// Source-assigned message identifier
    pub id: Uuid,

    /// Raw text payload; absent or empty bodies are treated as parse
    /// failures without invoking the parser
    pub body: Option<String>,

    /// Number of times the source has delivered this message for processing
    ///
    /// Used to index the retry backoff table. Sources that do not track
    /// attempts report zero.
    pub processing_count: i32,
}

impl EventMessage {
    /// Create a message envelope with a fresh identifier and zero attempts
    pub fn new(body: impl Into<String>) -> Self {
        EventMessage {
            id: Uuid::new_v4(),
            body: Some(body.into()),
            processing_count: 0,
        }
    }
}

/// The three-way result of processing one message
///
/// Every per-message failure is resolved into one of these values; the loop
/// itself never propagates per-message errors. Cancellation is the single
/// exception and is represented by [`Cancelled`], never by an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The message was processed successfully (or its effect was already
    /// durably applied by a prior delivery) and is removed from the queue
    Success,

    /// A transient failure; the message is rescheduled with exponential
    /// backoff, or dead-lettered once the retry budget is exhausted
    TransientFailure,

    /// A permanent failure; the message is moved to the dead-letter
    /// destination for manual remediation
    PermanentFailure,
}

/// Marker error carried when a shutdown request terminates processing
///
/// Handlers and the processing loop return this instead of an outcome when
/// cancellation is observed, so shutdown can never be mistaken for a
/// per-message failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("processing cancelled")]
pub struct Cancelled;
