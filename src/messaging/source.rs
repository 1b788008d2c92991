//! Message source contract and in-memory implementation
//!
//! A [`MessageSource`] is a peek-based queue: `peek` hands out the next
//! visible message, and the caller finalizes it with exactly one of
//! `acknowledge`, `reschedule`, or `dead_letter`. Retry backoff is enforced
//! through the `visible_after` timestamp passed to `reschedule`, so a delay
//! survives process restarts instead of living in an in-process wait.
//!
//! [`InMemoryMessageSource`] is the reference implementation used by tests
//! and the demo binary; real transports (service-bus queues, database
//! outboxes) plug in behind the same trait.

use super::message::EventMessage;
use crate::types::BankingError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

/// Peek-based message queue contract
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Return the next visible message, if any
    ///
    /// A returned message is considered in flight and must be finalized by
    /// the caller with one of the other three operations.
    async fn peek(&self) -> Result<Option<EventMessage>, BankingError>;

    /// Complete a message, removing it from the queue permanently
    async fn acknowledge(&self, message: &EventMessage) -> Result<(), BankingError>;

    /// Return a message to the queue, invisible until `visible_after`
    ///
    /// The source increments the message's processing count.
    async fn reschedule(
        &self,
        message: &EventMessage,
        visible_after: DateTime<Utc>,
    ) -> Result<(), BankingError>;

    /// Move a message to the dead-letter destination for manual remediation
    async fn dead_letter(&self, message: &EventMessage) -> Result<(), BankingError>;
}

/// A queued message plus the point in time it becomes visible
#[derive(Debug, Clone)]
struct QueuedMessage {
    message: EventMessage,
    visible_after: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SourceState {
    queue: VecDeque<QueuedMessage>,
    dead_letters: Vec<EventMessage>,
    acknowledged: Vec<EventMessage>,
}

/// Thread-safe in-memory message source with visibility-based scheduling
///
/// `peek` pops the earliest message whose `visible_after` has passed;
/// rescheduled messages re-enter the queue with an incremented processing
/// count. Dead-lettered and acknowledged messages are retained for
/// inspection by tests and the demo binary.
#[derive(Debug, Default)]
pub struct InMemoryMessageSource {
    state: Mutex<SourceState>,
}

impl InMemoryMessageSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a message, immediately visible
    pub fn enqueue(&self, message: EventMessage) {
        let mut state = self.state.lock().expect("source mutex poisoned");
        state.queue.push_back(QueuedMessage {
            message,
            visible_after: Utc::now(),
        });
    }

    /// Number of messages currently queued (visible or not)
    pub fn queued_len(&self) -> usize {
        let state = self.state.lock().expect("source mutex poisoned");
        state.queue.len()
    }

    /// Messages moved to the dead-letter destination, in order
    pub fn dead_letters(&self) -> Vec<EventMessage> {
        let state = self.state.lock().expect("source mutex poisoned");
        state.dead_letters.clone()
    }

    /// Messages acknowledged as successfully processed, in order
    pub fn acknowledged(&self) -> Vec<EventMessage> {
        let state = self.state.lock().expect("source mutex poisoned");
        state.acknowledged.clone()
    }

    /// The visibility time of a queued message, if it is queued
    pub fn visible_after(&self, message_id: Uuid) -> Option<DateTime<Utc>> {
        let state = self.state.lock().expect("source mutex poisoned");
        state
            .queue
            .iter()
            .find(|queued| queued.message.id == message_id)
            .map(|queued| queued.visible_after)
    }
}

#[async_trait]
impl MessageSource for InMemoryMessageSource {
    async fn peek(&self) -> Result<Option<EventMessage>, BankingError> {
        let mut state = self.state.lock().expect("source mutex poisoned");
        let now = Utc::now();

        let position = state
            .queue
            .iter()
            .position(|queued| queued.visible_after <= now);

        Ok(position
            .and_then(|index| state.queue.remove(index))
            .map(|queued| queued.message))
    }

    async fn acknowledge(&self, message: &EventMessage) -> Result<(), BankingError> {
        let mut state = self.state.lock().expect("source mutex poisoned");
        state.acknowledged.push(message.clone());
        Ok(())
    }

    async fn reschedule(
        &self,
        message: &EventMessage,
        visible_after: DateTime<Utc>,
    ) -> Result<(), BankingError> {
        let mut state = self.state.lock().expect("source mutex poisoned");
        let mut retried = message.clone();
        retried.processing_count += 1;
        state.queue.push_back(QueuedMessage {
            message: retried,
            visible_after,
        });
        Ok(())
    }

    async fn dead_letter(&self, message: &EventMessage) -> Result<(), BankingError> {
        let mut state = self.state.lock().expect("source mutex poisoned");
        state.dead_letters.push(message.clone());
        Ok(())
    }
}
