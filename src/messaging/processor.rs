//! The message processing loop
//!
//! [`MessageProcessor`] drives one fetch → parse → dispatch → finalize cycle
//! per call. Its job is reliability, not business logic: it keeps fetching
//! through empty queues and flaky peeks, hands parsed messages to a handler
//! that classifies its own failures, and resolves the resulting outcome
//! against the message source:
//!
//! - `Success` — acknowledge (remove from queue)
//! - `PermanentFailure` — move to the dead-letter destination
//! - `TransientFailure` — reschedule with exponential backoff, dead-letter
//!   once the backoff table is exhausted
//!
//! Backoff is enforced through the source's visibility mechanism rather
//! than an in-process wait, so a pending retry survives process restarts.
//! Cancellation is observed at the top of the fetch loop and inside every
//! delay; in-flight steps are never preempted mid-step.

use super::message::{Cancelled, EventMessage, ProcessingOutcome};
use super::source::MessageSource;
use crate::io::MessageParser;
use crate::types::BankingError;
use chrono::{Duration as TimeDelta, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Fixed retry backoff table, indexed by processing attempt
///
/// Attempts at or beyond the end of the table are dead-lettered.
const BACKOFF_SECONDS: [i64; 3] = [5, 25, 125];

/// Delay configuration for the fetch loop
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Sleep between peeks while the queue is empty
    pub no_message_delay: Duration,

    /// Sleep before retrying after a failed peek
    pub peek_retry_delay: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            no_message_delay: Duration::from_secs(10),
            peek_retry_delay: Duration::from_secs(5),
        }
    }
}

/// Backoff delay for a message with the given processing count
///
/// Attempts are clamped at zero for sources that report negative counts.
/// Returns `None` once the retry budget is exhausted, meaning the message
/// must be dead-lettered instead of rescheduled.
pub fn backoff_delay(processing_count: i32) -> Option<TimeDelta> {
    let attempt = processing_count.max(0) as usize;
    BACKOFF_SECONDS
        .get(attempt)
        .map(|seconds| TimeDelta::seconds(*seconds))
}

/// Drives single fetch/parse/dispatch/finalize cycles against a source
///
/// Generic over the parsed message type, mirroring the parser it is
/// constructed with.
pub struct MessageProcessor<T> {
    parser: Arc<dyn MessageParser<T>>,
    source: Arc<dyn MessageSource>,
    config: ProcessorConfig,
}

impl<T> MessageProcessor<T> {
    /// Create a processor over the given parser and message source
    pub fn new(
        parser: Arc<dyn MessageParser<T>>,
        source: Arc<dyn MessageSource>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            parser,
            source,
            config,
        }
    }

    /// Fetch, parse, dispatch, and finalize exactly one message
    ///
    /// Blocks (cancellably) until a message is available. The handler is
    /// expected to classify its own failures into an outcome; by
    /// construction only cancellation can escape it.
    ///
    /// # Errors
    ///
    /// - [`BankingError::Cancelled`] when shutdown was requested; the loop
    ///   must exit cleanly.
    /// - Any other error is a systemic finalization failure (the source
    ///   rejected acknowledge/reschedule/dead-letter); the caller decides
    ///   how to recover.
    pub async fn process_next<H, Fut>(
        &self,
        handler: H,
        on_parsing_failure: impl Fn() -> ProcessingOutcome,
        cancel: &CancellationToken,
    ) -> Result<(), BankingError>
    where
        H: Fn(T) -> Fut,
        Fut: Future<Output = Result<ProcessingOutcome, Cancelled>>,
    {
        let message = self.next_message(cancel).await?;
        let outcome = self
            .process_message(&message, handler, on_parsing_failure)
            .await?;
        self.finalize(outcome, &message).await
    }

    /// Fetching: poll the source until a message is available
    ///
    /// This loop is unbounded; it exits only with a message or through
    /// cancellation.
    async fn next_message(&self, cancel: &CancellationToken) -> Result<EventMessage, BankingError> {
        loop {
            if cancel.is_cancelled() {
                return Err(BankingError::Cancelled);
            }

            match self.source.peek().await {
                Ok(Some(message)) => return Ok(message),
                Ok(None) => {
                    info!(
                        delay_secs = self.config.no_message_delay.as_secs(),
                        "No messages to process; waiting"
                    );
                    self.sleep_cancellable(self.config.no_message_delay, cancel)
                        .await?;
                }
                Err(BankingError::Cancelled) => return Err(BankingError::Cancelled),
                Err(error) => {
                    warn!(
                        %error,
                        delay_secs = self.config.peek_retry_delay.as_secs(),
                        "Failed to receive message; retrying"
                    );
                    self.sleep_cancellable(self.config.peek_retry_delay, cancel)
                        .await?;
                }
            }
        }
    }

    /// Parsing and dispatching: resolve the message into an outcome
    async fn process_message<H, Fut>(
        &self,
        message: &EventMessage,
        handler: H,
        on_parsing_failure: impl Fn() -> ProcessingOutcome,
    ) -> Result<ProcessingOutcome, BankingError>
    where
        H: Fn(T) -> Fut,
        Fut: Future<Output = Result<ProcessingOutcome, Cancelled>>,
    {
        // An absent or blank body never reaches the parser.
        let body = match message.body.as_deref().filter(|b| !b.trim().is_empty()) {
            Some(body) => body,
            None => {
                let outcome = on_parsing_failure();
                warn!(
                    message_id = %message.id,
                    ?outcome,
                    "Message payload is null or empty; message will be marked accordingly"
                );
                return Ok(outcome);
            }
        };

        info!(message_id = %message.id, "Parsing message");

        let parsed = match self.parser.parse(body) {
            Ok(parsed) => parsed,
            Err(error) => {
                let outcome = on_parsing_failure();
                warn!(
                    message_id = %message.id,
                    %error,
                    ?outcome,
                    "Failed to parse the message payload; message will be marked accordingly"
                );
                return Ok(outcome);
            }
        };

        match handler(parsed).await {
            Ok(outcome) => Ok(outcome),
            Err(Cancelled) => Err(BankingError::Cancelled),
        }
    }

    /// Finalizing: act on the message source per the resolved outcome
    async fn finalize(
        &self,
        outcome: ProcessingOutcome,
        message: &EventMessage,
    ) -> Result<(), BankingError> {
        match outcome {
            ProcessingOutcome::Success => {
                self.source.acknowledge(message).await?;
                info!(message_id = %message.id, "Successfully processed message");
            }
            ProcessingOutcome::PermanentFailure => {
                self.source.dead_letter(message).await?;
                warn!(
                    message_id = %message.id,
                    "Permanent failure while processing message; moved to dead letter"
                );
            }
            ProcessingOutcome::TransientFailure => {
                self.reschedule_with_backoff(message).await?;
            }
        }
        Ok(())
    }

    async fn reschedule_with_backoff(&self, message: &EventMessage) -> Result<(), BankingError> {
        let attempt = message.processing_count.max(0);

        match backoff_delay(message.processing_count) {
            None => {
                warn!(
                    message_id = %message.id,
                    attempt,
                    "Maximum retry attempts reached; moving message to dead letter"
                );
                self.source.dead_letter(message).await
            }
            Some(delay) => {
                let visible_after = Utc::now() + delay;
                self.source.reschedule(message, visible_after).await?;
                info!(
                    message_id = %message.id,
                    %visible_after,
                    attempt = attempt + 1,
                    "Failed to process message; it will be retried"
                );
                Ok(())
            }
        }
    }

    async fn sleep_cancellable(
        &self,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), BankingError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(BankingError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
