//! Application loop tying the processor to the transaction dispatcher
//!
//! [`BankingApplication`] runs the fetch/parse/dispatch/finalize cycle for
//! the lifetime of the process. Per-message retry policy lives inside the
//! processor; this outer loop only isolates systemic failures (for example
//! source connectivity loss during finalization): it logs them and backs
//! off for a fixed delay before trying the whole cycle again. Cancellation
//! exits the loop cleanly.

use crate::core::TransactionDispatcher;
use crate::messaging::{MessageProcessor, ProcessingOutcome};
use crate::types::{BankingError, Transaction};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Delay before retrying the cycle after an unexpected systemic failure
const UNKNOWN_FAILURE_DELAY: Duration = Duration::from_secs(10);

/// Long-running consumer application
pub struct BankingApplication {
    processor: MessageProcessor<Transaction>,
    dispatcher: TransactionDispatcher,
}

impl BankingApplication {
    /// Create the application over a processor and dispatcher
    pub fn new(processor: MessageProcessor<Transaction>, dispatcher: TransactionDispatcher) -> Self {
        Self {
            processor,
            dispatcher,
        }
    }

    /// Process messages until cancellation is requested
    ///
    /// Unparseable payloads are marked as permanent failures. The loop has
    /// no other terminal state: per-message failures are resolved by the
    /// processor, and systemic failures are retried after a fixed delay.
    pub async fn run(&self, cancel: CancellationToken) {
        info!("Starting message processing");

        while !cancel.is_cancelled() {
            let result = self
                .processor
                .process_next(
                    |transaction| self.dispatcher.dispatch(transaction),
                    || ProcessingOutcome::PermanentFailure,
                    &cancel,
                )
                .await;

            match result {
                Ok(()) => {}
                Err(BankingError::Cancelled) => break,
                Err(err) => {
                    error!(
                        error = %err,
                        delay_secs = UNKNOWN_FAILURE_DELAY.as_secs(),
                        "An unexpected error occurred during message processing; retrying"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(UNKNOWN_FAILURE_DELAY) => {}
                    }
                }
            }
        }

        info!("Message processing was cancelled");
    }
}
