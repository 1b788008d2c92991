//! Transaction dispatch and outcome classification
//!
//! The [`TransactionDispatcher`] applies one parsed transaction to one
//! account via the [`AccountStore`] and translates every failure along that
//! path into a three-way [`ProcessingOutcome`]. This is the single boundary
//! where domain and store errors are classified; nothing below it leaks
//! technology-specific errors upward, and nothing above it re-inspects
//! errors.
//!
//! Cancellation is the one exception: [`BankingError::Cancelled`] is never
//! mapped to an outcome and surfaces as [`Cancelled`] so the processing loop
//! terminates.

use super::traits::AccountStore;
use crate::messaging::{Cancelled, ProcessingOutcome};
use crate::types::{BankingError, Transaction};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Applies transactions to accounts and classifies the result
pub struct TransactionDispatcher {
    account_store: Arc<dyn AccountStore>,
}

impl TransactionDispatcher {
    /// Create a dispatcher over the given account store
    pub fn new(account_store: Arc<dyn AccountStore>) -> Self {
        Self { account_store }
    }

    /// Apply one transaction to its account and classify the result
    ///
    /// Fetches the account by the transaction's account id, applies the
    /// transaction in memory, and persists through the store's atomic
    /// update. All three steps share one classification.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] only when a store operation observed a shutdown
    /// request; every other failure becomes an `Ok` outcome.
    pub async fn dispatch(&self, transaction: Transaction) -> Result<ProcessingOutcome, Cancelled> {
        let transaction_id = transaction.id();

        match self.process(transaction).await {
            Ok(()) => {
                info!(%transaction_id, "Successfully processed transaction");
                Ok(ProcessingOutcome::Success)
            }
            Err(error) => Self::classify(error, transaction_id),
        }
    }

    async fn process(&self, transaction: Transaction) -> Result<(), BankingError> {
        let mut account = self.account_store.get_by_id(transaction.account_id()).await?;

        account.apply_transaction(transaction)?;

        self.account_store.update(&account).await?;
        Ok(())
    }

    /// The single exhaustive mapping from error variant to outcome
    fn classify(
        error: BankingError,
        transaction_id: uuid::Uuid,
    ) -> Result<ProcessingOutcome, Cancelled> {
        match error {
            BankingError::DuplicateTransaction { .. } => {
                info!(
                    %transaction_id,
                    "Duplicate transaction detected; it is already applied and will be completed without further processing"
                );
                Ok(ProcessingOutcome::Success)
            }
            BankingError::Validation { .. } | BankingError::Parse { .. } => {
                warn!(
                    %transaction_id,
                    %error,
                    "Validation error while processing transaction; it will be moved to dead letter"
                );
                Ok(ProcessingOutcome::PermanentFailure)
            }
            BankingError::AccountNotFound { .. } => {
                warn!(
                    %transaction_id,
                    %error,
                    "Account not found while processing transaction; it will be moved to dead letter"
                );
                Ok(ProcessingOutcome::PermanentFailure)
            }
            BankingError::Conflict { .. } => {
                warn!(
                    %transaction_id,
                    "Concurrent update conflict while processing transaction; it will be processed again later"
                );
                Ok(ProcessingOutcome::TransientFailure)
            }
            BankingError::Cancelled => Err(Cancelled),
            BankingError::Storage { .. } => {
                error!(
                    %transaction_id,
                    %error,
                    "Unexpected storage error; transaction will be processed again later"
                );
                Ok(ProcessingOutcome::TransientFailure)
            }
        }
    }
}
