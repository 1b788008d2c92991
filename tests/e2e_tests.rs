//! End-to-end integration tests
//!
//! These tests exercise the complete pipeline — message source, parser,
//! dispatcher, account store — through a single processing cycle, asserting
//! both the visible outcome (acknowledge / dead-letter / reschedule) and
//! the store interactions that produced it.

#[cfg(test)]
mod tests {
    use bank_transaction_consumer::{
        Account, AccountStore, BankingError, EventMessage, InMemoryAccountStore,
        InMemoryMessageSource, JsonTransactionParser, MessageProcessor, MessageSource,
        ProcessingOutcome, ProcessorConfig, TransactionDispatcher,
    };
    use async_trait::async_trait;
    use chrono::{Duration as TimeDelta, Utc};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    /// Store wrapper that counts calls and optionally injects update errors
    struct RecordingStore {
        inner: InMemoryAccountStore,
        get_calls: AtomicUsize,
        update_calls: AtomicUsize,
        update_error: Option<BankingError>,
    }

    impl RecordingStore {
        fn new() -> Self {
            RecordingStore {
                inner: InMemoryAccountStore::new(),
                get_calls: AtomicUsize::new(0),
                update_calls: AtomicUsize::new(0),
                update_error: None,
            }
        }

        fn with_update_error(error: BankingError) -> Self {
            RecordingStore {
                update_error: Some(error),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl AccountStore for RecordingStore {
        async fn get_by_id(&self, account_id: Uuid) -> Result<Account, BankingError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_by_id(account_id).await
        }

        async fn update(&self, account: &Account) -> Result<Account, BankingError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.update_error {
                return Err(error.clone());
            }
            self.inner.update(account).await
        }
    }

    struct Pipeline {
        store: Arc<RecordingStore>,
        source: Arc<InMemoryMessageSource>,
        processor: MessageProcessor<bank_transaction_consumer::Transaction>,
        dispatcher: TransactionDispatcher,
    }

    impl Pipeline {
        fn new(store: RecordingStore) -> Self {
            let store = Arc::new(store);
            let source = Arc::new(InMemoryMessageSource::new());
            let processor = MessageProcessor::new(
                Arc::new(JsonTransactionParser::new()),
                Arc::clone(&source) as Arc<dyn MessageSource>,
                ProcessorConfig::default(),
            );
            let dispatcher =
                TransactionDispatcher::new(Arc::clone(&store) as Arc<dyn AccountStore>);
            Pipeline {
                store,
                source,
                processor,
                dispatcher,
            }
        }

        /// Run exactly one fetch/parse/dispatch/finalize cycle
        async fn process_one(&self) {
            self.processor
                .process_next(
                    |transaction| self.dispatcher.dispatch(transaction),
                    || ProcessingOutcome::PermanentFailure,
                    &CancellationToken::new(),
                )
                .await
                .expect("processing cycle should complete");
        }
    }

    fn message(message_type: &str, account_id: Uuid, amount: &str) -> EventMessage {
        EventMessage::new(format!(
            r#"{{"id":"{}","messageType":"{}","bankAccountId":"{}","amount":{}}}"#,
            Uuid::new_v4(),
            message_type,
            account_id,
            amount
        ))
    }

    #[tokio::test]
    async fn test_credit_is_applied_with_one_fetch_and_one_update() {
        let pipeline = Pipeline::new(RecordingStore::new());
        let account_id = Uuid::new_v4();
        pipeline.store.inner.seed_account(account_id, Decimal::new(20000, 2));
        let msg = message("credit", account_id, "100.00");
        pipeline.source.enqueue(msg.clone());

        pipeline.process_one().await;

        let account = pipeline.store.inner.get_by_id(account_id).await.unwrap();
        assert_eq!(account.balance(), Decimal::new(30000, 2));
        assert_eq!(pipeline.store.inner.ledger_len(), 1);
        assert_eq!(pipeline.store.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.store.update_calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.source.acknowledged(), vec![msg]);
    }

    #[tokio::test]
    async fn test_debit_is_applied_and_acknowledged() {
        let pipeline = Pipeline::new(RecordingStore::new());
        let account_id = Uuid::new_v4();
        pipeline.store.inner.seed_account(account_id, Decimal::new(20000, 2));
        pipeline.source.enqueue(message("debit", account_id, "50.25"));

        pipeline.process_one().await;

        let account = pipeline.store.inner.get_by_id(account_id).await.unwrap();
        assert_eq!(account.balance(), Decimal::new(14975, 2));
        assert_eq!(pipeline.source.acknowledged().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_account_dead_letters_without_update() {
        let pipeline = Pipeline::new(RecordingStore::new());
        let msg = message("credit", Uuid::new_v4(), "100.00");
        pipeline.source.enqueue(msg.clone());

        pipeline.process_one().await;

        assert_eq!(pipeline.source.dead_letters(), vec![msg]);
        assert!(pipeline.source.acknowledged().is_empty());
        assert_eq!(pipeline.store.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.store.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_conflict_reschedules_per_backoff() {
        let account_id = Uuid::new_v4();
        let pipeline = Pipeline::new(RecordingStore::with_update_error(
            BankingError::conflict(account_id),
        ));
        pipeline.store.inner.seed_account(account_id, Decimal::new(20000, 2));
        let msg = message("credit", account_id, "100.00");
        pipeline.source.enqueue(msg.clone());

        let before = Utc::now();
        pipeline.process_one().await;
        let after = Utc::now();

        // First attempt: rescheduled to become visible after 5 seconds.
        let visible_after = pipeline
            .source
            .visible_after(msg.id)
            .expect("message should be rescheduled");
        assert!(visible_after >= before + TimeDelta::seconds(5));
        assert!(visible_after <= after + TimeDelta::seconds(5));
        assert!(pipeline.source.dead_letters().is_empty());
        // The conflicting update left no trace in the store.
        let account = pipeline.store.inner.get_by_id(account_id).await.unwrap();
        assert_eq!(account.balance(), Decimal::new(20000, 2));
    }

    #[tokio::test]
    async fn test_replayed_message_is_idempotent() {
        let pipeline = Pipeline::new(RecordingStore::new());
        let account_id = Uuid::new_v4();
        pipeline.store.inner.seed_account(account_id, Decimal::new(20000, 2));

        let first_delivery = message("credit", account_id, "100.00");
        let mut second_delivery = first_delivery.clone();
        second_delivery.id = Uuid::new_v4();
        second_delivery.processing_count = 1;
        pipeline.source.enqueue(first_delivery.clone());
        pipeline.source.enqueue(second_delivery.clone());

        pipeline.process_one().await;
        pipeline.process_one().await;

        // Both deliveries complete as success; the effect is applied once.
        assert_eq!(pipeline.source.acknowledged(), vec![first_delivery, second_delivery]);
        assert!(pipeline.source.dead_letters().is_empty());
        assert_eq!(pipeline.store.inner.ledger_len(), 1);
        let account = pipeline.store.inner.get_by_id(account_id).await.unwrap();
        assert_eq!(account.balance(), Decimal::new(30000, 2));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_dead_lettered() {
        let pipeline = Pipeline::new(RecordingStore::new());
        let msg = EventMessage::new(r#"{"messageType":"transfer","amount":"ten"}"#);
        pipeline.source.enqueue(msg.clone());

        pipeline.process_one().await;

        assert_eq!(pipeline.source.dead_letters(), vec![msg]);
        // The store was never touched.
        assert_eq!(pipeline.store.get_calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.store.update_calls.load(Ordering::SeqCst), 0);
    }
}
