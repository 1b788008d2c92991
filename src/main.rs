//! Bank Transaction Consumer CLI
//!
//! Runs the consumer against the in-memory reference implementations of the
//! message source and account store: seeds one demo account, enqueues a
//! batch of wire messages (including a replayed duplicate and a malformed
//! payload), and processes them until Ctrl-C.
//!
//! Real deployments replace the in-memory collaborators with a queue
//! transport and a durable store behind the same traits.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --balance 200.00 --messages 5
//! RUST_LOG=debug cargo run
//! ```

use bank_transaction_consumer::{
    cli, AccountStore, BankingApplication, InMemoryAccountStore, InMemoryMessageSource,
    JsonTransactionParser, MessageProcessor, ProcessorConfig, TransactionDispatcher,
};
use bank_transaction_consumer::{EventMessage, MessageSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

fn credit_message(account_id: Uuid, amount: &str) -> EventMessage {
    EventMessage::new(format!(
        r#"{{"id":"{}","messageType":"credit","bankAccountId":"{}","amount":{}}}"#,
        Uuid::new_v4(),
        account_id,
        amount
    ))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::parse_args();

    // In-memory collaborators standing in for the queue and the database.
    let store = Arc::new(InMemoryAccountStore::new());
    let source = Arc::new(InMemoryMessageSource::new());

    let account_id = Uuid::new_v4();
    store.seed_account(account_id, args.balance);
    info!(%account_id, balance = %args.balance, "Seeded demo account");

    for _ in 0..args.messages {
        source.enqueue(credit_message(account_id, "10.00"));
    }

    // A replayed delivery of the same transaction id: applied once, the
    // second delivery completes as an idempotent no-op.
    let replayed = credit_message(account_id, "25.00");
    source.enqueue(replayed.clone());
    source.enqueue(EventMessage::new(replayed.body.clone().unwrap_or_default()));

    // A payload the parser rejects: lands in the dead-letter list.
    source.enqueue(EventMessage::new(r#"{"messageType":"transfer"}"#));

    let processor = MessageProcessor::new(
        Arc::new(JsonTransactionParser::new()),
        Arc::clone(&source) as Arc<dyn MessageSource>,
        ProcessorConfig::default(),
    );
    let dispatcher = TransactionDispatcher::new(Arc::clone(&store) as Arc<dyn AccountStore>);
    let application = BankingApplication::new(processor, dispatcher);

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
                cancel.cancel();
            }
        }
    });

    application.run(cancel).await;

    match store.get_by_id(account_id).await {
        Ok(account) => info!(
            balance = %account.balance(),
            dead_letters = source.dead_letters().len(),
            "Final account state"
        ),
        Err(error) => warn!(%error, "Could not read final account state"),
    }
}
