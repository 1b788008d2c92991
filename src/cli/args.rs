use clap::Parser;
use rust_decimal::Decimal;

/// Run the transaction consumer against in-memory collaborators
///
/// Real deployments plug a queue transport and a relational store in behind
/// the `MessageSource` and `AccountStore` traits; this binary wires the
/// in-memory reference implementations, seeds a demo account and a batch of
/// wire messages, and consumes until interrupted.
#[derive(Parser, Debug)]
#[command(name = "bank-transaction-consumer")]
#[command(about = "Durable, idempotent consumer applying transactions to account balances", long_about = None)]
pub struct CliArgs {
    /// Opening balance of the seeded demo account
    #[arg(
        long = "balance",
        value_name = "AMOUNT",
        default_value = "200.00",
        help = "Opening balance of the seeded demo account"
    )]
    pub balance: Decimal,

    /// Number of demo credit messages to enqueue
    #[arg(
        long = "messages",
        value_name = "COUNT",
        default_value_t = 5,
        help = "Number of demo credit messages to enqueue"
    )]
    pub messages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["bank-transaction-consumer"]);
        assert_eq!(args.balance, Decimal::new(20000, 2));
        assert_eq!(args.messages, 5);
    }

    #[test]
    fn test_custom_values() {
        let args = CliArgs::parse_from([
            "bank-transaction-consumer",
            "--balance",
            "1000.50",
            "--messages",
            "12",
        ]);
        assert_eq!(args.balance, Decimal::new(100050, 2));
        assert_eq!(args.messages, 12);
    }

    #[test]
    fn test_invalid_balance_is_rejected() {
        let result =
            CliArgs::try_parse_from(["bank-transaction-consumer", "--balance", "lots"]);
        assert!(result.is_err());
    }
}
