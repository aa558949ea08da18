//! Example: REST API trading operations
//!
//! This example demonstrates how to use the REST API for:
//! - Fetching market data (instruments, order book)
//! - Checking account balances and trade history
//! - Validating an order and handling exchange errors
//!
//! Run with: cargo run -p cryptocom-rest --example rest_trading
//!
//! NOTE: Set CRYPTOCOM_API_KEY and CRYPTOCOM_SECRET_KEY for the private calls.
//! CRYPTOCOM_BASE_URL switches to another environment such as the UAT sandbox.

use cryptocom_rest::{
    CancellationToken, ClientConfig, CreateOrderRequest, CryptoComClient, Credentials,
    ExchangeError, GetTradesRequest, Side, DEFAULT_BASE_URL,
};
use rust_decimal_macros::dec;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Crypto.com Exchange REST Example ===\n");

    let credentials = match Credentials::from_env() {
        Ok(creds) => creds,
        Err(e) => {
            println!("No credentials ({e}), private calls will be rejected by the exchange\n");
            Credentials::new("public-only", "public-only")?
        }
    };

    let base_url = env::var("CRYPTOCOM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let client = CryptoComClient::with_config(
        ClientConfig::new(credentials)
            .with_base_url(base_url)
            .with_timeout(10),
    )?;

    // Abort everything if the example runs too long
    let cancel = CancellationToken::new();
    let watchdog = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        watchdog.cancel();
    });

    // ========================================================================
    // PUBLIC ENDPOINTS - No authentication required
    // ========================================================================

    println!("--- Public Market Data ---\n");

    println!("Fetching instruments...");
    match client.get_instruments(&cancel).await {
        Ok(result) => {
            println!("  {} instruments", result.instruments.len());
            for instrument in result.instruments.iter().take(5) {
                println!(
                    "    {} ({} decimals price, {} decimals qty)",
                    instrument.instrument_name,
                    instrument.price_decimals,
                    instrument.quantity_decimals
                );
            }
        }
        Err(e) => println!("  Error: {e}"),
    }
    println!();

    println!("Fetching BTC_USDT order book (depth=10)...");
    match client.get_book(&cancel, "BTC_USDT", 10).await {
        Ok(book) => {
            if let Some(snapshot) = book.snapshot() {
                println!("  Top Bids:");
                for (i, level) in snapshot.bids.iter().take(3).enumerate() {
                    println!("    {}. {} x {}", i + 1, level.price, level.quantity);
                }
                println!("  Top Asks:");
                for (i, level) in snapshot.asks.iter().take(3).enumerate() {
                    println!("    {}. {} x {}", i + 1, level.price, level.quantity);
                }
                if let Some(spread) = snapshot.spread() {
                    println!("  Spread: {spread}");
                }
            }
        }
        Err(e) => println!("  Error: {e}"),
    }
    println!();

    // ========================================================================
    // PRIVATE ENDPOINTS - Authentication required
    // ========================================================================

    println!("--- Private Account Data ---\n");

    println!("Fetching account summary...");
    match client.get_account_summary(&cancel, None).await {
        Ok(summary) => {
            for account in summary.accounts.iter().filter(|a| !a.balance.is_zero()) {
                println!(
                    "  {}: {} (available {})",
                    account.currency, account.balance, account.available
                );
            }
        }
        Err(e) if e.is(ExchangeError::Unauthorized) => {
            println!("  Unauthorized, check CRYPTOCOM_API_KEY / CRYPTOCOM_SECRET_KEY");
        }
        Err(e) if e.is(ExchangeError::IllegalIp) => {
            println!("  This IP is not whitelisted for the API key");
        }
        Err(e) => println!("  Error: {e}"),
    }
    println!();

    println!("Fetching recent trades...");
    let request = GetTradesRequest::new()
        .with_instrument("BTC_USDT")
        .with_page_size(20);
    match client.get_trades(&cancel, &request).await {
        Ok(result) => {
            for trade in &result.trade_list {
                println!(
                    "  {} {} {} @ {} (fee {} {})",
                    trade.create_time,
                    trade.side,
                    trade.traded_quantity,
                    trade.traded_price,
                    trade.fee,
                    trade.fee_currency
                );
            }
        }
        Err(e) => println!("  Error: {e} (recovery: {:?})", e.recovery_strategy()),
    }
    println!();

    // Invalid orders are rejected locally, before anything is signed or sent
    println!("Validating an order with a zero price...");
    let order = CreateOrderRequest::limit("BTC_USDT", Side::Buy, dec!(0.001), dec!(0));
    match client.create_order(&cancel, &order).await {
        Ok(result) => println!("  Unexpectedly placed {}", result.order_id),
        Err(e) => println!("  Rejected: {e}"),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
