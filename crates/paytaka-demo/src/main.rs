//! PayTaka demo - drives the wallet core through a full customer day
//!
//! Registers a customer, funds the wallet via an approved deposit, runs a
//! recharge through rejection (refund), buys a package with cashback,
//! places a shop order, accrues ad rewards, and prints the resulting
//! balances and activity feed.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p paytaka-demo -- --ad-watches 10
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

use paytaka_accounts::{AccountStore, SeedAccount};
use paytaka_catalog::Catalog;
use paytaka_engine::{EngineConfig, Viewer, WalletEngine};
use paytaka_ledger::RequestLedger;
use paytaka_types::{DepositMethod, OfferKind, OperatorId, Phone, RequestOutcome, ShippingInfo};

/// PayTaka wallet-core demo scenario
#[derive(Parser)]
#[command(name = "paytaka-demo")]
#[command(about = "Run the PayTaka wallet core through a demo scenario", long_about = None)]
struct Args {
    /// Number of rewarded ad watches to simulate
    #[arg(long, default_value_t = 5)]
    ad_watches: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let accounts = Arc::new(AccountStore::with_admin(SeedAccount {
        name: "Operator".to_string(),
        phone: Phone::new("01700000000"),
        password: "admin-pass".to_string(),
        opening_balance: dec!(1000),
    }));
    let catalog = Catalog::with_seed_data();
    let engine = WalletEngine::new(
        accounts.clone(),
        Arc::new(RequestLedger::new()),
        EngineConfig::default(),
    );

    // A customer registers and logs in
    let customer = Phone::new("01712345678");
    accounts.create_account("Karim", customer.clone(), "s3cret")?;
    accounts.authenticate(&customer, "s3cret")?;

    // Funds arrive via a manually-verified deposit
    let deposit = engine.request_deposit(
        &customer,
        dec!(1000),
        "01898765432",
        "TRX-DEMO-1",
        DepositMethod::Bkash,
    )?;
    engine.approve_deposit(&deposit.id)?;

    // A recharge gets held, then rejected and refunded
    let recharge = engine.request_recharge(
        &customer,
        Phone::new("01811111111"),
        OperatorId::new("gp"),
        dec!(60),
        OfferKind::Internet,
    )?;
    engine.resolve_recharge(&recharge.id, RequestOutcome::Rejected)?;

    // A package purchase credits its cashback immediately
    let offer = catalog.offers()[0].clone();
    let package = engine.request_package(&customer, &offer, Phone::new("01811111111"))?;
    engine.resolve_package(&package.id, RequestOutcome::Completed)?;

    // A cash-on-delivery shop order with an admin reply
    let product = catalog.products()[0].clone();
    let order = engine.request_order(
        &customer,
        &product,
        ShippingInfo {
            customer_name: "Karim".to_string(),
            customer_phone: customer.clone(),
            address: "12 Mirpur Road, Dhaka".to_string(),
        },
    )?;
    engine.reply_to_order(&order.id, "Courier booked for tomorrow")?;
    engine.complete_order(&order.id)?;

    // Engagement rewards accrue on the ad balance
    for _ in 0..args.ad_watches {
        engine.watch_ad(&customer)?;
    }
    engine.claim_video_task(&customer)?;
    let transferred = engine.transfer_ad_balance(&customer)?;

    let account = engine.account(&customer)?;
    println!();
    println!("Customer {} ({})", account.name, account.phone);
    println!("  main balance: {}", account.balance);
    println!("  ad balance:   {}", account.ad_balance);
    println!(
        "  ad transfer:  {}",
        if transferred { "granted" } else { "below threshold" }
    );

    println!();
    println!("Recent activity:");
    let viewer = Viewer::new(customer, account.role);
    for entry in engine.recent_activity(&viewer) {
        let sign = if entry.credit { "+" } else { "-" };
        println!(
            "  {} {}{} [{}] ref {}",
            entry.kind, sign, entry.amount, entry.status, entry.reference
        );
    }

    Ok(())
}
