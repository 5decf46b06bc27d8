//! PayTaka Engine - the money-movement core
//!
//! The engine composes the account store and the request ledger: every
//! operation validates against the store, mutates the owning account's
//! balance in lockstep with a request's creation or status change, and
//! returns an explicit result. It owns all money-movement rules:
//!
//! - **Deposits** credit nothing at creation; approval credits the full
//!   amount exactly once
//! - **Recharges** hold funds at creation (debit up front) and refund the
//!   full amount on rejection
//! - **Package purchases** apply one combined delta (`-price + cashback`)
//!   at creation; rejection refunds `price - cashback`, so the customer
//!   keeps the cashback either way
//! - **Shop orders** never touch the wallet (cash on delivery)
//! - **Ad rewards** accrue on a secondary balance with a daily watch cap
//!   and a threshold-gated transfer into the main balance
//!
//! Every top-level operation that performs a read-modify-write on balance
//! fields runs inside a per-account mutual-exclusion scope, so the engine
//! stays correct when exposed to concurrent callers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use paytaka_accounts::AccountStore;
use paytaka_ledger::{DepositDraft, OrderDraft, PackageDraft, RechargeDraft, RequestLedger};
use paytaka_types::{
    Account, DepositId, DepositMethod, DepositRequest, DepositStatus, Offer, OfferKind,
    OfferSnapshot, OperatorId, OrderId, OrderStatus, PackageRequest, PackageRequestId, Phone,
    Product, ProductSnapshot, RechargeId, RechargeRequest, RequestOutcome, Result, ShippingInfo,
    ShopOrder, WalletError,
};

mod visibility;

pub use visibility::{Viewer, RECENT_ACTIVITY_LIMIT};

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Credit per ad watch and per video task
    pub ad_reward: Decimal,
    /// Maximum rewarded ad watches per account per day
    pub daily_ad_cap: u32,
    /// Minimum ad balance required to transfer into the main balance
    pub ad_transfer_threshold: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ad_reward: dec!(0.50),
            daily_ad_cap: 100,
            ad_transfer_threshold: dec!(500),
        }
    }
}

/// The wallet ledger engine
pub struct WalletEngine {
    accounts: Arc<AccountStore>,
    ledger: Arc<RequestLedger>,
    config: EngineConfig,
    /// Per-account exclusion scopes for read-modify-write operations
    account_locks: Mutex<HashMap<Phone, Arc<Mutex<()>>>>,
}

impl WalletEngine {
    /// Create an engine over an account store and request ledger
    pub fn new(accounts: Arc<AccountStore>, ledger: Arc<RequestLedger>, config: EngineConfig) -> Self {
        Self {
            accounts,
            ledger,
            config,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying account store
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// The underlying request ledger
    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current snapshot of an account, for balance display
    pub fn account(&self, phone: &Phone) -> Result<Account> {
        self.accounts.find(phone)
    }

    fn account_guard(&self, phone: &Phone) -> Arc<Mutex<()>> {
        let mut locks = self.account_locks.lock();
        locks
            .entry(phone.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn require_positive(amount: Decimal, what: &str) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::invalid_amount(format!(
                "{what} must be greater than zero"
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Deposits
    // ========================================================================

    /// Create a pending deposit request
    ///
    /// A deposit is a credit request awaiting manual verification: no
    /// balance check and no account mutation happen here.
    pub fn request_deposit(
        &self,
        phone: &Phone,
        amount: Decimal,
        sender_number: impl Into<String>,
        trx_ref: impl Into<String>,
        method: DepositMethod,
    ) -> Result<DepositRequest> {
        Self::require_positive(amount, "deposit amount")?;
        self.accounts.find(phone)?;

        let record = self.ledger.append_deposit(DepositDraft {
            account: phone.clone(),
            amount,
            sender_number: sender_number.into(),
            trx_ref: trx_ref.into(),
            method,
        });
        tracing::info!(request = %record.id, account = %phone, amount = %amount, "deposit requested");
        Ok(record)
    }

    /// Approve a pending deposit, crediting the owning account exactly once
    pub fn approve_deposit(&self, id: &DepositId) -> Result<DepositRequest> {
        let owner = self.ledger.deposit(id)?.account;
        let guard = self.account_guard(&owner);
        let _scope = guard.lock();

        // Re-read under the account lock: a concurrent approval may have
        // resolved the request between the lookup and here
        let deposit = self.ledger.deposit(id)?;
        if !deposit.status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: deposit.status.to_string(),
            });
        }

        self.accounts
            .apply_balance_delta(&deposit.account, deposit.amount, Decimal::ZERO)?;
        let record = self
            .ledger
            .update_deposit_status(id, DepositStatus::Approved)?;

        tracing::info!(request = %id, account = %record.account, amount = %record.amount, "deposit approved");
        Ok(record)
    }

    // ========================================================================
    // Recharges
    // ========================================================================

    /// Create a pending recharge, holding the funds immediately
    ///
    /// The amount is debited at creation time (funds reserved); a later
    /// rejection refunds it in full. Fails with `InsufficientFunds` and no
    /// side effect if the balance does not cover the amount.
    pub fn request_recharge(
        &self,
        phone: &Phone,
        target: Phone,
        operator: OperatorId,
        amount: Decimal,
        kind: OfferKind,
    ) -> Result<RechargeRequest> {
        Self::require_positive(amount, "recharge amount")?;
        let guard = self.account_guard(phone);
        let _scope = guard.lock();

        // The delta primitive is the pre-check: it rejects without writing
        // if the balance would go negative
        self.accounts
            .apply_balance_delta(phone, -amount, Decimal::ZERO)?;

        let record = self.ledger.append_recharge(RechargeDraft {
            account: phone.clone(),
            target,
            operator,
            amount,
            kind,
        });
        tracing::info!(request = %record.id, account = %phone, amount = %amount, "recharge requested, funds held");
        Ok(record)
    }

    /// Resolve a pending recharge
    ///
    /// Rejection refunds the full held amount before the status is
    /// recorded; completion consumes the held funds with no further
    /// balance change.
    pub fn resolve_recharge(
        &self,
        id: &RechargeId,
        outcome: RequestOutcome,
    ) -> Result<RechargeRequest> {
        let owner = self.ledger.recharge(id)?.account;
        let guard = self.account_guard(&owner);
        let _scope = guard.lock();

        let recharge = self.ledger.recharge(id)?;
        if !recharge.status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: recharge.status.to_string(),
            });
        }

        if outcome == RequestOutcome::Rejected {
            self.accounts
                .apply_balance_delta(&recharge.account, recharge.amount, Decimal::ZERO)?;
        }
        let record = self.ledger.update_recharge_status(id, outcome.into())?;

        tracing::info!(request = %id, account = %record.account, status = %record.status, "recharge resolved");
        Ok(record)
    }

    // ========================================================================
    // Package purchases
    // ========================================================================

    /// Create a pending package purchase from a catalog offer
    ///
    /// Pre-checks `balance >= price`, then applies one combined delta of
    /// `-price + cashback`: the cashback is credited immediately as an
    /// incentive even though fulfillment is still pending.
    pub fn request_package(
        &self,
        phone: &Phone,
        offer: &Offer,
        customer: Phone,
    ) -> Result<PackageRequest> {
        Self::require_positive(offer.price, "offer price")?;
        let guard = self.account_guard(phone);
        let _scope = guard.lock();

        let account = self.accounts.find(phone)?;
        if account.balance < offer.price {
            return Err(WalletError::InsufficientFunds {
                phone: phone.to_string(),
                requested: offer.price,
                available: account.balance,
            });
        }

        self.accounts.apply_balance_delta(
            phone,
            -offer.price + offer.cashback_or_zero(),
            Decimal::ZERO,
        )?;

        let record = self.ledger.append_package(PackageDraft {
            account: phone.clone(),
            customer,
            offer: OfferSnapshot::from(offer),
        });
        tracing::info!(
            request = %record.id,
            account = %phone,
            price = %offer.price,
            cashback = %offer.cashback_or_zero(),
            "package requested"
        );
        Ok(record)
    }

    /// Resolve a pending package purchase
    ///
    /// Rejection refunds `price - cashback`: the net debit is undone but
    /// the already-granted cashback stays with the customer. Completion
    /// changes no balance.
    pub fn resolve_package(
        &self,
        id: &PackageRequestId,
        outcome: RequestOutcome,
    ) -> Result<PackageRequest> {
        let owner = self.ledger.package(id)?.account;
        let guard = self.account_guard(&owner);
        let _scope = guard.lock();

        let package = self.ledger.package(id)?;
        if !package.status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: package.status.to_string(),
            });
        }

        if outcome == RequestOutcome::Rejected {
            self.accounts.apply_balance_delta(
                &package.account,
                package.offer.net_debit(),
                Decimal::ZERO,
            )?;
        }
        let record = self.ledger.update_package_status(id, outcome.into())?;

        tracing::info!(request = %id, account = %record.account, status = %record.status, "package resolved");
        Ok(record)
    }

    // ========================================================================
    // Shop orders
    // ========================================================================

    /// Create a pending shop order (cash on delivery; no balance involved)
    pub fn request_order(
        &self,
        phone: &Phone,
        product: &Product,
        shipping: ShippingInfo,
    ) -> Result<ShopOrder> {
        self.accounts.find(phone)?;

        let record = self.ledger.append_order(OrderDraft {
            account: phone.clone(),
            shipping,
            product: ProductSnapshot::from(product),
        });
        tracing::info!(request = %record.id, account = %phone, product = %record.product.title, "order placed");
        Ok(record)
    }

    /// Mark a pending shop order completed (informational only)
    pub fn complete_order(&self, id: &OrderId) -> Result<ShopOrder> {
        self.ledger.update_order_status(id, OrderStatus::Completed)
    }

    /// Attach a free-text admin reply to an order, at any time
    pub fn reply_to_order(&self, id: &OrderId, reply: impl Into<String>) -> Result<ShopOrder> {
        self.ledger.set_admin_reply(id, reply)
    }

    // ========================================================================
    // Ad-reward micro-ledger
    // ========================================================================

    /// Credit one ad watch, if the daily cap allows it
    ///
    /// Returns `Ok(false)` (not-granted, balance untouched) once the
    /// account has reached the daily cap. The counter resets at the UTC
    /// day boundary.
    pub fn watch_ad(&self, phone: &Phone) -> Result<bool> {
        let guard = self.account_guard(phone);
        let _scope = guard.lock();

        let account = self.accounts.find(phone)?;
        let today = Utc::now().date_naive();
        if account.ads_watched_on(today) >= self.config.daily_ad_cap {
            return Ok(false);
        }

        self.accounts
            .apply_balance_delta(phone, Decimal::ZERO, self.config.ad_reward)?;
        let count = self.accounts.record_ad_watch(phone, today)?;

        tracing::debug!(account = %phone, watched_today = count, "ad reward granted");
        Ok(true)
    }

    /// Credit a video-task reward (distinct channel, no daily cap)
    pub fn claim_video_task(&self, phone: &Phone) -> Result<Account> {
        let guard = self.account_guard(phone);
        let _scope = guard.lock();

        let account = self
            .accounts
            .apply_balance_delta(phone, Decimal::ZERO, self.config.ad_reward)?;
        tracing::debug!(account = %phone, ad_balance = %account.ad_balance, "video task reward granted");
        Ok(account)
    }

    /// Move the entire ad balance into the main balance
    ///
    /// Returns `Ok(false)` (not-granted, both balances untouched) while
    /// the ad balance is below the transfer threshold.
    pub fn transfer_ad_balance(&self, phone: &Phone) -> Result<bool> {
        let guard = self.account_guard(phone);
        let _scope = guard.lock();

        let account = self.accounts.find(phone)?;
        if account.ad_balance < self.config.ad_transfer_threshold {
            return Ok(false);
        }

        self.accounts
            .apply_balance_delta(phone, account.ad_balance, -account.ad_balance)?;
        tracing::info!(account = %phone, amount = %account.ad_balance, "ad balance transferred to main");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paytaka_accounts::SeedAccount;

    fn engine_with(config: EngineConfig) -> (WalletEngine, Phone) {
        let accounts = Arc::new(AccountStore::with_admin(SeedAccount {
            name: "Operator".to_string(),
            phone: Phone::new("01700000000"),
            password: "admin-pass".to_string(),
            opening_balance: dec!(1000),
        }));
        let phone = Phone::new("01712345678");
        accounts.create_account("Karim", phone.clone(), "s3cret").unwrap();

        let engine = WalletEngine::new(accounts, Arc::new(RequestLedger::new()), config);
        (engine, phone)
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.ad_reward, dec!(0.50));
        assert_eq!(config.daily_ad_cap, 100);
        assert_eq!(config.ad_transfer_threshold, dec!(500));
    }

    #[test]
    fn test_watch_ad_stops_at_cap() {
        let (engine, phone) = engine_with(EngineConfig {
            daily_ad_cap: 2,
            ..EngineConfig::default()
        });

        assert!(engine.watch_ad(&phone).unwrap());
        assert!(engine.watch_ad(&phone).unwrap());
        assert!(!engine.watch_ad(&phone).unwrap());

        let account = engine.account(&phone).unwrap();
        assert_eq!(account.ad_balance, dec!(1.00));
        assert_eq!(account.ads_watched, 2);
    }

    #[test]
    fn test_video_task_has_no_cap() {
        let (engine, phone) = engine_with(EngineConfig {
            daily_ad_cap: 0,
            ..EngineConfig::default()
        });

        assert!(!engine.watch_ad(&phone).unwrap());
        let account = engine.claim_video_task(&phone).unwrap();
        assert_eq!(account.ad_balance, dec!(0.50));
    }

    #[test]
    fn test_deposit_requires_positive_amount() {
        let (engine, phone) = engine_with(EngineConfig::default());
        let result = engine.request_deposit(&phone, dec!(0), "01898765432", "TRX1", DepositMethod::Bkash);
        assert!(matches!(result, Err(WalletError::InvalidAmount { .. })));
    }

    #[test]
    fn test_deposit_for_unknown_account() {
        let (engine, _) = engine_with(EngineConfig::default());
        let result = engine.request_deposit(
            &Phone::new("01000000000"),
            dec!(100),
            "01898765432",
            "TRX1",
            DepositMethod::Upay,
        );
        assert!(matches!(result, Err(WalletError::AccountNotFound { .. })));
    }
}
