//! In-memory account store keyed by phone number

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paytaka_types::{Account, Phone, Result, Role, WalletError};

use crate::credentials::{hash_password, verify_password};

/// Administrative account seeded at store creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    pub name: String,
    pub phone: Phone,
    pub password: String,
    /// Operator float the admin starts with
    pub opening_balance: Decimal,
}

/// The account store
///
/// Single source of truth for money. Reads return cloned snapshots; all
/// writes happen under one write-lock acquisition so no caller ever
/// observes a partially-applied update.
pub struct AccountStore {
    accounts: RwLock<HashMap<Phone, Account>>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store seeded with the administrative account
    pub fn with_admin(seed: SeedAccount) -> Self {
        let store = Self::new();
        let admin = Account {
            phone: seed.phone.clone(),
            name: seed.name,
            password_hash: hash_password(&seed.password),
            role: Role::Admin,
            balance: seed.opening_balance,
            ad_balance: Decimal::ZERO,
            ads_watched: 0,
            ad_day: Utc::now().date_naive(),
            created_at: Utc::now(),
        };
        store.accounts.write().insert(seed.phone, admin);
        store
    }

    /// Register a new account with zero balances
    pub fn create_account(
        &self,
        name: impl Into<String>,
        phone: Phone,
        password: &str,
    ) -> Result<Account> {
        let mut accounts = self.accounts.write();

        if accounts.contains_key(&phone) {
            return Err(WalletError::DuplicatePhone {
                phone: phone.to_string(),
            });
        }

        let account = Account {
            phone: phone.clone(),
            name: name.into(),
            password_hash: hash_password(password),
            role: Role::User,
            balance: Decimal::ZERO,
            ad_balance: Decimal::ZERO,
            ads_watched: 0,
            ad_day: Utc::now().date_naive(),
            created_at: Utc::now(),
        };

        accounts.insert(phone.clone(), account.clone());
        tracing::info!(account = %phone, "account registered");
        Ok(account)
    }

    /// Look up an account by phone
    pub fn find(&self, phone: &Phone) -> Result<Account> {
        self.accounts
            .read()
            .get(phone)
            .cloned()
            .ok_or_else(|| WalletError::AccountNotFound {
                phone: phone.to_string(),
            })
    }

    /// Check whether a phone is registered
    pub fn contains(&self, phone: &Phone) -> bool {
        self.accounts.read().contains_key(phone)
    }

    /// Verify credentials and return the account on success
    pub fn authenticate(&self, phone: &Phone, password: &str) -> Result<Account> {
        let account = self.find(phone)?;
        if verify_password(password, &account.password_hash) {
            Ok(account)
        } else {
            Err(WalletError::InvalidCredentials {
                phone: phone.to_string(),
            })
        }
    }

    /// All accounts, for admin-side listings
    pub fn all(&self) -> Vec<Account> {
        self.accounts.read().values().cloned().collect()
    }

    /// Apply deltas to both balances of one account atomically
    ///
    /// This is the sole balance-mutation primitive. If either resulting
    /// balance would be negative the whole delta is rejected and nothing
    /// is written.
    pub fn apply_balance_delta(
        &self,
        phone: &Phone,
        main_delta: Decimal,
        ad_delta: Decimal,
    ) -> Result<Account> {
        let mut accounts = self.accounts.write();

        let account = accounts
            .get_mut(phone)
            .ok_or_else(|| WalletError::AccountNotFound {
                phone: phone.to_string(),
            })?;

        let new_balance = account.balance + main_delta;
        let new_ad_balance = account.ad_balance + ad_delta;

        if new_balance < Decimal::ZERO {
            return Err(WalletError::InsufficientFunds {
                phone: phone.to_string(),
                requested: -main_delta,
                available: account.balance,
            });
        }
        if new_ad_balance < Decimal::ZERO {
            return Err(WalletError::InsufficientFunds {
                phone: phone.to_string(),
                requested: -ad_delta,
                available: account.ad_balance,
            });
        }

        account.balance = new_balance;
        account.ad_balance = new_ad_balance;

        tracing::debug!(
            account = %phone,
            main_delta = %main_delta,
            ad_delta = %ad_delta,
            balance = %account.balance,
            ad_balance = %account.ad_balance,
            "balance delta applied"
        );
        Ok(account.clone())
    }

    /// Count one ad watch against the given day
    ///
    /// The counter resets when the day moves past the one it was recorded
    /// for. Returns the count after the watch.
    pub fn record_ad_watch(&self, phone: &Phone, day: NaiveDate) -> Result<u32> {
        let mut accounts = self.accounts.write();

        let account = accounts
            .get_mut(phone)
            .ok_or_else(|| WalletError::AccountNotFound {
                phone: phone.to_string(),
            })?;

        if account.ad_day != day {
            account.ad_day = day;
            account.ads_watched = 0;
        }
        account.ads_watched += 1;
        Ok(account.ads_watched)
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn store_with_user(balance: Decimal) -> (AccountStore, Phone) {
        let store = AccountStore::new();
        let phone = Phone::new("01712345678");
        store.create_account("Karim", phone.clone(), "s3cret").unwrap();
        if balance > Decimal::ZERO {
            store.apply_balance_delta(&phone, balance, Decimal::ZERO).unwrap();
        }
        (store, phone)
    }

    #[test]
    fn test_registration_starts_at_zero() {
        let (store, phone) = store_with_user(Decimal::ZERO);
        let account = store.find(&phone).unwrap();
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.ad_balance, Decimal::ZERO);
        assert_eq!(account.role, Role::User);
    }

    #[test]
    fn test_duplicate_phone_rejected() {
        let (store, phone) = store_with_user(Decimal::ZERO);
        let result = store.create_account("Rahim", phone, "other");
        assert!(matches!(result, Err(WalletError::DuplicatePhone { .. })));
    }

    #[test]
    fn test_authenticate() {
        let (store, phone) = store_with_user(Decimal::ZERO);
        assert!(store.authenticate(&phone, "s3cret").is_ok());
        assert!(matches!(
            store.authenticate(&phone, "wrong"),
            Err(WalletError::InvalidCredentials { .. })
        ));
        assert!(matches!(
            store.authenticate(&Phone::new("01000000000"), "s3cret"),
            Err(WalletError::AccountNotFound { .. })
        ));
    }

    #[test]
    fn test_seeded_admin() {
        let store = AccountStore::with_admin(SeedAccount {
            name: "Operator".to_string(),
            phone: Phone::new("01700000000"),
            password: "admin-pass".to_string(),
            opening_balance: dec!(1000),
        });

        let admin = store.find(&Phone::new("01700000000")).unwrap();
        assert!(admin.role.is_admin());
        assert_eq!(admin.balance, dec!(1000));
    }

    #[test]
    fn test_delta_rejects_negative_main_balance() {
        let (store, phone) = store_with_user(dec!(50));
        let result = store.apply_balance_delta(&phone, dec!(-60), Decimal::ZERO);
        assert!(matches!(result, Err(WalletError::InsufficientFunds { .. })));

        let account = store.find(&phone).unwrap();
        assert_eq!(account.balance, dec!(50));
    }

    #[test]
    fn test_delta_rejects_without_partial_update() {
        let (store, phone) = store_with_user(dec!(100));

        // Main leg is fine, ad leg would go negative: nothing may change
        let result = store.apply_balance_delta(&phone, dec!(-10), dec!(-1));
        assert!(matches!(result, Err(WalletError::InsufficientFunds { .. })));

        let account = store.find(&phone).unwrap();
        assert_eq!(account.balance, dec!(100));
        assert_eq!(account.ad_balance, Decimal::ZERO);
    }

    #[test]
    fn test_combined_delta_moves_both_balances() {
        let (store, phone) = store_with_user(Decimal::ZERO);
        store.apply_balance_delta(&phone, Decimal::ZERO, dec!(500)).unwrap();

        let account = store.apply_balance_delta(&phone, dec!(500), dec!(-500)).unwrap();
        assert_eq!(account.balance, dec!(500));
        assert_eq!(account.ad_balance, Decimal::ZERO);
    }

    #[test]
    fn test_ad_watch_counter_resets_on_new_day() {
        let (store, phone) = store_with_user(Decimal::ZERO);
        let today = Utc::now().date_naive();
        let tomorrow = today + Duration::days(1);

        assert_eq!(store.record_ad_watch(&phone, today).unwrap(), 1);
        assert_eq!(store.record_ad_watch(&phone, today).unwrap(), 2);
        assert_eq!(store.record_ad_watch(&phone, tomorrow).unwrap(), 1);

        let account = store.find(&phone).unwrap();
        assert_eq!(account.ad_day, tomorrow);
        assert_eq!(account.ads_watched, 1);
    }
}
