//! Account types: profile, role, and balances
//!
//! An account holds two balances: the main spendable balance and the
//! ad-reward balance accrued through engagement tasks. Both are mutated
//! exclusively through the account store's balance-delta primitive.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Phone;

/// Role of an account holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer
    User,
    /// Operator reviewing and resolving requests
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// A wallet account
///
/// Created at registration with zero balances, mutated only through the
/// account store, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique key
    pub phone: Phone,
    /// Display name
    pub name: String,
    /// Salted credential digest (never the raw password)
    pub password_hash: String,
    pub role: Role,
    /// Primary spendable funds
    pub balance: Decimal,
    /// Secondary balance earned via engagement tasks
    pub ad_balance: Decimal,
    /// Ads watched on `ad_day`
    pub ads_watched: u32,
    /// UTC day the ad-watch counter belongs to
    pub ad_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Ad watches counted against the given day's cap
    ///
    /// The counter belongs to `ad_day`; on any later day it reads as zero.
    pub fn ads_watched_on(&self, day: NaiveDate) -> u32 {
        if day == self.ad_day {
            self.ads_watched
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn account() -> Account {
        Account {
            phone: Phone::new("01712345678"),
            name: "Karim".to_string(),
            password_hash: "x".to_string(),
            role: Role::User,
            balance: dec!(100),
            ad_balance: Decimal::ZERO,
            ads_watched: 7,
            ad_day: Utc::now().date_naive(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_ads_watched_resets_across_days() {
        let acct = account();
        let today = acct.ad_day;
        let tomorrow = today + Duration::days(1);

        assert_eq!(acct.ads_watched_on(today), 7);
        assert_eq!(acct.ads_watched_on(tomorrow), 0);
    }
}
