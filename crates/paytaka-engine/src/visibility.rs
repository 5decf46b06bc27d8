//! Role-based read-side views over the request ledger
//!
//! An admin sees every request; a regular user sees only their own. This
//! module is the single place the role is interpreted. Pure reads - nothing
//! here mutates.

use paytaka_types::{
    Account, ActivityEntry, ActivityKind, DepositRequest, PackageRequest, Phone, RechargeRequest,
    Role, ShopOrder,
};

use crate::WalletEngine;

/// Maximum rows returned by the merged recent-activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 15;

/// Who is looking at the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub phone: Phone,
    pub role: Role,
}

impl Viewer {
    pub fn new(phone: Phone, role: Role) -> Self {
        Self { phone, role }
    }

    /// Whether this viewer may see requests owned by `owner`
    pub fn can_see(&self, owner: &Phone) -> bool {
        self.role.is_admin() || &self.phone == owner
    }
}

impl From<&Account> for Viewer {
    fn from(account: &Account) -> Self {
        Self {
            phone: account.phone.clone(),
            role: account.role,
        }
    }
}

impl WalletEngine {
    /// Deposits visible to the viewer, newest first
    pub fn deposits_for(&self, viewer: &Viewer) -> Vec<DepositRequest> {
        self.ledger()
            .deposits()
            .into_iter()
            .filter(|r| viewer.can_see(&r.account))
            .collect()
    }

    /// Recharges visible to the viewer, newest first
    pub fn recharges_for(&self, viewer: &Viewer) -> Vec<RechargeRequest> {
        self.ledger()
            .recharges()
            .into_iter()
            .filter(|r| viewer.can_see(&r.account))
            .collect()
    }

    /// Package purchases visible to the viewer, newest first
    pub fn packages_for(&self, viewer: &Viewer) -> Vec<PackageRequest> {
        self.ledger()
            .packages()
            .into_iter()
            .filter(|r| viewer.can_see(&r.account))
            .collect()
    }

    /// Shop orders visible to the viewer, newest first
    pub fn orders_for(&self, viewer: &Viewer) -> Vec<ShopOrder> {
        self.ledger()
            .orders()
            .into_iter()
            .filter(|r| viewer.can_see(&r.account))
            .collect()
    }

    /// Merged recent-activity feed across deposits, recharges, and
    /// packages, newest first, capped at [`RECENT_ACTIVITY_LIMIT`] rows
    pub fn recent_activity(&self, viewer: &Viewer) -> Vec<ActivityEntry> {
        let mut entries: Vec<ActivityEntry> = Vec::new();

        entries.extend(self.deposits_for(viewer).into_iter().map(|d| ActivityEntry {
            kind: ActivityKind::Deposit,
            reference: d.trx_ref,
            amount: d.amount,
            status: d.status.into(),
            credit: true,
            created_at: d.created_at,
        }));
        entries.extend(self.recharges_for(viewer).into_iter().map(|r| ActivityEntry {
            kind: ActivityKind::Recharge,
            reference: r.target.to_string(),
            amount: r.amount,
            status: r.status.into(),
            credit: false,
            created_at: r.created_at,
        }));
        entries.extend(self.packages_for(viewer).into_iter().map(|p| ActivityEntry {
            kind: ActivityKind::Package,
            reference: p.customer.to_string(),
            amount: p.offer.price,
            status: p.status.into(),
            credit: false,
            created_at: p.created_at,
        }));

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(RECENT_ACTIVITY_LIMIT);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_scope() {
        let user = Viewer::new(Phone::new("01712345678"), Role::User);
        assert!(user.can_see(&Phone::new("01712345678")));
        assert!(!user.can_see(&Phone::new("01811111111")));

        let admin = Viewer::new(Phone::new("01700000000"), Role::Admin);
        assert!(admin.can_see(&Phone::new("01712345678")));
        assert!(admin.can_see(&Phone::new("01811111111")));
    }
}
