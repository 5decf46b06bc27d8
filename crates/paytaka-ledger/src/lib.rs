//! PayTaka Request Ledger
//!
//! Four parallel collections (deposits, recharges, package purchases, shop
//! orders), each an append-mostly list of immutable-except-status records.
//!
//! # Invariants
//!
//! 1. Entries are inserted at the head: newest-first is the enumeration
//!    and display convention
//! 2. The ledger assigns ids and creation timestamps; callers never do
//! 3. Status transitions are one-shot: a second update on an
//!    already-resolved request fails with `InvalidTransition`, it is not
//!    silently ignored
//! 4. Monetary fields never change after creation; only status (and the
//!    shop-order admin reply) are writable

use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use paytaka_types::{
    DepositId, DepositMethod, DepositRequest, DepositStatus, OfferKind, OfferSnapshot,
    OperatorId, OrderId, OrderStatus, PackageRequest, PackageRequestId, Phone, ProductSnapshot,
    RechargeId, RechargeRequest, RequestStatus, Result, ShippingInfo, ShopOrder, WalletError,
};

// ============================================================================
// Drafts
// ============================================================================

/// Input for a new deposit record; the ledger assigns id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositDraft {
    pub account: Phone,
    pub amount: Decimal,
    pub sender_number: String,
    pub trx_ref: String,
    pub method: DepositMethod,
}

/// Input for a new recharge record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RechargeDraft {
    pub account: Phone,
    pub target: Phone,
    pub operator: OperatorId,
    pub amount: Decimal,
    pub kind: OfferKind,
}

/// Input for a new package-purchase record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDraft {
    pub account: Phone,
    pub customer: Phone,
    pub offer: OfferSnapshot,
}

/// Input for a new shop-order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub account: Phone,
    pub shipping: ShippingInfo,
    pub product: ProductSnapshot,
}

// ============================================================================
// Ledger
// ============================================================================

/// The request ledger
pub struct RequestLedger {
    deposits: RwLock<Vec<DepositRequest>>,
    recharges: RwLock<Vec<RechargeRequest>>,
    packages: RwLock<Vec<PackageRequest>>,
    orders: RwLock<Vec<ShopOrder>>,
}

impl RequestLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            deposits: RwLock::new(Vec::new()),
            recharges: RwLock::new(Vec::new()),
            packages: RwLock::new(Vec::new()),
            orders: RwLock::new(Vec::new()),
        }
    }

    // ========================================================================
    // Append
    // ========================================================================

    /// Record a new pending deposit
    pub fn append_deposit(&self, draft: DepositDraft) -> DepositRequest {
        let record = DepositRequest {
            id: DepositId::new(),
            account: draft.account,
            amount: draft.amount,
            sender_number: draft.sender_number,
            trx_ref: draft.trx_ref,
            method: draft.method,
            status: DepositStatus::Pending,
            created_at: Utc::now(),
        };
        self.deposits.write().insert(0, record.clone());
        tracing::debug!(request = %record.id, account = %record.account, "deposit appended");
        record
    }

    /// Record a new pending recharge
    pub fn append_recharge(&self, draft: RechargeDraft) -> RechargeRequest {
        let record = RechargeRequest {
            id: RechargeId::new(),
            account: draft.account,
            target: draft.target,
            operator: draft.operator,
            amount: draft.amount,
            kind: draft.kind,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        self.recharges.write().insert(0, record.clone());
        tracing::debug!(request = %record.id, account = %record.account, "recharge appended");
        record
    }

    /// Record a new pending package purchase
    pub fn append_package(&self, draft: PackageDraft) -> PackageRequest {
        let record = PackageRequest {
            id: PackageRequestId::new(),
            account: draft.account,
            customer: draft.customer,
            offer: draft.offer,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };
        self.packages.write().insert(0, record.clone());
        tracing::debug!(request = %record.id, account = %record.account, "package appended");
        record
    }

    /// Record a new pending shop order
    pub fn append_order(&self, draft: OrderDraft) -> ShopOrder {
        let record = ShopOrder {
            id: OrderId::new(),
            account: draft.account,
            shipping: draft.shipping,
            product: draft.product,
            status: OrderStatus::Pending,
            admin_reply: None,
            created_at: Utc::now(),
        };
        self.orders.write().insert(0, record.clone());
        tracing::debug!(request = %record.id, account = %record.account, "order appended");
        record
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Look up a deposit by id
    pub fn deposit(&self, id: &DepositId) -> Result<DepositRequest> {
        self.deposits
            .read()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })
    }

    /// Look up a recharge by id
    pub fn recharge(&self, id: &RechargeId) -> Result<RechargeRequest> {
        self.recharges
            .read()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })
    }

    /// Look up a package purchase by id
    pub fn package(&self, id: &PackageRequestId) -> Result<PackageRequest> {
        self.packages
            .read()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })
    }

    /// Look up a shop order by id
    pub fn order(&self, id: &OrderId) -> Result<ShopOrder> {
        self.orders
            .read()
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })
    }

    /// All deposits, newest first
    pub fn deposits(&self) -> Vec<DepositRequest> {
        self.deposits.read().clone()
    }

    /// All recharges, newest first
    pub fn recharges(&self) -> Vec<RechargeRequest> {
        self.recharges.read().clone()
    }

    /// All package purchases, newest first
    pub fn packages(&self) -> Vec<PackageRequest> {
        self.packages.read().clone()
    }

    /// All shop orders, newest first
    pub fn orders(&self) -> Vec<ShopOrder> {
        self.orders.read().clone()
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    /// Move a pending deposit to a new status
    ///
    /// One-shot: fails with `InvalidTransition` unless the deposit is
    /// currently pending and the new status is not `Pending`.
    pub fn update_deposit_status(
        &self,
        id: &DepositId,
        new_status: DepositStatus,
    ) -> Result<DepositRequest> {
        let mut deposits = self.deposits.write();
        let record = deposits
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })?;

        if !record.status.is_pending() || new_status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: record.status.to_string(),
            });
        }

        record.status = new_status;
        tracing::debug!(request = %id, status = %new_status, "deposit status updated");
        Ok(record.clone())
    }

    /// Move a pending recharge to a new status
    pub fn update_recharge_status(
        &self,
        id: &RechargeId,
        new_status: RequestStatus,
    ) -> Result<RechargeRequest> {
        let mut recharges = self.recharges.write();
        let record = recharges
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })?;

        if !record.status.is_pending() || new_status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: record.status.to_string(),
            });
        }

        record.status = new_status;
        tracing::debug!(request = %id, status = %new_status, "recharge status updated");
        Ok(record.clone())
    }

    /// Move a pending package purchase to a new status
    pub fn update_package_status(
        &self,
        id: &PackageRequestId,
        new_status: RequestStatus,
    ) -> Result<PackageRequest> {
        let mut packages = self.packages.write();
        let record = packages
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })?;

        if !record.status.is_pending() || new_status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: record.status.to_string(),
            });
        }

        record.status = new_status;
        tracing::debug!(request = %id, status = %new_status, "package status updated");
        Ok(record.clone())
    }

    /// Move a pending shop order to a new status
    pub fn update_order_status(&self, id: &OrderId, new_status: OrderStatus) -> Result<ShopOrder> {
        let mut orders = self.orders.write();
        let record = orders
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })?;

        if !record.status.is_pending() || new_status.is_pending() {
            return Err(WalletError::InvalidTransition {
                id: id.to_string(),
                status: record.status.to_string(),
            });
        }

        record.status = new_status;
        tracing::debug!(request = %id, status = %new_status, "order status updated");
        Ok(record.clone())
    }

    /// Attach or replace the admin reply on a shop order
    ///
    /// Allowed regardless of status.
    pub fn set_admin_reply(&self, id: &OrderId, reply: impl Into<String>) -> Result<ShopOrder> {
        let mut orders = self.orders.write();
        let record = orders
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WalletError::RequestNotFound { id: id.to_string() })?;

        record.admin_reply = Some(reply.into());
        Ok(record.clone())
    }
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn deposit_draft() -> DepositDraft {
        DepositDraft {
            account: Phone::new("01712345678"),
            amount: dec!(100),
            sender_number: "01898765432".to_string(),
            trx_ref: "TRX123".to_string(),
            method: DepositMethod::Bkash,
        }
    }

    fn order_draft() -> OrderDraft {
        OrderDraft {
            account: Phone::new("01712345678"),
            shipping: ShippingInfo {
                customer_name: "Karim".to_string(),
                customer_phone: Phone::new("01712345678"),
                address: "12 Mirpur Road, Dhaka".to_string(),
            },
            product: ProductSnapshot {
                product_id: paytaka_types::ProductId::new(),
                title: "Smart Watch".to_string(),
                price: dec!(2500),
            },
        }
    }

    #[test]
    fn test_append_is_newest_first() {
        let ledger = RequestLedger::new();
        let first = ledger.append_deposit(deposit_draft());
        let second = ledger.append_deposit(deposit_draft());

        let deposits = ledger.deposits();
        assert_eq!(deposits[0].id, second.id);
        assert_eq!(deposits[1].id, first.id);
    }

    #[test]
    fn test_status_transition_is_one_shot() {
        let ledger = RequestLedger::new();
        let deposit = ledger.append_deposit(deposit_draft());

        let updated = ledger
            .update_deposit_status(&deposit.id, DepositStatus::Approved)
            .unwrap();
        assert_eq!(updated.status, DepositStatus::Approved);

        let again = ledger.update_deposit_status(&deposit.id, DepositStatus::Approved);
        assert!(matches!(again, Err(WalletError::InvalidTransition { .. })));
    }

    #[test]
    fn test_no_transition_back_to_pending() {
        let ledger = RequestLedger::new();
        let recharge = ledger.append_recharge(RechargeDraft {
            account: Phone::new("01712345678"),
            target: Phone::new("01711111111"),
            operator: OperatorId::new("gp"),
            amount: dec!(60),
            kind: OfferKind::Internet,
        });

        let result = ledger.update_recharge_status(&recharge.id, RequestStatus::Pending);
        assert!(matches!(result, Err(WalletError::InvalidTransition { .. })));
    }

    #[test]
    fn test_unknown_request_id() {
        let ledger = RequestLedger::new();
        let result = ledger.update_recharge_status(&RechargeId::new(), RequestStatus::Completed);
        assert!(matches!(result, Err(WalletError::RequestNotFound { .. })));
    }

    #[test]
    fn test_admin_reply_independent_of_status() {
        let ledger = RequestLedger::new();
        let order = ledger.append_order(order_draft());

        let replied = ledger.set_admin_reply(&order.id, "Shipping tomorrow").unwrap();
        assert_eq!(replied.admin_reply.as_deref(), Some("Shipping tomorrow"));

        ledger
            .update_order_status(&order.id, OrderStatus::Completed)
            .unwrap();

        // Still allowed after the order is resolved
        let replied = ledger.set_admin_reply(&order.id, "Delivered").unwrap();
        assert_eq!(replied.admin_reply.as_deref(), Some("Delivered"));
    }

    #[test]
    fn test_monetary_fields_survive_status_change() {
        let ledger = RequestLedger::new();
        let deposit = ledger.append_deposit(deposit_draft());

        let updated = ledger
            .update_deposit_status(&deposit.id, DepositStatus::Approved)
            .unwrap();
        assert_eq!(updated.amount, deposit.amount);
        assert_eq!(updated.trx_ref, deposit.trx_ref);
        assert_eq!(updated.created_at, deposit.created_at);
    }
}
