//! Request records for the four ledger collections
//!
//! A request's monetary fields are immutable after creation; only the
//! status (and, for shop orders, the admin reply) may change. Every status
//! transition is a one-way edge - nothing returns to `Pending`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    DepositId, Offer, OfferId, OfferKind, OperatorId, OrderId, PackageRequestId, Phone, Product,
    ProductId, RechargeId,
};

// ============================================================================
// Status machines
// ============================================================================

/// Status of a deposit request
///
/// Deposits have no reject edge: a declined deposit simply stays pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Pending,
    Approved,
}

impl DepositStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

/// Status of a recharge or package request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Admin decision on a pending recharge or package request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestOutcome {
    Completed,
    Rejected,
}

impl From<RequestOutcome> for RequestStatus {
    fn from(outcome: RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Completed => Self::Completed,
            RequestOutcome::Rejected => Self::Rejected,
        }
    }
}

/// Status of a shop order
///
/// Not tied to any balance movement; purely informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

// ============================================================================
// Deposit
// ============================================================================

/// Payment channel the customer sent the deposit through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositMethod {
    Bkash,
    Upay,
}

impl fmt::Display for DepositMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bkash => write!(f, "bkash"),
            Self::Upay => write!(f, "upay"),
        }
    }
}

/// A credit request awaiting manual verification
///
/// No balance moves at creation; the account is credited when an admin
/// approves the deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub id: DepositId,
    /// Account to credit on approval
    pub account: Phone,
    pub amount: Decimal,
    /// Wallet number the money was sent from
    pub sender_number: String,
    /// Payment-channel transaction reference
    pub trx_ref: String,
    pub method: DepositMethod,
    pub status: DepositStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Recharge
// ============================================================================

/// A mobile recharge request
///
/// The amount is debited (held) at creation time and refunded in full if
/// the request is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeRequest {
    pub id: RechargeId,
    /// Account that pays for the recharge
    pub account: Phone,
    /// Number being recharged (not necessarily a registered account)
    pub target: Phone,
    pub operator: OperatorId,
    pub amount: Decimal,
    pub kind: OfferKind,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Package purchase
// ============================================================================

/// Offer fields frozen into a package request at purchase time
///
/// Snapshotting keeps historical requests unaffected by later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSnapshot {
    pub offer_id: OfferId,
    pub operator: OperatorId,
    pub title: String,
    pub data: String,
    pub minutes: String,
    pub validity: String,
    pub price: Decimal,
    pub cashback: Option<Decimal>,
    pub kind: OfferKind,
}

impl OfferSnapshot {
    pub fn cashback_or_zero(&self) -> Decimal {
        self.cashback.unwrap_or(Decimal::ZERO)
    }

    /// The net debit applied at purchase time, and therefore the amount
    /// refunded on rejection (the cashback stays with the customer)
    pub fn net_debit(&self) -> Decimal {
        self.price - self.cashback_or_zero()
    }
}

impl From<&Offer> for OfferSnapshot {
    fn from(offer: &Offer) -> Self {
        Self {
            offer_id: offer.id,
            operator: offer.operator.clone(),
            title: offer.title.clone(),
            data: offer.data.clone(),
            minutes: offer.minutes.clone(),
            validity: offer.validity.clone(),
            price: offer.price,
            cashback: offer.cashback,
            kind: offer.kind,
        }
    }
}

/// A package purchase awaiting admin fulfillment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRequest {
    pub id: PackageRequestId,
    /// Account that paid for the package
    pub account: Phone,
    /// Number the package is activated on
    pub customer: Phone,
    pub offer: OfferSnapshot,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Shop order
// ============================================================================

/// Product fields frozen into an order at checkout time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
        }
    }
}

/// Delivery details for a shop order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub customer_name: String,
    pub customer_phone: Phone,
    pub address: String,
}

/// A cash-on-delivery shop order
///
/// No wallet balance is involved; the admin reply is free text visible to
/// the customer and may be set at any time, independent of status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopOrder {
    pub id: OrderId,
    /// Account that placed the order
    pub account: Phone,
    pub shipping: ShippingInfo,
    pub product: ProductSnapshot,
    pub status: OrderStatus,
    pub admin_reply: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Activity feed
// ============================================================================

/// Which collection an activity entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Deposit,
    Recharge,
    Package,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Recharge => write!(f, "recharge"),
            Self::Package => write!(f, "package"),
        }
    }
}

/// Unified status for the merged activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Completed => write!(f, "completed"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl From<DepositStatus> for ActivityStatus {
    fn from(status: DepositStatus) -> Self {
        match status {
            DepositStatus::Pending => Self::Pending,
            DepositStatus::Approved => Self::Approved,
        }
    }
}

impl From<RequestStatus> for ActivityStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => Self::Pending,
            RequestStatus::Completed => Self::Completed,
            RequestStatus::Rejected => Self::Rejected,
        }
    }
}

/// One row of the merged recent-activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    /// Human-facing reference: trx ref for deposits, target number otherwise
    pub reference: String,
    pub amount: Decimal,
    pub status: ActivityStatus,
    /// Whether the entry credits the account (deposits) or debits it
    pub credit: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_machines() {
        assert!(DepositStatus::Pending.is_pending());
        assert!(!DepositStatus::Pending.is_terminal());
        assert!(DepositStatus::Approved.is_terminal());

        assert!(RequestStatus::Pending.is_pending());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());

        assert_eq!(
            RequestStatus::from(RequestOutcome::Rejected),
            RequestStatus::Rejected
        );
    }

    #[test]
    fn test_offer_snapshot_freezes_fields() {
        let offer = Offer {
            id: OfferId::new(),
            operator: OperatorId::new("bl"),
            title: "Power Pack".to_string(),
            data: "20 GB".to_string(),
            minutes: "500 Min".to_string(),
            validity: "30 Days".to_string(),
            price: dec!(699),
            cashback: Some(dec!(60)),
            kind: OfferKind::Bundle,
        };

        let snapshot = OfferSnapshot::from(&offer);
        assert_eq!(snapshot.price, dec!(699));
        assert_eq!(snapshot.net_debit(), dec!(639));
        assert_eq!(snapshot.offer_id, offer.id);
    }

    #[test]
    fn test_activity_status_mapping() {
        assert_eq!(
            ActivityStatus::from(DepositStatus::Approved),
            ActivityStatus::Approved
        );
        assert_eq!(
            ActivityStatus::from(RequestStatus::Rejected),
            ActivityStatus::Rejected
        );
    }
}
