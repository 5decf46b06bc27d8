//! Catalog reference data: operators, offers, and shop products
//!
//! Catalog entries are admin-owned reference data. Requests snapshot the
//! relevant fields at creation time, so editing or deleting a catalog entry
//! never changes a historical request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{OfferId, OperatorId, ProductId};

/// A mobile network operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: OperatorId,
    /// Full operator name (e.g., "Grameenphone")
    pub name: String,
    /// Short display code (e.g., "GP")
    pub short_code: String,
}

impl Operator {
    pub fn new(
        id: impl Into<OperatorId>,
        name: impl Into<String>,
        short_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_code: short_code.into(),
        }
    }
}

/// Kind of recharge or bundle offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    /// Data-only package
    Internet,
    /// Combined data + voice package
    Bundle,
    /// Voice-only package
    Voice,
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internet => write!(f, "internet"),
            Self::Bundle => write!(f, "bundle"),
            Self::Voice => write!(f, "voice"),
        }
    }
}

/// A purchasable data/voice bundle offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub operator: OperatorId,
    pub title: String,
    /// Data volume as displayed (e.g., "10 GB")
    pub data: String,
    /// Voice minutes as displayed (e.g., "200 Min")
    pub minutes: String,
    /// Validity window as displayed (e.g., "30 Days")
    pub validity: String,
    pub price: Decimal,
    /// Incentive credited to the buyer at purchase time
    pub cashback: Option<Decimal>,
    pub kind: OfferKind,
}

impl Offer {
    /// Cashback, treating "no cashback" as zero
    pub fn cashback_or_zero(&self) -> Decimal {
        self.cashback.unwrap_or(Decimal::ZERO)
    }

    /// The net amount the buyer's balance drops by at purchase time
    /// (price minus immediately-credited cashback)
    pub fn net_debit(&self) -> Decimal {
        self.price - self.cashback_or_zero()
    }
}

/// A physical product in the shop (cash-on-delivery)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn offer(price: Decimal, cashback: Option<Decimal>) -> Offer {
        Offer {
            id: OfferId::new(),
            operator: OperatorId::new("gp"),
            title: "Monthly Blast".to_string(),
            data: "10 GB".to_string(),
            minutes: "200 Min".to_string(),
            validity: "30 Days".to_string(),
            price,
            cashback,
            kind: OfferKind::Bundle,
        }
    }

    #[test]
    fn test_net_debit_with_cashback() {
        let o = offer(dec!(499), Some(dec!(50)));
        assert_eq!(o.cashback_or_zero(), dec!(50));
        assert_eq!(o.net_debit(), dec!(449));
    }

    #[test]
    fn test_net_debit_without_cashback() {
        let o = offer(dec!(58), None);
        assert_eq!(o.cashback_or_zero(), Decimal::ZERO);
        assert_eq!(o.net_debit(), dec!(58));
    }

    #[test]
    fn test_offer_kind_serde() {
        let json = serde_json::to_string(&OfferKind::Internet).unwrap();
        assert_eq!(json, "\"internet\"");
    }
}
