//! PayTaka Catalog - admin-owned offer and product reference data
//!
//! The catalog is not part of the money-movement core: it only feeds
//! price/cashback fields into requests at purchase time, and requests keep
//! their own snapshot of those fields. Deleting a catalog entry never
//! rewrites a historical request.
//!
//! Collections are kept newest-first, matching the display convention of
//! the request ledger.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use paytaka_types::{
    Offer, OfferId, OfferKind, Operator, OperatorId, Product, ProductId, Result, WalletError,
};

/// Input for a new catalog offer; the catalog assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDraft {
    pub operator: OperatorId,
    pub title: String,
    pub data: String,
    pub minutes: String,
    pub validity: String,
    pub price: Decimal,
    pub cashback: Option<Decimal>,
    pub kind: OfferKind,
}

/// Input for a new shop product; the catalog assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub price: Decimal,
    pub description: Option<String>,
}

/// The offer/product catalog
pub struct Catalog {
    /// Supported mobile operators (fixed set)
    operators: Vec<Operator>,
    offers: RwLock<Vec<Offer>>,
    products: RwLock<Vec<Product>>,
}

impl Catalog {
    /// Create a catalog with the supported operators and no offers/products
    pub fn new() -> Self {
        Self {
            operators: vec![
                Operator::new("gp", "Grameenphone", "GP"),
                Operator::new("bl", "Banglalink", "BL"),
                Operator::new("robi", "Robi", "Robi"),
                Operator::new("airtel", "Airtel", "Air"),
                Operator::new("teletalk", "Teletalk", "TT"),
            ],
            offers: RwLock::new(Vec::new()),
            products: RwLock::new(Vec::new()),
        }
    }

    /// Create a catalog pre-populated with the launch offers and products
    pub fn with_seed_data() -> Self {
        let catalog = Self::new();

        let seed_offers = [
            ("gp", "Monthly Blast", "10 GB", "200 Min", "30 Days", dec!(499), Some(dec!(50)), OfferKind::Bundle),
            ("gp", "Data Only", "5 GB", "0 Min", "7 Days", dec!(149), Some(dec!(10)), OfferKind::Internet),
            ("bl", "Power Pack", "20 GB", "500 Min", "30 Days", dec!(699), Some(dec!(60)), OfferKind::Bundle),
            ("bl", "Small Talk", "1 GB", "50 Min", "3 Days", dec!(58), None, OfferKind::Bundle),
            ("robi", "Internet Offer", "50 GB", "0 Min", "30 Days", dec!(999), Some(dec!(100)), OfferKind::Internet),
            ("airtel", "Fun Pack", "3 GB", "100 Min", "7 Days", dec!(198), Some(dec!(20)), OfferKind::Bundle),
        ];
        for (operator, title, data, minutes, validity, price, cashback, kind) in seed_offers {
            catalog.add_offer(OfferDraft {
                operator: OperatorId::new(operator),
                title: title.to_string(),
                data: data.to_string(),
                minutes: minutes.to_string(),
                validity: validity.to_string(),
                price,
                cashback,
                kind,
            });
        }

        catalog.add_product(ProductDraft {
            title: "Premium Headphone".to_string(),
            price: dec!(1200),
            description: Some("Best sound quality".to_string()),
        });
        catalog.add_product(ProductDraft {
            title: "Smart Watch".to_string(),
            price: dec!(2500),
            description: Some("Waterproof".to_string()),
        });

        catalog
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// The supported operators
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Look up an operator by id
    pub fn operator(&self, id: &OperatorId) -> Option<Operator> {
        self.operators.iter().find(|o| &o.id == id).cloned()
    }

    // ========================================================================
    // Offers
    // ========================================================================

    /// Add an offer (newest first)
    pub fn add_offer(&self, draft: OfferDraft) -> Offer {
        let offer = Offer {
            id: OfferId::new(),
            operator: draft.operator,
            title: draft.title,
            data: draft.data,
            minutes: draft.minutes,
            validity: draft.validity,
            price: draft.price,
            cashback: draft.cashback,
            kind: draft.kind,
        };
        self.offers.write().insert(0, offer.clone());
        tracing::debug!(offer = %offer.id, price = %offer.price, "offer added");
        offer
    }

    /// Remove an offer; historical requests keep their snapshot
    pub fn remove_offer(&self, id: &OfferId) -> Result<()> {
        let mut offers = self.offers.write();
        let before = offers.len();
        offers.retain(|o| &o.id != id);
        if offers.len() == before {
            return Err(WalletError::OfferNotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Look up an offer by id
    pub fn offer(&self, id: &OfferId) -> Result<Offer> {
        self.offers
            .read()
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| WalletError::OfferNotFound { id: id.to_string() })
    }

    /// All offers, newest first
    pub fn offers(&self) -> Vec<Offer> {
        self.offers.read().clone()
    }

    /// Offers for one operator, newest first
    pub fn offers_for(&self, operator: &OperatorId) -> Vec<Offer> {
        self.offers
            .read()
            .iter()
            .filter(|o| &o.operator == operator)
            .cloned()
            .collect()
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Add a shop product (newest first)
    pub fn add_product(&self, draft: ProductDraft) -> Product {
        let product = Product {
            id: ProductId::new(),
            title: draft.title,
            price: draft.price,
            description: draft.description,
        };
        self.products.write().insert(0, product.clone());
        tracing::debug!(product = %product.id, price = %product.price, "product added");
        product
    }

    /// Remove a product; historical orders keep their snapshot
    pub fn remove_product(&self, id: &ProductId) -> Result<()> {
        let mut products = self.products.write();
        let before = products.len();
        products.retain(|p| &p.id != id);
        if products.len() == before {
            return Err(WalletError::ProductNotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Look up a product by id
    pub fn product(&self, id: &ProductId) -> Result<Product> {
        self.products
            .read()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| WalletError::ProductNotFound { id: id.to_string() })
    }

    /// All products, newest first
    pub fn products(&self) -> Vec<Product> {
        self.products.read().clone()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
