//! Error types for PayTaka
//!
//! Every failure is returned explicitly to the immediate caller, and a
//! failed pre-check guarantees zero side effects. Nothing here is fatal to
//! the process.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for PayTaka operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// PayTaka error types
#[derive(Debug, Clone, Error)]
pub enum WalletError {
    // ========================================================================
    // Account Errors
    // ========================================================================

    /// Phone number already registered
    #[error("Phone {phone} is already registered")]
    DuplicatePhone { phone: String },

    /// Account not found
    #[error("Account not found: {phone}")]
    AccountNotFound { phone: String },

    /// Login credentials did not match
    #[error("Invalid credentials for {phone}")]
    InvalidCredentials { phone: String },

    /// Balance pre-check failed; no mutation occurred
    #[error("Insufficient funds for {phone}: requested {requested}, available {available}")]
    InsufficientFunds {
        phone: String,
        requested: Decimal,
        available: Decimal,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================

    /// Request id not present in its collection
    #[error("Request not found: {id}")]
    RequestNotFound { id: String },

    /// Status change attempted on a non-pending request
    #[error("Invalid transition for request {id}: status is {status}")]
    InvalidTransition { id: String, status: String },

    /// Amount must be positive
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    // ========================================================================
    // Catalog Errors
    // ========================================================================

    /// Offer not found in the catalog
    #[error("Offer not found: {id}")]
    OfferNotFound { id: String },

    /// Product not found in the shop
    #[error("Product not found: {id}")]
    ProductNotFound { id: String },
}

impl WalletError {
    /// Create an invalid-amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Get an error code for surface layers
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicatePhone { .. } => "DUPLICATE_PHONE",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::RequestNotFound { .. } => "REQUEST_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::OfferNotFound { .. } => "OFFER_NOT_FOUND",
            Self::ProductNotFound { .. } => "PRODUCT_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        let err = WalletError::InsufficientFunds {
            phone: "01712345678".to_string(),
            requested: dec!(100),
            available: dec!(40),
        };
        assert_eq!(err.error_code(), "INSUFFICIENT_FUNDS");
    }

    #[test]
    fn test_error_display() {
        let err = WalletError::DuplicatePhone {
            phone: "01712345678".to_string(),
        };
        assert_eq!(err.to_string(), "Phone 01712345678 is already registered");
    }
}
