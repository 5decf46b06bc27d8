//! PayTaka Types - Canonical domain types for the mobile wallet
//!
//! This crate contains all foundational types for PayTaka with zero
//! dependencies on other paytaka crates. It defines the complete type
//! system for:
//!
//! - Identity types (Phone, DepositId, RechargeId, etc.)
//! - Accounts, roles, and balances
//! - The four request variants and their status machines
//! - Operator/offer/product catalog types
//! - The error taxonomy
//!
//! # Architectural Invariants
//!
//! These types support the core wallet invariants:
//!
//! 1. Balances never go negative
//! 2. A request's monetary fields are immutable after creation
//! 3. Status transitions are one-way; nothing returns to `Pending`
//! 4. Requests snapshot catalog prices, so later catalog edits never
//!    rewrite history

pub mod account;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod request;

pub use account::*;
pub use catalog::*;
pub use error::*;
pub use identity::*;
pub use request::*;

/// Version of the PayTaka types schema
pub const TYPES_VERSION: &str = "0.1.0";
