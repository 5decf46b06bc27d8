//! PayTaka Accounts - the single source of truth for money
//!
//! The account store holds every user account (profile + balance fields).
//! All balance mutation in the system funnels through
//! [`AccountStore::apply_balance_delta`]; no other component writes balance
//! fields directly.
//!
//! # Invariants
//!
//! 1. No negative balances - deltas that would go negative are rejected
//!    before anything is written
//! 2. A rejected delta writes nothing (no partial update across the two
//!    balance fields)
//! 3. Accounts are created at registration and never deleted

mod credentials;
mod store;

pub use credentials::{hash_password, verify_password};
pub use store::{AccountStore, SeedAccount};
