//! # Storage Module
//!
//! Persistence for spending records and the raw balance. The domain layer only
//! sees the traits in [`traits`]; [`csv`] is the file-backed implementation the
//! server runs on.

pub mod csv;
pub mod traits;

pub use traits::{BalanceStorage, Connection, SpendingStorage};
