//! # CSV Storage Module
//!
//! File-based storage for the spending tracker. Everything lives in one data
//! directory:
//!
//! ```text
//! data/
//! ├── spending.csv             ← one row per spending record
//! ├── spending_sequence.yaml   ← next id to hand out
//! └── balance.yaml             ← the raw balance set by the user
//! ```
//!
//! ## File Format
//!
//! ```csv
//! id,name,price,kilograms,quantity,date_time_utc
//! 1,Bread,2.5,0.5,1,2024-03-05T09:00:00Z
//! 2,"Apples, red",3.75,1.5,6,2024-03-05T10:30:00Z
//! ```
//!
//! Every write rewrites the whole file through a temp file and a rename.
//! Ids only ever grow: the id of a deleted record is never reused.

pub mod balance_repository;
pub mod connection;
pub mod spending_repository;

#[cfg(test)]
pub mod test_utils;

pub use balance_repository::BalanceRepository;
pub use connection::CsvConnection;
pub use spending_repository::SpendingRepository;
