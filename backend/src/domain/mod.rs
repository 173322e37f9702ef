//! # Domain Module
//!
//! Contains the business logic of the spending tracker: turning a ledger of
//! purchases and a raw balance into what the user browses.
//!
//! This module operates independently of any specific UI framework or storage
//! mechanism; storage is reached only through the traits in `crate::storage`.
//!
//! ## Module Organization
//!
//! - **date_math**: Weekday offsets, month lengths and month stepping
//! - **aggregation**: Per-day and per-month spending totals
//! - **balance_service**: Raw balance minus everything ever spent
//! - **calendar**: The 7-column month grid with per-day intensity
//! - **spending_overview**: Serialized actions over the whole overview
//!
//! ## Business Rules
//!
//! - Prices, weights and quantities are never negative
//! - The displayed balance counts every record, whatever date is browsed
//! - Grids and totals are recomputed on every query, never cached

pub mod aggregation;
pub mod balance_service;
pub mod calendar;
pub mod commands;
pub mod date_math;
pub mod errors;
pub mod models;
pub mod spending_overview;

pub use balance_service::{BalanceService, BalanceSummary};
pub use calendar::{CalendarGrid, CalendarService, DayCell, GridCell};
pub use date_math::YearMonth;
pub use errors::{OverviewError, OverviewResult};
pub use spending_overview::{OverviewAction, OverviewEngine, OverviewState, SpendingOverviewService};
