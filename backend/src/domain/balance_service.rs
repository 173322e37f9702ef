//! Balance reconciliation for the spending tracker.
//!
//! The displayed balance is the raw balance the user set aside minus every
//! spending record ever stored. It is deliberately global: browsing to another
//! date or month filters the list and the calendar, never the balance.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{OverviewError, OverviewResult};
use crate::domain::models::SpendingRecord;
use crate::storage::{BalanceStorage, Connection, SpendingStorage};

/// Raw balance minus the price of every record in `all_records`
pub fn displayed_balance(raw_balance: f64, all_records: &[SpendingRecord]) -> f64 {
    let spent: f64 = all_records.iter().map(|record| record.price).sum();
    raw_balance - spent
}

/// Turn whatever the user typed into a balance. Anything that isn't a finite
/// number counts as 0.
pub fn parse_balance_input(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("Balance input '{}' is not a number, using 0", input);
            0.0
        }
    }
}

/// Raw and reconciled balance at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSummary {
    pub raw_balance: f64,
    pub balance: f64,
}

/// Service responsible for reading, updating and reconciling the balance
#[derive(Clone)]
pub struct BalanceService<C: Connection> {
    spending_repository: C::SpendingRepository,
    balance_repository: C::BalanceRepository,
}

impl<C: Connection> BalanceService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            spending_repository: connection.create_spending_repository(),
            balance_repository: connection.create_balance_repository(),
        }
    }

    pub fn raw_balance(&self) -> OverviewResult<f64> {
        self.balance_repository
            .get_raw_balance()
            .map_err(OverviewError::store)
    }

    /// Recompute the displayed balance from the stores' current contents.
    /// Nothing is cached, so a deleted record stops counting immediately.
    pub fn current_balance(&self) -> OverviewResult<BalanceSummary> {
        let raw_balance = self.raw_balance()?;
        let all_records = self
            .spending_repository
            .list_all_spending()
            .map_err(OverviewError::store)?;

        let balance = displayed_balance(raw_balance, &all_records);
        info!(
            "Balance: raw {:.2} - {} records = {:.2}",
            raw_balance,
            all_records.len(),
            balance
        );
        Ok(BalanceSummary { raw_balance, balance })
    }

    pub fn update_raw_balance(&self, raw_balance: f64) -> OverviewResult<BalanceSummary> {
        self.balance_repository
            .set_raw_balance(raw_balance)
            .map_err(OverviewError::store)?;
        self.current_balance()
    }

    /// Store a balance typed by the user, coercing non-numeric text to 0
    pub fn update_raw_balance_from_input(&self, input: &str) -> OverviewResult<BalanceSummary> {
        self.update_raw_balance(parse_balance_input(input))
    }
}
