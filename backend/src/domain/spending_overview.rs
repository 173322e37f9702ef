//! The spending overview: one date's purchases, the balance and the calendar
//! month, kept consistent with each other across user actions.
//!
//! Every action is a transition `(state, action) -> state`. Transitions read
//! the stores, rebuild whatever the action touches and return a fresh
//! [`OverviewState`]; nothing is patched in place. [`SpendingOverviewService`]
//! applies them one at a time and publishes each result as an immutable
//! snapshot. A failed transition publishes nothing, so readers keep seeing the
//! last good snapshot.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::domain::balance_service::{displayed_balance, BalanceService, BalanceSummary};
use crate::domain::calendar::{CalendarGrid, CalendarService};
use crate::domain::commands::balance::UpdateBalanceCommand;
use crate::domain::commands::spending::CreateSpendingCommand;
use crate::domain::date_math::YearMonth;
use crate::domain::errors::{OverviewError, OverviewResult};
use crate::domain::models::SpendingRecord;
use crate::storage::{Connection, SpendingStorage};

/// Immutable view of the overview after an action
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewState {
    pub selected_date: NaiveDate,
    /// Every date with at least one record, most recent first
    pub dates: Vec<NaiveDate>,
    /// Records on `selected_date`, most recently entered first
    pub spending: Vec<SpendingRecord>,
    pub balance: BalanceSummary,
    /// Calendar for the month being browsed
    pub grid: CalendarGrid,
}

impl OverviewState {
    pub fn year_month(&self) -> YearMonth {
        self.grid.year_month
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverviewAction {
    Load,
    SelectDate(NaiveDate),
    DeleteSpending(i64),
    ChangeMonth(i32),
    CreateSpending(CreateSpendingCommand),
    SetRawBalance(UpdateBalanceCommand),
}

/// Source of the current instant
pub type Clock = fn() -> DateTime<Utc>;

/// The transition function. Holds only collaborators, never view state.
#[derive(Clone)]
pub struct OverviewEngine<C: Connection> {
    spending_repository: C::SpendingRepository,
    balance_service: BalanceService<C>,
    calendar_service: CalendarService,
    zone: FixedOffset,
    clock: Clock,
}

impl<C: Connection> OverviewEngine<C> {
    /// `zone` decides which calendar day a timestamp belongs to. It should be
    /// the same zone the ledger store groups dates by.
    pub fn new(connection: Arc<C>, zone: FixedOffset) -> Self {
        Self {
            spending_repository: connection.create_spending_repository(),
            balance_service: BalanceService::new(connection),
            calendar_service: CalendarService::new(),
            zone,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Today's calendar date in the reference zone
    pub fn today(&self) -> NaiveDate {
        (self.clock)().with_timezone(&self.zone).date_naive()
    }

    /// Build the initial state: the most recent date with spending (today if
    /// there is none) and that date's month
    pub fn load(&self) -> OverviewResult<OverviewState> {
        let dates = self.distinct_dates()?;
        let selected_date = match dates.first() {
            Some(date) => *date,
            None => {
                let today = self.today();
                info!("No spending recorded yet, selecting today ({})", today);
                today
            }
        };
        self.rebuild(selected_date, YearMonth::from_date(selected_date))
    }

    /// Apply one action to `state`
    pub fn apply(&self, state: &OverviewState, action: OverviewAction) -> OverviewResult<OverviewState> {
        debug!("Applying {:?} to overview of {}", action, state.selected_date);
        match action {
            OverviewAction::Load => self.load(),
            OverviewAction::SelectDate(date) => self.select_date(state, date),
            OverviewAction::DeleteSpending(id) => self.delete_spending(state, id),
            OverviewAction::ChangeMonth(delta) => self.change_month(state, delta),
            OverviewAction::CreateSpending(command) => self.create_spending(state, command),
            OverviewAction::SetRawBalance(command) => self.set_raw_balance(state, command),
        }
    }

    /// Show exactly `date`'s records. The balance and the browsed month stay
    /// as they are.
    fn select_date(&self, state: &OverviewState, date: NaiveDate) -> OverviewResult<OverviewState> {
        let spending = self.spending_for(date)?;
        info!("Selected {}: {} records", date, spending.len());
        Ok(OverviewState {
            selected_date: date,
            spending,
            ..state.clone()
        })
    }

    fn delete_spending(&self, state: &OverviewState, id: i64) -> OverviewResult<OverviewState> {
        let deleted = self
            .spending_repository
            .delete_spending(id)
            .map_err(OverviewError::store)?;
        if deleted {
            info!("Deleted spending {}", id);
        } else {
            warn!("Spending {} not found, nothing deleted", id);
        }
        self.rebuild(state.selected_date, state.year_month())
    }

    fn change_month(&self, state: &OverviewState, delta: i32) -> OverviewResult<OverviewState> {
        let current = state.year_month();
        let year_month = current.step(delta).ok_or(OverviewError::MonthOutOfRange {
            year: current.year(),
            month: current.month(),
            delta,
        })?;
        info!("Browsing from {} to {}", current, year_month);

        let all_records = self.all_spending()?;
        Ok(OverviewState {
            grid: self
                .calendar_service
                .build_month_grid(&all_records, year_month, &self.zone),
            ..state.clone()
        })
    }

    fn create_spending(
        &self,
        state: &OverviewState,
        command: CreateSpendingCommand,
    ) -> OverviewResult<OverviewState> {
        let record = command.into_record((self.clock)())?;
        let stored = self
            .spending_repository
            .insert_spending(&record)
            .map_err(OverviewError::store)?;
        info!(
            "Recorded '{}' for {:.2} (id {:?})",
            stored.name, stored.price, stored.id
        );
        self.rebuild(state.selected_date, state.year_month())
    }

    fn set_raw_balance(
        &self,
        state: &OverviewState,
        command: UpdateBalanceCommand,
    ) -> OverviewResult<OverviewState> {
        let balance = self
            .balance_service
            .update_raw_balance_from_input(&command.input)?;
        Ok(OverviewState {
            balance,
            ..state.clone()
        })
    }

    /// Recompute everything from the stores for a selected date and month
    fn rebuild(&self, selected_date: NaiveDate, year_month: YearMonth) -> OverviewResult<OverviewState> {
        let all_records = self.all_spending()?;
        let dates = self.distinct_dates()?;
        let spending = self.spending_for(selected_date)?;
        let raw_balance = self.balance_service.raw_balance()?;
        let balance = BalanceSummary {
            raw_balance,
            balance: displayed_balance(raw_balance, &all_records),
        };
        let grid = self
            .calendar_service
            .build_month_grid(&all_records, year_month, &self.zone);

        info!(
            "Overview rebuilt: {} selected ({} records), {} dates, balance {:.2}, {} total {:.2}",
            selected_date,
            spending.len(),
            dates.len(),
            balance.balance,
            year_month,
            grid.month_total
        );

        Ok(OverviewState {
            selected_date,
            dates,
            spending,
            balance,
            grid,
        })
    }

    fn all_spending(&self) -> OverviewResult<Vec<SpendingRecord>> {
        self.spending_repository
            .list_all_spending()
            .map_err(OverviewError::store)
    }

    fn distinct_dates(&self) -> OverviewResult<Vec<NaiveDate>> {
        let mut dates = self
            .spending_repository
            .list_distinct_dates()
            .map_err(OverviewError::store)?;
        dates.reverse();
        Ok(dates)
    }

    fn spending_for(&self, date: NaiveDate) -> OverviewResult<Vec<SpendingRecord>> {
        let mut records = self
            .spending_repository
            .list_spending_by_date(date)
            .map_err(OverviewError::store)?;
        records.reverse();
        Ok(records)
    }
}

/// Serializes overview actions and publishes their snapshots.
///
/// Actions wait for the one in flight and are applied in arrival order, each
/// against the snapshot its predecessor published.
#[derive(Clone)]
pub struct SpendingOverviewService<C: Connection> {
    engine: OverviewEngine<C>,
    state: Arc<Mutex<Option<Arc<OverviewState>>>>,
}

impl<C: Connection> SpendingOverviewService<C> {
    pub fn new(connection: Arc<C>, zone: FixedOffset) -> Self {
        Self::from_engine(OverviewEngine::new(connection, zone))
    }

    pub fn from_engine(engine: OverviewEngine<C>) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(None)),
        }
    }

    /// Apply `action` to the current snapshot. Anything dispatched before the
    /// first load runs against a freshly loaded state.
    pub fn dispatch(&self, action: OverviewAction) -> OverviewResult<Arc<OverviewState>> {
        let mut current = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let next = match (current.as_deref(), action) {
            (_, OverviewAction::Load) => self.engine.load(),
            (Some(state), action) => self.engine.apply(state, action),
            (None, action) => {
                let loaded = self.engine.load()?;
                self.engine.apply(&loaded, action)
            }
        };

        let next = match next {
            Ok(state) => Arc::new(state),
            Err(error) => {
                warn!("Overview action failed, keeping previous snapshot: {}", error);
                return Err(error);
            }
        };
        *current = Some(Arc::clone(&next));
        Ok(next)
    }

    /// Last published snapshot, if anything was loaded yet
    pub fn snapshot(&self) -> Option<Arc<OverviewState>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn load_overview(&self) -> OverviewResult<Arc<OverviewState>> {
        self.dispatch(OverviewAction::Load)
    }

    pub fn select_date(&self, date: NaiveDate) -> OverviewResult<Arc<OverviewState>> {
        self.dispatch(OverviewAction::SelectDate(date))
    }

    pub fn delete_spending(&self, id: i64) -> OverviewResult<Arc<OverviewState>> {
        self.dispatch(OverviewAction::DeleteSpending(id))
    }

    pub fn change_month(&self, delta: i32) -> OverviewResult<Arc<OverviewState>> {
        self.dispatch(OverviewAction::ChangeMonth(delta))
    }

    pub fn create_spending(&self, command: CreateSpendingCommand) -> OverviewResult<Arc<OverviewState>> {
        self.dispatch(OverviewAction::CreateSpending(command))
    }

    pub fn set_raw_balance(&self, input: impl Into<String>) -> OverviewResult<Arc<OverviewState>> {
        self.dispatch(OverviewAction::SetRawBalance(UpdateBalanceCommand {
            input: input.into(),
        }))
    }
}
