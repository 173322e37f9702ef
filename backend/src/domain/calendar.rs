//! Calendar domain logic for the spending tracker.
//!
//! Builds the month grid: 7 weekday columns, Sunday first, with each column
//! running down through the weeks of the month. The grid is rebuilt from
//! scratch for every query and never patched in place.

use chrono::{NaiveDate, TimeZone};
use tracing::{debug, info};

use crate::domain::aggregation::{daily_totals, DailyTotals};
use crate::domain::date_math::{YearMonth, WEEKDAY_LABELS};
use crate::domain::models::SpendingRecord;

pub const DAYS_PER_WEEK: usize = 7;

/// A day of the month with its spending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub total: f64,
    /// Share of the month's spending that fell on this day, in [0, 1]
    pub intensity: f64,
    /// Distinguishes a zero-spend day from a day with a tiny share
    pub has_spending: bool,
    pub record_count: usize,
}

/// One slot of the calendar grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    /// Empty slot before the first day of the month
    PaddingBefore,
    Day(DayCell),
    /// Empty slot after the last day, completing the final week
    PaddingAfter,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        !matches!(self, GridCell::Day(_))
    }

    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            GridCell::Day(day) => Some(day),
            _ => None,
        }
    }
}

/// Laid-out month. `cells` holds the `first_weekday + days_in_month` logical
/// cells; trailing padding only appears in the column view.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub year_month: YearMonth,
    /// 0 = Sunday, 1 = Monday, etc.
    pub first_weekday: u32,
    pub days_in_month: u32,
    pub month_total: f64,
    pub cells: Vec<GridCell>,
}

impl CalendarGrid {
    /// Number of week rows, `ceil(cells / 7)`
    pub fn rows(&self) -> usize {
        self.cells.len().div_ceil(DAYS_PER_WEEK)
    }

    /// Cell at a weekday column (0 = Sunday) and week row. Positions past the
    /// last day are trailing padding; `None` only for a column beyond Saturday.
    pub fn cell_at(&self, column: usize, row: usize) -> Option<GridCell> {
        if column >= DAYS_PER_WEEK {
            return None;
        }
        let index = row * DAYS_PER_WEEK + column;
        Some(self.cells.get(index).copied().unwrap_or(GridCell::PaddingAfter))
    }

    /// Column-major layout: one entry per weekday, each holding that weekday's
    /// cell for every week of the month
    pub fn columns(&self) -> Vec<Vec<GridCell>> {
        let rows = self.rows();
        (0..DAYS_PER_WEEK)
            .map(|column| {
                (0..rows)
                    .filter_map(|row| self.cell_at(column, row))
                    .collect()
            })
            .collect()
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        if day == 0 {
            return None;
        }
        self.cells
            .get(self.first_weekday as usize + day as usize - 1)
            .and_then(GridCell::as_day)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    pub fn weekday_labels(&self) -> [&'static str; DAYS_PER_WEEK] {
        WEEKDAY_LABELS
    }
}

/// A day's share of the month total, clamped to [0, 1]; 0 for an empty month
pub fn intensity(day_total: f64, month_total: f64) -> f64 {
    if month_total > 0.0 {
        (day_total / month_total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Calendar service that lays out months
#[derive(Debug, Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new() -> Self {
        Self
    }

    /// Aggregate `records` for the month in `zone` and lay the result out
    pub fn build_month_grid<Tz: TimeZone>(
        &self,
        records: &[SpendingRecord],
        year_month: YearMonth,
        zone: &Tz,
    ) -> CalendarGrid {
        info!("🗓️ CALENDAR: Building grid for {} from {} records", year_month, records.len());
        let daily = daily_totals(records, year_month, zone);
        self.build_grid(&daily)
    }

    /// Lay out already-aggregated daily totals
    pub fn build_grid(&self, daily: &DailyTotals) -> CalendarGrid {
        let year_month = daily.year_month();
        let offset = year_month.weekday_offset();
        let count = year_month.days_in_month();
        let month_total = daily.month_total();

        debug!(
            "🗓️ CALENDAR: {} starts on weekday {}, {} days, month total {:.2}",
            year_month, offset, count, month_total
        );

        let mut cells = Vec::with_capacity((offset + count) as usize);
        cells.extend((0..offset).map(|_| GridCell::PaddingBefore));

        for aggregate in daily.iter() {
            let Some(date) = year_month.day(aggregate.day) else {
                continue;
            };
            cells.push(GridCell::Day(DayCell {
                date,
                day: aggregate.day,
                total: aggregate.total,
                intensity: intensity(aggregate.total, month_total),
                has_spending: aggregate.total != 0.0,
                record_count: aggregate.record_count,
            }));
        }

        CalendarGrid {
            year_month,
            first_weekday: offset,
            days_in_month: count,
            month_total,
            cells,
        }
    }
}
