//! Spending aggregation by calendar day and month.
//!
//! Records carry UTC timestamps; grouping by day happens in whatever zone the
//! caller passes, so a purchase at 23:30 UTC can land on the next local day.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::date_math::YearMonth;
use crate::domain::models::SpendingRecord;

/// Total spent on one day of a month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayAggregate {
    pub day: u32,
    pub total: f64,
    pub record_count: usize,
}

/// Dense per-day totals for one month: always exactly `days_in_month` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotals {
    year_month: YearMonth,
    totals: Vec<f64>,
    counts: Vec<usize>,
}

impl DailyTotals {
    /// All-zero totals for a month with no spending
    pub fn empty(year_month: YearMonth) -> Self {
        let days = year_month.days_in_month() as usize;
        Self {
            year_month,
            totals: vec![0.0; days],
            counts: vec![0; days],
        }
    }

    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Index `i` holds the total for day `i + 1`
    pub fn as_slice(&self) -> &[f64] {
        &self.totals
    }

    /// Total for a 1-based day of the month.
    ///
    /// Panics if `day` is not a day of this month.
    pub fn day_total(&self, day: u32) -> f64 {
        assert!(day >= 1, "day of month is 1-based");
        self.totals[(day - 1) as usize]
    }

    /// Number of records on a 1-based day of the month.
    ///
    /// Panics if `day` is not a day of this month.
    pub fn record_count(&self, day: u32) -> usize {
        assert!(day >= 1, "day of month is 1-based");
        self.counts[(day - 1) as usize]
    }

    pub fn month_total(&self) -> f64 {
        month_total(&self.totals)
    }

    pub fn iter(&self) -> impl Iterator<Item = DayAggregate> + '_ {
        self.totals
            .iter()
            .zip(self.counts.iter())
            .enumerate()
            .map(|(index, (total, count))| DayAggregate {
                day: index as u32 + 1,
                total: *total,
                record_count: *count,
            })
    }

    fn add(&mut self, day: u32, price: f64) {
        let index = (day - 1) as usize;
        self.totals[index] += price;
        self.counts[index] += 1;
    }
}

/// Sum of prices for records in `[start_inclusive, end_exclusive)`, compared
/// as absolute instants.
pub fn total_for_range<Tz: TimeZone>(
    records: &[SpendingRecord],
    start_inclusive: &DateTime<Tz>,
    end_exclusive: &DateTime<Tz>,
) -> f64 {
    let start = start_inclusive.with_timezone(&Utc);
    let end = end_exclusive.with_timezone(&Utc);

    records
        .iter()
        .filter(|record| record.date_time_utc >= start && record.date_time_utc < end)
        .map(|record| record.price)
        .sum()
}

/// Per-day totals for `year_month`, grouping each record by its local date in
/// `zone`. Records outside the month are ignored.
pub fn daily_totals<Tz: TimeZone>(
    records: &[SpendingRecord],
    year_month: YearMonth,
    zone: &Tz,
) -> DailyTotals {
    let mut daily = DailyTotals::empty(year_month);

    for (day, day_records) in group_by_day(records, year_month, zone) {
        for record in day_records {
            daily.add(day, record.price);
        }
    }

    debug!(
        "Aggregated {} records into {} days for {} (month total {:.2})",
        records.len(),
        daily.len(),
        year_month,
        daily.month_total()
    );
    daily
}

/// Sum of a month's daily totals
pub fn month_total(daily_totals: &[f64]) -> f64 {
    daily_totals.iter().sum()
}

/// Records of `year_month` grouped by local day of month
pub fn group_by_day<'a, Tz: TimeZone>(
    records: &'a [SpendingRecord],
    year_month: YearMonth,
    zone: &Tz,
) -> BTreeMap<u32, Vec<&'a SpendingRecord>> {
    let mut by_day: BTreeMap<u32, Vec<&SpendingRecord>> = BTreeMap::new();

    for record in records {
        let local_date = record.date_time_utc.with_timezone(zone).date_naive();
        if year_month.contains(local_date) {
            by_day.entry(local_date.day()).or_default().push(record);
        }
    }

    by_day
}
