//! Pure calendar arithmetic shared by the aggregation and grid code.
//!
//! Weekdays are numbered the way the calendar grid lays them out:
//! Sunday = 0 through Saturday = 6.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// Column headers for the calendar grid, Sunday first
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Check if a year is a leap year in the proleptic Gregorian calendar
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Get the number of days in a given month and year
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => if is_leap_year(year) { 29 } else { 28 },
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Weekday of the first day of the month (0 = Sunday, 1 = Monday, etc.).
/// `None` for a month outside 1..=12 or a year chrono can't represent.
pub fn weekday_offset(year: i32, month: u32) -> Option<u32> {
    YearMonth::new(year, month).map(|year_month| year_month.weekday_offset())
}

/// Add `delta` months to (year, month), carrying into the year in either
/// direction. The month may itself be out of range (0 or 13 are common when
/// a UI steps past a year boundary) and is normalized too.
pub fn step_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let new_year = index.div_euclid(12);
    let new_month = index.rem_euclid(12) + 1;
    let new_year = new_year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    (new_year, new_month as u32)
}

/// Get the human-readable name for a month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "Invalid Month",
    }
}

/// Short day label used by the spending list header, e.g. `5-3-2024`
pub fn format_day(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.day(), date.month(), date.year())
}

/// A calendar month that chrono can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    /// Returns `None` for months outside 1..=12 or years chrono can't represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::from_date)
    }

    /// Build a month from any month number, carrying overflow into the year.
    pub fn normalized(year: i32, month: i32) -> Option<Self> {
        let (year, month) = step_month(year, 1, month - 1);
        Self::new(year, month)
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        let first = date - Duration::days(i64::from(date.day0()));
        let last = first + Duration::days(i64::from(days_in_month(date.year(), date.month()) - 1));
        Self {
            year: date.year(),
            month: date.month(),
            first,
            last,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn weekday_offset(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Date of the given day of this month, if the day exists
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days_in_month() {
            return None;
        }
        Some(self.first + Duration::days(i64::from(day - 1)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Move by `delta` months; `None` only when leaving chrono's date range.
    pub fn step(&self, delta: i32) -> Option<Self> {
        let (year, month) = step_month(self.year, self.month, delta);
        Self::new(year, month)
    }

    pub fn previous(&self) -> Option<Self> {
        self.step(-1)
    }

    pub fn next(&self) -> Option<Self> {
        self.step(1)
    }

    /// e.g. "March 2024"
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
