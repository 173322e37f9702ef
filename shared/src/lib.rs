use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spending entry as shown in the day list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingItem {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    /// Amount paid for this entry
    pub price: f64,
    pub kilograms: f64,
    pub quantity: f64,
    /// Timestamp in UTC (RFC 3339)
    pub date_time_utc: String,
    /// Decorative color picked when the item is read (hex, e.g. "#4F86C6")
    pub color: String,
}

/// Kind of calendar cell for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarCellType {
    /// Empty slot before the first day of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
    /// Empty slot after the last day, completing the final week
    PaddingAfter,
}

/// One slot of the calendar grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarCell {
    pub cell_type: CalendarCellType,
    /// Day of month, 0 for padding cells
    pub day: u32,
    /// ISO date (YYYY-MM-DD) for month days
    pub date: Option<String>,
    /// Total spent on this day
    pub total: f64,
    /// Day total relative to the month total, in [0, 1]
    pub intensity: f64,
    /// True when anything at all was spent on this day
    pub has_spending: bool,
    pub record_count: usize,
}

/// A month laid out as 7 weekday columns (Sunday first), each column running
/// down through the weeks of the month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarGrid {
    pub month: u32,
    pub year: i32,
    /// Human-readable title, e.g. "March 2024"
    pub title: String,
    pub first_day_of_week: u32, // 0 = Sunday, 1 = Monday, etc.
    pub days_in_month: u32,
    pub month_total: f64,
    pub weekday_labels: Vec<String>,
    pub columns: Vec<Vec<CalendarCell>>,
}

/// Everything the overview screen shows at once
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingOverviewResponse {
    /// Currently selected date (YYYY-MM-DD)
    pub selected_date: String,
    /// Selected date formatted as d-m-yyyy
    pub selected_date_label: String,
    /// All dates with spending, most recent first
    pub dates: Vec<String>,
    /// Spending on the selected date, most recently entered first
    pub spending: Vec<SpendingItem>,
    /// Raw balance minus everything ever spent
    pub balance: f64,
    pub calendar: CalendarGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectDateRequest {
    /// Date to select (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeMonthRequest {
    /// Months to move; negative goes back
    pub delta: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSpendingRequest {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub kilograms: f64,
    #[serde(default)]
    pub quantity: f64,
    /// Optional timestamp (RFC 3339) - uses current time if not provided
    #[serde(default)]
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceResponse {
    /// Money set aside by the user
    pub raw_balance: f64,
    /// Raw balance minus all recorded spending
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateBalanceRequest {
    /// Free-form text as typed by the user; anything non-numeric counts as 0
    pub balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl fmt::Display for CalendarCellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CalendarCellType::PaddingBefore => "padding-before",
            CalendarCellType::MonthDay => "month-day",
            CalendarCellType::PaddingAfter => "padding-after",
        };
        write!(f, "{}", label)
    }
}
