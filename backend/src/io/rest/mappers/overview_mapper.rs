use crate::domain::balance_service::BalanceSummary;
use crate::domain::calendar::{CalendarGrid as DomainCalendarGrid, GridCell};
use crate::domain::date_math::format_day;
use crate::domain::spending_overview::OverviewState;
use shared::{
    BalanceResponse, CalendarCell, CalendarCellType, CalendarGrid as SharedCalendarGrid,
    SpendingOverviewResponse,
};

use super::spending_mapper::SpendingMapper;

pub struct OverviewMapper;

impl OverviewMapper {
    pub fn to_dto(state: &OverviewState) -> SpendingOverviewResponse {
        SpendingOverviewResponse {
            selected_date: state.selected_date.to_string(),
            selected_date_label: format_day(state.selected_date),
            dates: state.dates.iter().map(|date| date.to_string()).collect(),
            spending: state.spending.iter().map(SpendingMapper::to_dto).collect(),
            balance: state.balance.balance,
            calendar: Self::grid_to_dto(&state.grid),
        }
    }

    pub fn grid_to_dto(grid: &DomainCalendarGrid) -> SharedCalendarGrid {
        SharedCalendarGrid {
            month: grid.year_month.month(),
            year: grid.year_month.year(),
            title: grid.year_month.title(),
            first_day_of_week: grid.first_weekday,
            days_in_month: grid.days_in_month,
            month_total: grid.month_total,
            weekday_labels: grid.weekday_labels().iter().map(|label| label.to_string()).collect(),
            columns: grid
                .columns()
                .iter()
                .map(|column| column.iter().map(Self::cell_to_dto).collect())
                .collect(),
        }
    }

    pub fn balance_to_dto(balance: &BalanceSummary) -> BalanceResponse {
        BalanceResponse {
            raw_balance: balance.raw_balance,
            balance: balance.balance,
        }
    }

    fn cell_to_dto(cell: &GridCell) -> CalendarCell {
        match cell {
            GridCell::Day(day) => CalendarCell {
                cell_type: CalendarCellType::MonthDay,
                day: day.day,
                date: Some(day.date.to_string()),
                total: day.total,
                intensity: day.intensity,
                has_spending: day.has_spending,
                record_count: day.record_count,
            },
            GridCell::PaddingBefore => Self::padding(CalendarCellType::PaddingBefore),
            GridCell::PaddingAfter => Self::padding(CalendarCellType::PaddingAfter),
        }
    }

    fn padding(cell_type: CalendarCellType) -> CalendarCell {
        CalendarCell {
            cell_type,
            day: 0,
            date: None,
            total: 0.0,
            intensity: 0.0,
            has_spending: false,
            record_count: 0,
        }
    }
}
