use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::commands::spending::CreateSpendingCommand;
use crate::domain::errors::{OverviewError, OverviewResult};
use crate::domain::models::SpendingRecord;
use shared::{CreateSpendingRequest, SpendingItem};

/// Colors spending items are drawn in
const PALETTE: [&str; 8] = [
    "#4F86C6", "#E07A5F", "#81B29A", "#F2CC8F", "#9B5DE5", "#F15BB5", "#00BBF9", "#3D405B",
];

pub struct SpendingMapper;

impl SpendingMapper {
    pub fn to_dto(domain: &SpendingRecord) -> SpendingItem {
        let id = domain.id.unwrap_or_default();
        SpendingItem {
            id,
            name: domain.name.clone(),
            price: domain.price,
            kilograms: domain.kilograms,
            quantity: domain.quantity,
            date_time_utc: domain.date_time_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
            color: Self::color_for(id).to_string(),
        }
    }

    pub fn to_command(dto: CreateSpendingRequest) -> OverviewResult<CreateSpendingCommand> {
        let date_time = dto
            .date_time
            .as_deref()
            .map(Self::parse_date_time)
            .transpose()?;

        Ok(CreateSpendingCommand {
            name: dto.name,
            price: dto.price,
            kilograms: dto.kilograms,
            quantity: dto.quantity,
            date_time,
        })
    }

    /// Stable per item, so an entry keeps its color across refreshes
    fn color_for(id: i64) -> &'static str {
        PALETTE[id.rem_euclid(PALETTE.len() as i64) as usize]
    }

    fn parse_date_time(value: &str) -> OverviewResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|date_time| date_time.with_timezone(&Utc))
            .map_err(|e| OverviewError::InvalidDate(format!("'{}': {}", value, e)))
    }
}
