//! Domain-level command types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod spending {
    use chrono::{DateTime, Utc};

    use crate::domain::errors::OverviewResult;
    use crate::domain::models::SpendingRecord;

    /// Input for recording a new purchase.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CreateSpendingCommand {
        pub name: String,
        pub price: f64,
        pub kilograms: f64,
        pub quantity: f64,
        /// When the purchase happened; `None` means now
        pub date_time: Option<DateTime<Utc>>,
    }

    impl CreateSpendingCommand {
        /// Validate into an unsaved record, stamping it with `now` when the
        /// command carries no timestamp
        pub fn into_record(self, now: DateTime<Utc>) -> OverviewResult<SpendingRecord> {
            let record = SpendingRecord::new(
                self.name,
                self.price,
                self.kilograms,
                self.quantity,
                self.date_time.unwrap_or(now),
            )?;
            Ok(record)
        }
    }
}

pub mod balance {
    /// Raw balance exactly as the user typed it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UpdateBalanceCommand {
        pub input: String,
    }
}
