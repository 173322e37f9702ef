pub mod spending;

pub use spending::{SpendingRecord, SpendingValidationError};
