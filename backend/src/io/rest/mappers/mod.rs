pub mod overview_mapper;
pub mod spending_mapper;

pub use overview_mapper::OverviewMapper;
pub use spending_mapper::SpendingMapper;
