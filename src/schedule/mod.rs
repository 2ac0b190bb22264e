pub mod generator;
pub mod merge;

pub use generator::generate_lease_schedule;
pub use merge::{merge_schedule, merge_schedule_preserving_payments, ScheduleMerge};
