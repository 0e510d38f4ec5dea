pub mod aggregation;
pub mod reconcile;
pub mod time_billed;
