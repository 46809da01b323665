pub mod schedule;
pub mod summary;
pub mod batch;
