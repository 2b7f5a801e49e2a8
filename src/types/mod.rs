pub mod dataset;
pub mod station;
