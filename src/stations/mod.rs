pub mod catalog;
pub mod collation;
pub mod error;
pub mod search;
