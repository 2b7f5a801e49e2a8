//! Presentation-ready values for the renderer: chart series, map markers,
//! display strings and the CSV download.

pub mod chart;
pub mod export;
pub mod format;
pub mod map;
