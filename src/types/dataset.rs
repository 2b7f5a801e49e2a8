//! Defines the per-station, per-year climate dataset as published in
//! `assets/data/<station>/<year>.json`.

use chrono::Month;
use serde::{Deserialize, Serialize};

/// Short month labels used on the chart axis, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Precomputed yearly aggregates. Every value may be missing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AnnualSummary {
    /// Lowest monthly mean temperature (°C).
    #[serde(default)]
    pub tmin: Option<f64>,
    /// Annual mean temperature (°C).
    #[serde(default)]
    pub tmean: Option<f64>,
    /// Highest monthly mean temperature (°C).
    #[serde(default)]
    pub tmax: Option<f64>,
    /// Total precipitation over the year (mm).
    #[serde(default)]
    pub p_total: Option<f64>,
    /// Lowest monthly precipitation (mm).
    #[serde(default)]
    pub p_month_min: Option<f64>,
    /// Mean monthly precipitation (mm).
    #[serde(default)]
    pub p_month_mean: Option<f64>,
    /// Highest monthly precipitation (mm).
    #[serde(default)]
    pub p_month_max: Option<f64>,
    /// Fraction of the year covered by observations, in `[0, 1]`.
    #[serde(default)]
    pub coverage: Option<f64>,
}

/// One month of a dataset. Months are sparse: absent months are simply not present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthlyRecord {
    /// Month number, 1 = January.
    pub m: u32,
    /// Mean temperature (°C).
    #[serde(default)]
    pub tmean: Option<f64>,
    /// Precipitation total (mm).
    #[serde(default)]
    pub p: Option<f64>,
}

impl MonthlyRecord {
    pub fn month(&self) -> Option<Month> {
        u8::try_from(self.m).ok().and_then(|m| Month::try_from(m).ok())
    }

    /// Axis label for this record; empty for month numbers outside 1..=12.
    pub fn label(&self) -> &'static str {
        self.month()
            .map(|m| MONTH_LABELS[m.number_from_month() as usize - 1])
            .unwrap_or("")
    }
}

/// The full monthly and annual record of one station in one year.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Dataset {
    pub station: String,
    pub year: i32,
    #[serde(default)]
    pub annual: AnnualSummary,
    #[serde(default)]
    pub months: Vec<MonthlyRecord>,
}

impl Dataset {
    /// Records sorted by month number. Stable, so duplicated months keep file order.
    pub fn months_in_order(&self) -> Vec<&MonthlyRecord> {
        let mut months: Vec<&MonthlyRecord> = self.months.iter().collect();
        months.sort_by_key(|record| record.m);
        months
    }
}
