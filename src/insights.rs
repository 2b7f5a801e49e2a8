//! Summary cards and narrative extremes derived from a loaded [`Dataset`].
//!
//! Everything here is a pure function of the dataset. Annual values are only
//! read and formatted; they are computed upstream.

use crate::presentation::format::{format_value, format_with_unit};
use crate::types::dataset::{Dataset, MonthlyRecord};

/// One statistic card: raw value plus its display string.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: Option<f64>,
    pub unit: &'static str,
    pub display: String,
}

impl SummaryCard {
    fn new(label: &'static str, value: Option<f64>, unit: &'static str) -> Self {
        Self {
            label,
            value,
            unit,
            display: format_with_unit(value, 1, unit),
        }
    }
}

/// The month holding an extreme value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthExtreme {
    /// Month number, 1 = January.
    pub month: u32,
    pub label: &'static str,
    pub value: f64,
}

impl MonthExtreme {
    fn of(record: &MonthlyRecord, value: f64) -> Self {
        Self {
            month: record.m,
            label: record.label(),
            value,
        }
    }
}

/// Everything shown next to the chart for one dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Insights {
    pub cards: Vec<SummaryCard>,
    pub wettest: Option<MonthExtreme>,
    pub driest: Option<MonthExtreme>,
    pub hottest: Option<MonthExtreme>,
    pub coolest: Option<MonthExtreme>,
    /// Wettest minus driest monthly precipitation (mm).
    pub seasonal_amplitude: Option<f64>,
    /// Hottest minus coolest monthly mean temperature (°C).
    pub thermal_amplitude: Option<f64>,
}

impl Insights {
    /// Whether any extreme could be derived from the monthly records.
    pub fn has_extremes(&self) -> bool {
        self.wettest.is_some() || self.hottest.is_some()
    }

    /// One sentence per available insight, in display order.
    pub fn narrative(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(m) = self.wettest {
            lines.push(format!("Mês mais chuvoso: {} ({} mm)", m.label, format_value(Some(m.value), 1)));
        }
        if let Some(m) = self.driest {
            lines.push(format!("Mês mais seco: {} ({} mm)", m.label, format_value(Some(m.value), 1)));
        }
        if let Some(amplitude) = self.seasonal_amplitude {
            lines.push(format!(
                "Amplitude sazonal da chuva: {} mm",
                format_value(Some(amplitude), 1)
            ));
        }
        if let Some(m) = self.hottest {
            lines.push(format!("Mês mais quente: {} ({} °C)", m.label, format_value(Some(m.value), 1)));
        }
        if let Some(m) = self.coolest {
            lines.push(format!("Mês mais frio: {} ({} °C)", m.label, format_value(Some(m.value), 1)));
        }
        if let Some(amplitude) = self.thermal_amplitude {
            lines.push(format!(
                "Amplitude térmica mensal: {} °C",
                format_value(Some(amplitude), 1)
            ));
        }
        lines
    }
}

pub struct InsightEngine;

impl InsightEngine {
    /// Derives cards and extremes from `dataset`. Sparse or empty months are fine.
    pub fn summarize(dataset: &Dataset) -> Insights {
        let a = &dataset.annual;
        let cards = vec![
            SummaryCard::new("T mín (ano)", a.tmin, "°C"),
            SummaryCard::new("T méd (ano)", a.tmean, "°C"),
            SummaryCard::new("T máx (ano)", a.tmax, "°C"),
            SummaryCard::new("Chuva total", a.p_total, "mm"),
            SummaryCard::new("Chuva mín (mês)", a.p_month_min, "mm"),
            SummaryCard::new("Chuva méd (mês)", a.p_month_mean, "mm"),
            SummaryCard::new("Chuva máx (mês)", a.p_month_max, "mm"),
            SummaryCard::new("Cobertura", a.coverage.map(|c| c * 100.0), "%"),
        ];

        let months = dataset.months_in_order();
        let wettest = extreme(&months, |r| r.p, |candidate, best| candidate > best);
        let driest = extreme(&months, |r| r.p, |candidate, best| candidate < best);
        let hottest = extreme(&months, |r| r.tmean, |candidate, best| candidate > best);
        let coolest = extreme(&months, |r| r.tmean, |candidate, best| candidate < best);

        Insights {
            cards,
            seasonal_amplitude: wettest.zip(driest).map(|(w, d)| w.value - d.value),
            thermal_amplitude: hottest.zip(coolest).map(|(h, c)| h.value - c.value),
            wettest,
            driest,
            hottest,
            coolest,
        }
    }
}

/// First record (in month order) whose finite value beats every other by `better`.
fn extreme(
    months: &[&MonthlyRecord],
    field: impl Fn(&MonthlyRecord) -> Option<f64>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<MonthExtreme> {
    months
        .iter()
        .filter_map(|record| {
            field(record)
                .filter(|v| v.is_finite())
                .map(|v| MonthExtreme::of(record, v))
        })
        .fold(None, |best: Option<MonthExtreme>, candidate| match best {
            Some(b) if !better(candidate.value, b.value) => Some(b),
            _ => Some(candidate),
        })
}
