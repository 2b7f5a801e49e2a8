//! The climogram handed to the charting layer: one category per month record,
//! precipitation bars on the left axis, temperature line on the right axis, and
//! dotted reference lines for the annual means.

use crate::types::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left axis, millimetres, starting at zero.
    Precipitation,
    /// Right axis, degrees Celsius.
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Bar,
    LineWithMarkers,
}

/// One plotted series. `values` lines up with [`ChartData::categories`]; gaps are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub axis: Axis,
    pub kind: SeriesKind,
    pub values: Vec<Option<f64>>,
}

/// A constant horizontal line across all categories.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub name: &'static str,
    pub axis: Axis,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub categories: Vec<&'static str>,
    pub precipitation: Series,
    pub temperature: Series,
    pub reference_lines: Vec<ReferenceLine>,
    /// Base name for image exports, e.g. `climograma_A001_2024`.
    pub export_name: String,
}

impl ChartData {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let categories = dataset.months.iter().map(|r| r.label()).collect();
        let precipitation = Series {
            name: "Precipitação mensal (mm)",
            axis: Axis::Precipitation,
            kind: SeriesKind::Bar,
            values: dataset.months.iter().map(|r| r.p).collect(),
        };
        let temperature = Series {
            name: "Temp. média mensal (°C)",
            axis: Axis::Temperature,
            kind: SeriesKind::LineWithMarkers,
            values: dataset.months.iter().map(|r| r.tmean).collect(),
        };

        let mut reference_lines = Vec::new();
        if let Some(value) = dataset.annual.p_month_mean.filter(|v| v.is_finite()) {
            reference_lines.push(ReferenceLine {
                name: "Precipitação média mensal (ano)",
                axis: Axis::Precipitation,
                value,
            });
        }
        if let Some(value) = dataset.annual.tmean.filter(|v| v.is_finite()) {
            reference_lines.push(ReferenceLine {
                name: "Temp. média anual (°C)",
                axis: Axis::Temperature,
                value,
            });
        }

        Self {
            categories,
            precipitation,
            temperature,
            reference_lines,
            export_name: format!("climograma_{}_{}", dataset.station, dataset.year),
        }
    }
}
