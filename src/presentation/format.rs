//! Display strings for cards, list rows and tooltips.

use crate::types::station::Station;

/// Shown wherever a value is missing, so "unknown" never reads as `0` or `NaN`.
pub const PLACEHOLDER: &str = "—";

/// Formats `value` with `digits` decimals, or [`PLACEHOLDER`] when missing or not finite.
pub fn format_value(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", digits, v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Formats `value` followed by `unit`, e.g. `21.4 °C` or `— mm`.
pub fn format_with_unit(value: Option<f64>, digits: usize, unit: &str) -> String {
    format!("{} {}", format_value(value, digits), unit)
}

/// Coordinate rounded to four decimals, without trailing zeros.
pub fn format_coord(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => ((v * 10_000.0).round() / 10_000.0).to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// `NAME (UF)` heading of a station.
pub fn station_title(station: &Station) -> String {
    format!("{} ({})", station.name.to_uppercase(), station.uf)
}

/// `ID A001 • -15.7894, -47.9258 • alt: 1160 m` line under the heading.
pub fn station_meta(station: &Station) -> String {
    let alt = match station.alt {
        Some(alt) if alt.is_finite() => alt.to_string(),
        _ => PLACEHOLDER.to_string(),
    };
    format!(
        "ID {} • {}, {} • alt: {} m",
        station.id,
        format_coord(station.lat),
        format_coord(station.lon),
        alt
    )
}

/// `ID A001 • -15.7894, -47.9258 • anos: 12` line of a list row or map tooltip.
pub fn station_summary(station: &Station) -> String {
    format!(
        "ID {} • {}, {} • anos: {}",
        station.id,
        format_coord(station.lat),
        format_coord(station.lon),
        station.years.len()
    )
}
