//! Which years a station offers and which one is picked when it is selected.

use crate::types::station::Station;

/// The year the dashboard opens on when a station publishes it.
pub const DEFAULT_YEAR: i32 = 2024;

/// A resolved, always valid year for a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelection {
    /// Selectable years, most recent first. Never empty.
    pub options: Vec<i32>,
    pub year: i32,
    /// The requested year was not selectable and was replaced by the default.
    pub corrected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearResolver {
    default_year: i32,
}

impl Default for YearResolver {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR)
    }
}

impl YearResolver {
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    pub fn default_year_setting(&self) -> i32 {
        self.default_year
    }

    /// The station's years, most recent first.
    ///
    /// A station without published years still offers the configured default year,
    /// even though loading it may well fail.
    pub fn options_for(&self, station: &Station) -> Vec<i32> {
        if station.years.is_empty() {
            return vec![self.default_year];
        }
        station.years.iter().rev().copied().collect()
    }

    /// The configured default year if it is among `options`, otherwise the most recent option.
    pub fn default_year(&self, options: &[i32]) -> i32 {
        if options.contains(&self.default_year) {
            self.default_year
        } else {
            options.first().copied().unwrap_or(self.default_year)
        }
    }

    /// Resolves `requested` against the station's options, falling back to the default.
    pub fn resolve(&self, station: &Station, requested: Option<i32>) -> YearSelection {
        let options = self.options_for(station);
        match requested {
            Some(year) if options.contains(&year) => YearSelection {
                options,
                year,
                corrected: false,
            },
            _ => YearSelection {
                year: self.default_year(&options),
                corrected: requested.is_some(),
                options,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_with_years(years: &[i32]) -> Station {
        Station {
            id: "A001".to_string(),
            name: "Brasília".to_string(),
            uf: "DF".to_string(),
            lat: None,
            lon: None,
            alt: None,
            years: years.iter().copied().collect(),
        }
    }

    #[test]
    fn test_options_are_descending() {
        let resolver = YearResolver::default();
        let station = station_with_years(&[2019, 2024, 2021]);
        assert_eq!(resolver.options_for(&station), vec![2024, 2021, 2019]);
    }

    #[test]
    fn test_empty_years_fall_back_to_default() {
        let resolver = YearResolver::new(2024);
        let station = station_with_years(&[]);
        assert_eq!(resolver.options_for(&station), vec![2024]);
        assert_eq!(resolver.default_year(&resolver.options_for(&station)), 2024);
    }

    #[test]
    fn test_default_year_preferred_when_present() {
        let resolver = YearResolver::new(2024);
        assert_eq!(resolver.default_year(&[2025, 2024, 2023]), 2024);
    }

    #[test]
    fn test_most_recent_when_default_absent() {
        let resolver = YearResolver::new(2024);
        let station = station_with_years(&[2018, 2020, 2022]);
        let options = resolver.options_for(&station);
        assert_eq!(resolver.default_year(&options), 2022);
    }

    #[test]
    fn test_stale_year_is_corrected() {
        let resolver = YearResolver::new(2024);
        let station = station_with_years(&[2015, 2016]);

        let selection = resolver.resolve(&station, Some(2024));
        assert_eq!(selection.year, 2016);
        assert!(selection.corrected);

        let selection = resolver.resolve(&station, Some(2015));
        assert_eq!(selection.year, 2015);
        assert!(!selection.corrected);

        let selection = resolver.resolve(&station, None);
        assert_eq!(selection.year, 2016);
        assert!(!selection.corrected);
    }
}
