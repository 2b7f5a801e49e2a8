//! Policy knobs of the dashboard.
//!
//! All fields have defaults, so a configuration file only lists what it changes:
//!
//! ```
//! use climogram::DashboardConfig;
//!
//! let config = DashboardConfig::from_json(br#"{"min_query": 0, "max_results": null}"#).unwrap();
//! assert_eq!(config.min_query, 0);
//! assert_eq!(config.max_results, None);
//! assert_eq!(config.default_year, 2024);
//! ```

use crate::datasets::cache::CachePolicy;
use crate::datasets::loader::DatasetLayout;
use crate::stations::search::SearchPolicy;
use crate::years::DEFAULT_YEAR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Invalid dashboard configuration")]
pub struct ConfigError(#[from] serde_json::Error);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Year selected by default when the station offers it.
    pub default_year: i32,
    /// Minimum query length before the list is searched.
    pub min_query: usize,
    /// Cap on listed search results. `null` lists every match.
    pub max_results: Option<usize>,
    /// Cap on map markers.
    pub map_max_points: usize,
    /// Ignore accents when matching queries.
    pub fold_diacritics: bool,
    /// Path of the station catalog below the transport root.
    pub catalog_path: String,
    /// Directory holding `<station>/<year>` datasets below the transport root.
    pub data_base: String,
    /// Extension of dataset files.
    pub data_extension: String,
    /// Maximum number of cached datasets. `null` keeps all for the session.
    pub cache_max_entries: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let search = SearchPolicy::default();
        let layout = DatasetLayout::default();
        Self {
            default_year: DEFAULT_YEAR,
            min_query: search.min_query,
            max_results: search.max_results,
            map_max_points: 2000,
            fold_diacritics: search.fold_diacritics,
            catalog_path: "assets/stations.json".to_string(),
            data_base: layout.base,
            data_extension: layout.extension,
            cache_max_entries: CachePolicy::default().max_entries,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn search_policy(&self) -> SearchPolicy {
        SearchPolicy {
            min_query: self.min_query,
            max_results: self.max_results,
            fold_diacritics: self.fold_diacritics,
        }
    }

    pub fn dataset_layout(&self) -> DatasetLayout {
        DatasetLayout {
            base: self.data_base.clone(),
            extension: self.data_extension.clone(),
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            max_entries: self.cache_max_entries,
        }
    }
}
