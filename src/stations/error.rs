use crate::transport::error::TransportError;
use thiserror::Error;

/// The station catalog could not be obtained. Without it the dashboard cannot start.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Station catalog unavailable at {url}")]
    Unavailable {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to parse station catalog from {url}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A selection that does not resolve to a loadable (station, year) pair.
///
/// The dashboard treats these as no-ops; they are reported so callers can log or ignore them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    #[error("Unknown station '{0}'")]
    UnknownStation(String),

    #[error("Station '{station_id}' has no data for {year}")]
    YearUnavailable { station_id: String, year: i32 },

    #[error("No station selected")]
    NoStationSelected,
}
