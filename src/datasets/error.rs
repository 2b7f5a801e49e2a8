use crate::transport::error::TransportError;
use std::sync::Arc;
use thiserror::Error;

/// Why a dataset could not be produced.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to parse dataset JSON")]
    Parse(#[from] serde_json::Error),

    #[error("'{0}' is not a valid station id")]
    InvalidStationId(String),
}

/// No usable dataset exists for a (station, year) pair.
///
/// An expected condition: stations often lack some years. Every caller waiting on the
/// same fetch receives a clone of the same error. It is never cached, so a later request
/// retries the fetch.
#[derive(Debug, Error, Clone)]
#[error("No data for station '{station_id}' in {year} (expected at {url})")]
pub struct DatasetNotFound {
    pub station_id: String,
    pub year: i32,
    pub url: String,
    #[source]
    pub cause: Arc<LoadFailure>,
}
