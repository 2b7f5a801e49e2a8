mod config;
mod dashboard;
mod datasets;
mod error;
mod insights;
mod presentation;
mod stations;
mod transport;
mod types;
mod years;

pub use config::*;
pub use dashboard::*;
pub use error::ClimogramError;

pub use transport::dir::DirTransport;
pub use transport::error::TransportError;
pub use transport::http::HttpTransport;
pub use transport::Transport;

pub use types::dataset::*;
pub use types::station::{is_valid_station_id, LatLon, Station};

pub use stations::catalog::StationCatalog;
pub use stations::collation::{canonical_cmp, fold};
pub use stations::error::{CatalogError, InvalidSelection};
pub use stations::search::*;

pub use years::*;

pub use datasets::cache::{CachePolicy, DatasetCache, DatasetKey};
pub use datasets::error::{DatasetNotFound, LoadFailure};
pub use datasets::loader::{DatasetLayout, DatasetLoader};

pub use insights::*;

pub use presentation::chart::*;
pub use presentation::export::*;
pub use presentation::format::*;
pub use presentation::map::*;
