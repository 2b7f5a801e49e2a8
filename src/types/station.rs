//! Defines the data structures representing weather stations as they appear in the
//! station catalog (`stations.json`), plus the point type used for spatial indexing
//! with the `rstar` crate.

use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// --- Data Structures ---

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use climogram::LatLon;
///
/// let brasilia = LatLon(-15.7939, -47.8828);
/// assert_eq!(brasilia.0, -15.7939); // Latitude
/// assert_eq!(brasilia.1, -47.8828); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A single weather station from the catalog.
///
/// Stations are immutable once the catalog is loaded and are shared between the
/// catalog, the search index and the session state as `Arc<Station>`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// The station identifier (e.g., "A001"). Also the directory name of its datasets.
    pub id: String,
    /// The human readable station name.
    pub name: String,
    /// The two letter state code (e.g., "DF", "SP").
    pub uf: String,
    /// Latitude in decimal degrees, if known.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in decimal degrees, if known.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Elevation above sea level in meters, if known.
    #[serde(default)]
    pub alt: Option<f64>,
    /// Years for which a dataset was published. May be empty.
    #[serde(default)]
    pub years: BTreeSet<i32>,
}

impl Station {
    /// Returns the station location when both coordinates are known and finite.
    pub fn location(&self) -> Option<LatLon> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some(LatLon(lat, lon)),
            _ => None,
        }
    }

    /// Whether a dataset was published for `year`.
    pub fn has_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }
}

/// Whether `id` can name a dataset directory: ASCII letters, digits, `-`, `_` and `.`,
/// but not `.` or `..` on their own.
///
/// ```
/// use climogram::is_valid_station_id;
///
/// assert!(is_valid_station_id("A001"));
/// assert!(!is_valid_station_id("../A001"));
/// ```
pub fn is_valid_station_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

// --- R-Tree Implementations ---

/// A located station inside the catalog's R-tree.
///
/// Only stations with known coordinates are indexed, so the tree stores this
/// point instead of the [`Station`] itself. `index` points into the catalog's
/// canonical station list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StationPoint {
    pub(crate) location: LatLon,
    pub(crate) index: usize,
}

impl RTreeObject for StationPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.0, self.location.1])
    }
}

impl PointDistance for StationPoint {
    /// Squared Euclidean distance in degree space. Only used to order candidates
    /// inside the tree; reported distances are computed with haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.0 - point[0];
        let dy = self.location.1 - point[1];
        dx * dx + dy * dy
    }
}
