use crate::stations::collation::CanonicalKey;
use crate::stations::error::CatalogError;
use crate::transport::Transport;
use crate::types::station::{is_valid_station_id, LatLon, Station, StationPoint};
use haversine::{distance, Location as HaversineLocation, Units};
use log::{info, warn};
use ordered_float::OrderedFloat;
use rstar::RTree;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The station list, loaded once per session and never mutated.
///
/// Stations are kept in canonical (state, name) order, indexed by id for
/// selection and by location for map queries.
#[derive(Debug, Clone)]
pub struct StationCatalog {
    stations: Vec<Arc<Station>>,
    by_id: HashMap<String, usize>,
    rtree: RTree<StationPoint>,
}

impl StationCatalog {
    /// Fetches and parses the catalog at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the transport fails and
    /// [`CatalogError::Malformed`] if the payload is not a JSON array of stations.
    pub async fn load<T: Transport>(transport: &T, path: &str) -> Result<Self, CatalogError> {
        let url = transport.describe(path);
        let bytes = transport
            .fetch(path)
            .await
            .map_err(|source| CatalogError::Unavailable {
                url: url.clone(),
                source,
            })?;
        let stations: Vec<Station> = serde_json::from_slice(&bytes)
            .map_err(|source| CatalogError::Malformed { url: url.clone(), source })?;
        info!("Parsed {} stations from {}", stations.len(), url);
        Ok(Self::from_stations(stations))
    }

    /// Builds the catalog from already parsed stations. Input order does not matter.
    ///
    /// Stations whose id cannot name a dataset directory are dropped.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(stations.len());
        let mut unique = Vec::with_capacity(stations.len());
        for station in stations {
            if !is_valid_station_id(&station.id) {
                warn!("Skipping station with invalid id '{}'", station.id);
                continue;
            }
            if !seen.insert(station.id.clone()) {
                warn!("Duplicate station id '{}' in catalog, keeping the first entry", station.id);
                continue;
            }
            unique.push(station);
        }
        unique.sort_by_cached_key(CanonicalKey::of);

        let stations: Vec<Arc<Station>> = unique.into_iter().map(Arc::new).collect();
        let by_id = stations
            .iter()
            .enumerate()
            .map(|(index, station)| (station.id.clone(), index))
            .collect();
        let points = stations
            .iter()
            .enumerate()
            .filter_map(|(index, station)| {
                station
                    .location()
                    .map(|location| StationPoint { location, index })
            })
            .collect();

        Self {
            stations,
            by_id,
            rtree: RTree::bulk_load(points),
        }
    }

    /// All stations in canonical order.
    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Arc<Station>> {
        self.by_id.get(id).map(|&index| &self.stations[index])
    }

    /// Finds up to `n_results` located stations within `max_distance_km` of `location`,
    /// closest first, with their great-circle distance in kilometers.
    pub fn nearest(
        &self,
        location: LatLon,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<(Arc<Station>, f64)> {
        if n_results == 0 {
            return vec![];
        }

        // Degree-space ordering only approximates haversine ordering, so over-fetch.
        let candidate_limit = (n_results * 2).max(20);

        let mut candidates: Vec<(usize, OrderedFloat<f64>)> = self
            .rtree
            .nearest_neighbor_iter(&[location.0, location.1])
            .take(candidate_limit)
            .filter_map(|point| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude: point.location.0,
                        longitude: point.location.1,
                    },
                    HaversineLocation {
                        latitude: location.0,
                        longitude: location.1,
                    },
                    Units::Kilometers,
                );
                (dist_km <= max_distance_km).then_some((point.index, OrderedFloat(dist_km)))
            })
            .collect();

        candidates.sort_by_key(|&(index, dist)| (dist, index));
        candidates.truncate(n_results);
        candidates
            .into_iter()
            .map(|(index, dist)| (self.stations[index].clone(), dist.into_inner()))
            .collect()
    }
}
