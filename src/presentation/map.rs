use crate::presentation::format::{station_summary, station_title};
use crate::types::station::{LatLon, Station};
use std::sync::Arc;

/// Map centre and zoom before any station is selected (Brazil).
pub const DEFAULT_CENTER: LatLon = LatLon(-14.2, -55.9);
pub const DEFAULT_ZOOM: u8 = 4;
/// Zoom used when panning to a selected station.
pub const STATION_ZOOM: u8 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub station_id: String,
    pub location: LatLon,
    pub selected: bool,
    pub tooltip: String,
}

/// Markers for the current listing. Stations without coordinates are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    /// Located stations left out because of the marker cap.
    pub omitted: usize,
    /// Where the map is centred: the selected station if it is located, else Brazil.
    pub center: LatLon,
    pub zoom: u8,
}

impl MapView {
    pub fn build(stations: &[Arc<Station>], selected: Option<&Station>, max_points: usize) -> Self {
        let selected_id = selected.map(|s| s.id.as_str());
        let (center, zoom) = match selected.and_then(Station::location) {
            Some(location) => (location, STATION_ZOOM),
            None => (DEFAULT_CENTER, DEFAULT_ZOOM),
        };
        let located: Vec<(&Arc<Station>, LatLon)> = stations
            .iter()
            .filter_map(|station| station.location().map(|location| (station, location)))
            .collect();
        let omitted = located.len().saturating_sub(max_points);

        let markers = located
            .into_iter()
            .take(max_points)
            .map(|(station, location)| MapMarker {
                station_id: station.id.clone(),
                location,
                selected: selected_id == Some(station.id.as_str()),
                tooltip: format!("{}\n{}", station_title(station), station_summary(station)),
            })
            .collect();

        Self {
            markers,
            omitted,
            center,
            zoom,
        }
    }
}
