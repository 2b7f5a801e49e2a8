//! This module provides the session controller behind the dashboard. It owns the
//! station catalog, the search index and the dataset cache, accepts the user's
//! commands (query typed, station picked, year changed) and publishes the
//! resulting [`ViewState`] for the presentation layer to render.

use crate::config::DashboardConfig;
use crate::datasets::error::DatasetNotFound;
use crate::datasets::loader::DatasetLoader;
use crate::error::ClimogramError;
use crate::insights::{InsightEngine, Insights};
use crate::presentation::chart::ChartData;
use crate::presentation::export::{export_csv, CsvExport, ExportError};
use crate::presentation::map::MapView;
use crate::stations::catalog::StationCatalog;
use crate::stations::error::InvalidSelection;
use crate::stations::search::{SearchIndex, SearchOutcome};
use crate::transport::Transport;
use crate::types::dataset::Dataset;
use crate::types::station::{LatLon, Station};
use crate::years::YearResolver;
use bon::bon;
use futures_util::future::join_all;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

/// A dataset together with everything derived from it for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub dataset: Arc<Dataset>,
    pub insights: Insights,
    pub chart: ChartData,
}

impl LoadedDataset {
    fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            insights: InsightEngine::summarize(&dataset),
            chart: ChartData::from_dataset(&dataset),
            dataset,
        }
    }
}

/// What the chart area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetView {
    /// No station selected yet.
    Idle,
    Loading { station_id: String, year: i32 },
    Ready(Arc<LoadedDataset>),
    /// The dataset could not be loaded; `url` is where it was expected.
    NotFound {
        station_id: String,
        year: i32,
        url: String,
    },
}

impl From<DatasetNotFound> for DatasetView {
    fn from(e: DatasetNotFound) -> Self {
        DatasetView::NotFound {
            station_id: e.station_id,
            year: e.year,
            url: e.url,
        }
    }
}

/// The user's current cursor: station, year and search text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub station: Option<Arc<Station>>,
    pub year: Option<i32>,
    pub query: String,
}

/// Snapshot published after every command.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Bumped on every station or year selection. Loads started under an older
    /// generation are discarded when they complete.
    pub generation: u64,
    pub selection: Selection,
    /// The station list for the last applied query.
    pub listing: SearchOutcome,
    /// Years offered for the selected station, most recent first.
    pub year_options: Vec<i32>,
    pub dataset: DatasetView,
}

/// Result of a selection command.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// The load finished and its result is now the published dataset view.
    Applied(DatasetView),
    /// A newer selection was made while loading; the result was dropped.
    Superseded,
    /// The command did not name a loadable selection; nothing changed.
    Ignored(InvalidSelection),
}

/// The session controller.
///
/// Create one with [`Dashboard::builder()`], which loads the station catalog, then drive
/// it with the `on_*` commands. Commands take `&self`, so a new selection can be made
/// while an earlier load is still waiting on the network; only the latest one is published.
///
/// # Examples
///
/// ```no_run
/// # use climogram::{Dashboard, DashboardConfig, HttpTransport, ClimogramError};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), ClimogramError> {
/// let transport = HttpTransport::new("https://example.org/climogramas/")?;
/// let dashboard = Dashboard::builder()
///     .transport(transport)
///     .config(DashboardConfig::default())
///     .build()
///     .await?;
///
/// let listing = dashboard.on_query_changed("brasília");
/// if let Some(station) = listing.stations.first() {
///     dashboard.on_station_selected(&station.id).await;
/// }
/// println!("{:?}", dashboard.view().dataset);
/// # Ok(())
/// # }
/// ```
pub struct Dashboard<T> {
    config: DashboardConfig,
    catalog: StationCatalog,
    search: SearchIndex,
    years: YearResolver,
    loader: DatasetLoader<T>,
    state: watch::Sender<ViewState>,
}

#[bon]
impl<T: Transport> Dashboard<T> {
    /// Loads the station catalog through `transport` and starts a session.
    ///
    /// # Errors
    ///
    /// Returns [`ClimogramError::Catalog`] if the catalog cannot be fetched or parsed.
    /// There is no degraded mode without a catalog.
    #[builder]
    pub async fn new(transport: T, config: Option<DashboardConfig>) -> Result<Self, ClimogramError> {
        let config = config.unwrap_or_default();
        let catalog = StationCatalog::load(&transport, &config.catalog_path).await?;
        Ok(Self::from_catalog(transport, catalog, config))
    }

    /// Starts a session over an already loaded catalog.
    pub fn from_catalog(transport: T, catalog: StationCatalog, config: DashboardConfig) -> Self {
        let search = SearchIndex::new(catalog.stations().iter().cloned(), config.search_policy());
        let years = YearResolver::new(config.default_year);
        let loader = DatasetLoader::new(transport, config.dataset_layout(), config.cache_policy());

        let initial = ViewState {
            generation: 0,
            selection: Selection::default(),
            listing: search.apply(""),
            year_options: vec![config.default_year],
            dataset: DatasetView::Idle,
        };
        let (state, _) = watch::channel(initial);
        info!("Dashboard ready with {} stations", catalog.len());

        Self {
            config,
            catalog,
            search,
            years,
            loader,
            state,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn loader(&self) -> &DatasetLoader<T> {
        &self.loader
    }

    /// A copy of the current state.
    pub fn view(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receives every published state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    // --- Commands ---

    /// Re-filters the station list. The selected station stays selected even if it no
    /// longer matches.
    pub fn on_query_changed(&self, query: &str) -> SearchOutcome {
        let listing = self.search.apply(query);
        self.state.send_modify(|state| {
            state.selection.query = query.to_string();
            state.listing = listing.clone();
        });
        listing
    }

    /// Clears the query and lists every station.
    pub fn on_show_all(&self) -> SearchOutcome {
        let listing = self.search.show_all();
        self.state.send_modify(|state| {
            state.selection.query.clear();
            state.listing = listing.clone();
        });
        listing
    }

    /// Selects a station, picks its default year and loads that dataset.
    ///
    /// Unknown ids are ignored.
    pub async fn on_station_selected(&self, station_id: &str) -> Dispatch {
        let Some(station) = self.catalog.find_by_id(station_id).cloned() else {
            debug!("Ignoring selection of unknown station '{}'", station_id);
            return Dispatch::Ignored(InvalidSelection::UnknownStation(station_id.to_string()));
        };
        let resolved = self.years.resolve(&station, None);
        let year = resolved.year;
        let generation = self.begin(station.clone(), year, resolved.options);
        self.load(generation, &station.id, year).await
    }

    /// Switches the selected station to another of its years.
    ///
    /// Years the station does not offer are ignored.
    pub async fn on_year_changed(&self, year: i32) -> Dispatch {
        let station = self.state.borrow().selection.station.clone();
        let Some(station) = station else {
            return Dispatch::Ignored(InvalidSelection::NoStationSelected);
        };
        let resolved = self.years.resolve(&station, Some(year));
        if resolved.corrected {
            debug!("Ignoring unavailable year {} for station {}", year, station.id);
            return Dispatch::Ignored(InvalidSelection::YearUnavailable {
                station_id: station.id.clone(),
                year,
            });
        }
        let generation = self.begin(station.clone(), year, resolved.options);
        self.load(generation, &station.id, year).await
    }

    /// Loads the current selection again, e.g. after a dataset was not found.
    pub async fn reload(&self) -> Dispatch {
        let (station, year) = {
            let state = self.state.borrow();
            (state.selection.station.clone(), state.selection.year)
        };
        let (Some(station), Some(year)) = (station, year) else {
            return Dispatch::Ignored(InvalidSelection::NoStationSelected);
        };
        let options = self.years.options_for(&station);
        let generation = self.begin(station.clone(), year, options);
        self.load(generation, &station.id, year).await
    }

    // --- Queries ---

    /// Warms the cache with every year of a station. Returns how many loaded.
    ///
    /// The published state is not touched.
    pub async fn prefetch(&self, station_id: &str) -> usize {
        let Some(station) = self.catalog.find_by_id(station_id) else {
            return 0;
        };
        let options = self.years.options_for(station);
        let results = join_all(
            options
                .iter()
                .map(|&year| self.loader.load(&station.id, year)),
        )
        .await;
        let loaded = results.iter().filter(|r| r.is_ok()).count();
        debug!("Prefetched {}/{} years of {}", loaded, options.len(), station.id);
        loaded
    }

    /// Map markers for the current listing, capped at `map_max_points`.
    pub fn map_view(&self) -> MapView {
        let state = self.state.borrow();
        MapView::build(
            &state.listing.stations,
            state.selection.station.as_deref(),
            self.config.map_max_points,
        )
    }

    /// CSV of the dataset on screen, or `None` if no dataset is loaded.
    pub fn export_csv(&self) -> Result<Option<CsvExport>, ExportError> {
        let state = self.state.borrow();
        match &state.dataset {
            DatasetView::Ready(loaded) => export_csv(&loaded.dataset).map(Some),
            _ => Ok(None),
        }
    }

    /// Finds stations near a map position, closest first.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The position to search around.
    /// * `.max_distance_km(f64)`: Optional. Search radius, defaults to `50.0`.
    /// * `.station_limit(usize)`: Optional. Maximum number of stations, defaults to `5`.
    #[builder]
    pub fn stations_near(
        &self,
        location: LatLon,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
    ) -> Vec<Arc<Station>> {
        let max_distance_km = max_distance_km.unwrap_or(50.0);
        let station_limit = station_limit.unwrap_or(5);
        self.catalog
            .nearest(location, station_limit, max_distance_km)
            .into_iter()
            .map(|(station, _distance)| station)
            .collect()
    }

    // --- Internals ---

    /// Records a new selection and returns its generation.
    fn begin(&self, station: Arc<Station>, year: i32, options: Vec<i32>) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.dataset = DatasetView::Loading {
                station_id: station.id.clone(),
                year,
            };
            state.selection.station = Some(station);
            state.selection.year = Some(year);
            state.year_options = options;
        });
        generation
    }

    async fn load(&self, generation: u64, station_id: &str, year: i32) -> Dispatch {
        let view = match self.loader.load(station_id, year).await {
            Ok(dataset) => DatasetView::Ready(Arc::new(LoadedDataset::new(dataset))),
            Err(e) => DatasetView::from(e),
        };

        let applied = self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.dataset = view.clone();
            true
        });
        if applied {
            Dispatch::Applied(view)
        } else {
            debug!(
                "Discarding stale result for {}:{} (generation {})",
                station_id, year, generation
            );
            Dispatch::Superseded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::map::{DEFAULT_CENTER, DEFAULT_ZOOM, STATION_ZOOM};
    use crate::stations::search::SearchHint;
    use crate::transport::mock::MockTransport;

    const CATALOG: &str = r#"[
        {"id":"A001","name":"Brasília","uf":"DF","lat":-15.7894,"lon":-47.9258,"alt":1160.0,"years":[2022,2023,2024]},
        {"id":"A045","name":"Águas Emendadas","uf":"DF","lat":-15.5964,"lon":-47.6258,"alt":1030.0,"years":[2015,2016]},
        {"id":"A101","name":"Manaus","uf":"AM","lat":-3.1036,"lon":-60.0160,"alt":61.0,"years":[]},
        {"id":"A701","name":"São Paulo - Mirante","uf":"SP","lat":-23.4963,"lon":-46.6200,"alt":785.0,"years":[2024]}
    ]"#;

    fn dataset_json(station: &str, year: i32, wet: f64) -> String {
        format!(
            r#"{{"station":"{station}","year":{year},
                "annual":{{"tmean":21.4,"p_month_mean":120.0}},
                "months":[{{"m":1,"tmean":22.0,"p":{wet}}},{{"m":7,"tmean":19.5,"p":3.2}}]}}"#
        )
    }

    fn transport() -> MockTransport {
        MockTransport::new()
            .with("assets/stations.json", CATALOG)
            .with("assets/data/A001/2024.json", dataset_json("A001", 2024, 240.0))
            .with("assets/data/A001/2023.json", dataset_json("A001", 2023, 180.0))
            .with("assets/data/A045/2016.json", dataset_json("A045", 2016, 150.0))
            .with("assets/data/A701/2024.json", dataset_json("A701", 2024, 260.0))
    }

    async fn dashboard(transport: &MockTransport) -> Dashboard<&MockTransport> {
        Dashboard::builder()
            .transport(transport)
            .build()
            .await
            .expect("catalog should load")
    }

    fn ready(view: &DatasetView) -> &LoadedDataset {
        match view {
            DatasetView::Ready(loaded) => loaded,
            other => panic!("expected a loaded dataset, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_initial_state() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        let view = dashboard.view();
        assert_eq!(view.generation, 0);
        assert_eq!(view.dataset, DatasetView::Idle);
        assert_eq!(view.year_options, vec![2024]);
        assert!(view.listing.stations.is_empty());
        assert_eq!(view.listing.hint, SearchHint::TypeMore { min_len: 2 });
    }

    #[tokio::test]
    async fn test_missing_catalog_is_fatal() {
        let transport = MockTransport::new();
        let result = Dashboard::builder().transport(&transport).build().await;
        assert!(matches!(result, Err(ClimogramError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_query_updates_listing_and_keeps_selection() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        dashboard.on_station_selected("A001").await;

        let listing = dashboard.on_query_changed("df");
        let ids: Vec<&str> = listing.stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A045", "A001"]);

        dashboard.on_query_changed("manaus");
        let view = dashboard.view();
        assert_eq!(view.selection.query, "manaus");
        assert_eq!(view.listing.stations.len(), 1);
        assert_eq!(view.selection.station.map(|s| s.id.clone()), Some("A001".to_string()));
    }

    #[tokio::test]
    async fn test_show_all_clears_query() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        dashboard.on_query_changed("manaus");
        let listing = dashboard.on_show_all();
        assert_eq!(listing.stations.len(), 4);
        assert_eq!(dashboard.view().selection.query, "");
    }

    #[tokio::test]
    async fn test_select_station_loads_default_year() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;

        let dispatch = dashboard.on_station_selected("A001").await;
        let Dispatch::Applied(view) = dispatch else {
            panic!("expected the load to be applied");
        };
        let loaded = ready(&view);
        assert_eq!(loaded.dataset.year, 2024);
        assert_eq!(loaded.insights.wettest.map(|m| m.month), Some(1));
        assert_eq!(loaded.chart.categories, vec!["Jan", "Jul"]);

        let state = dashboard.view();
        assert_eq!(state.selection.year, Some(2024));
        assert_eq!(state.year_options, vec![2024, 2023, 2022]);
        assert_eq!(state.generation, 1);
    }

    #[tokio::test]
    async fn test_unknown_station_is_a_no_op() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        let before = dashboard.view();
        let dispatch = dashboard.on_station_selected("ZZZZ").await;
        assert_eq!(
            dispatch,
            Dispatch::Ignored(InvalidSelection::UnknownStation("ZZZZ".to_string()))
        );
        assert_eq!(dashboard.view(), before);
    }

    #[tokio::test]
    async fn test_year_change() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;

        assert_eq!(
            dashboard.on_year_changed(2023).await,
            Dispatch::Ignored(InvalidSelection::NoStationSelected)
        );

        dashboard.on_station_selected("A001").await;
        let dispatch = dashboard.on_year_changed(2023).await;
        assert!(matches!(dispatch, Dispatch::Applied(DatasetView::Ready(_))));
        assert_eq!(ready(&dashboard.view().dataset).dataset.year, 2023);

        let dispatch = dashboard.on_year_changed(1999).await;
        assert_eq!(
            dispatch,
            Dispatch::Ignored(InvalidSelection::YearUnavailable {
                station_id: "A001".to_string(),
                year: 1999
            })
        );
        assert_eq!(dashboard.view().selection.year, Some(2023));
    }

    #[tokio::test]
    async fn test_switching_station_rederives_year() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        dashboard.on_station_selected("A001").await;
        dashboard.on_year_changed(2022).await;

        // A045 has neither 2022 nor the default year: its most recent year is picked
        dashboard.on_station_selected("A045").await;
        let state = dashboard.view();
        assert_eq!(state.selection.year, Some(2016));
        assert_eq!(state.year_options, vec![2016, 2015]);
        assert_eq!(ready(&state.dataset).dataset.station, "A045");
    }

    #[tokio::test]
    async fn test_missing_dataset_then_reload() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;

        // Manaus publishes no years, so the default year is tried and is missing
        let dispatch = dashboard.on_station_selected("A101").await;
        assert_eq!(
            dispatch,
            Dispatch::Applied(DatasetView::NotFound {
                station_id: "A101".to_string(),
                year: 2024,
                url: "mock://assets/data/A101/2024.json".to_string(),
            })
        );
        assert_eq!(dashboard.view().year_options, vec![2024]);
        assert_eq!(dashboard.export_csv().unwrap(), None);

        transport.insert("assets/data/A101/2024.json", dataset_json("A101", 2024, 300.0));
        let dispatch = dashboard.reload().await;
        assert!(matches!(dispatch, Dispatch::Applied(DatasetView::Ready(_))));
        assert_eq!(transport.fetches_of("assets/data/A101/2024.json"), 2);
    }

    #[tokio::test]
    async fn test_repeated_selection_hits_cache() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        dashboard.on_station_selected("A001").await;
        dashboard.on_station_selected("A701").await;
        dashboard.on_station_selected("A001").await;
        assert_eq!(transport.fetches_of("assets/data/A001/2024.json"), 1);
    }

    #[tokio::test]
    async fn test_stale_load_does_not_clobber_newer_selection() {
        let transport = transport();
        let gate = transport.gate("assets/data/A001/2024.json");
        let dashboard = dashboard(&transport).await;

        let (first, second) = tokio::join!(dashboard.on_station_selected("A001"), async {
            let dispatch = dashboard.on_station_selected("A701").await;
            gate.notify_one();
            dispatch
        });

        assert_eq!(first, Dispatch::Superseded);
        assert!(matches!(second, Dispatch::Applied(DatasetView::Ready(_))));

        let state = dashboard.view();
        assert_eq!(state.generation, 2);
        assert_eq!(state.selection.station.map(|s| s.id.clone()), Some("A701".to_string()));
        assert_eq!(ready(&state.dataset).dataset.station, "A701");

        // The slow response was still cached for later
        assert!(dashboard.loader().cached("A001", 2024).await.is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        let mut rx = dashboard.subscribe();
        assert!(!rx.has_changed().unwrap());

        dashboard.on_station_selected("A701").await;
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(ready(&state.dataset).dataset.station, "A701");
    }

    #[tokio::test]
    async fn test_export_csv_of_loaded_dataset() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        assert_eq!(dashboard.export_csv().unwrap(), None);

        dashboard.on_station_selected("A001").await;
        let export = dashboard.export_csv().unwrap().unwrap();
        assert_eq!(export.filename, "climograma_A001_2024.csv");
        assert_eq!(
            export.content,
            "station,year,month,tmean_c,precip_mm\nA001,2024,1,22,240\nA001,2024,7,19.5,3.2"
        );
    }

    #[tokio::test]
    async fn test_map_view_follows_listing() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        let map = dashboard.map_view();
        assert!(map.markers.is_empty());
        assert_eq!((map.center, map.zoom), (DEFAULT_CENTER, DEFAULT_ZOOM));

        dashboard.on_show_all();
        dashboard.on_station_selected("A001").await;
        let map = dashboard.map_view();
        assert_eq!(map.markers.len(), 4);
        assert_eq!(map.omitted, 0);
        let selected: Vec<&str> = map
            .markers
            .iter()
            .filter(|m| m.selected)
            .map(|m| m.station_id.as_str())
            .collect();
        assert_eq!(selected, vec!["A001"]);
        assert_eq!(map.center, LatLon(-15.7894, -47.9258));
        assert_eq!(map.zoom, STATION_ZOOM);
    }

    #[tokio::test]
    async fn test_stations_near() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        let near = dashboard
            .stations_near()
            .location(LatLon(-15.78, -47.92))
            .call();
        let ids: Vec<&str> = near.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A001", "A045"]);

        let near = dashboard
            .stations_near()
            .location(LatLon(-15.78, -47.92))
            .station_limit(1)
            .call();
        assert_eq!(near.len(), 1);
    }

    #[tokio::test]
    async fn test_prefetch_warms_cache() {
        let transport = transport();
        let dashboard = dashboard(&transport).await;
        // 2022 is listed but not published
        assert_eq!(dashboard.prefetch("A001").await, 2);
        assert_eq!(dashboard.prefetch("ZZZZ").await, 0);

        let before = transport.fetch_count();
        dashboard.on_station_selected("A001").await;
        dashboard.on_year_changed(2023).await;
        assert_eq!(transport.fetch_count(), before);
        assert_eq!(dashboard.view().generation, 2);
    }
}
