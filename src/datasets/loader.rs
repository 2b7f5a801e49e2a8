use crate::datasets::cache::{CachePolicy, DatasetCache, DatasetKey, Lookup, Outcome};
use crate::datasets::error::{DatasetNotFound, LoadFailure};
use crate::transport::Transport;
use crate::types::dataset::Dataset;
use crate::types::station::is_valid_station_id;
use log::{debug, info, warn};
use std::sync::Arc;

/// Where datasets live below the transport root: `{base}/{station}/{year}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub base: String,
    pub extension: String,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            base: "assets/data".to_string(),
            extension: "json".to_string(),
        }
    }
}

impl DatasetLayout {
    pub fn path_for(&self, key: &DatasetKey) -> String {
        format!(
            "{}/{}/{}.{}",
            self.base.trim_end_matches('/'),
            key.station_id,
            key.year,
            self.extension
        )
    }
}

/// Resolves (station, year) pairs to datasets, memoizing successful loads.
pub struct DatasetLoader<T> {
    transport: T,
    layout: DatasetLayout,
    cache: DatasetCache,
}

impl<T: Transport> DatasetLoader<T> {
    pub fn new(transport: T, layout: DatasetLayout, policy: CachePolicy) -> Self {
        Self {
            transport,
            layout,
            cache: DatasetCache::new(policy),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// The resource path of a dataset, relative to the transport root.
    pub fn resource_path(&self, station_id: &str, year: i32) -> String {
        self.layout.path_for(&DatasetKey::new(station_id, year))
    }

    /// Returns the dataset of `station_id` in `year`.
    ///
    /// A cached dataset is returned without touching the transport. Otherwise exactly one
    /// fetch is made, shared by every concurrent caller asking for the same key. Callers
    /// that joined a failing fetch all receive its error.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetNotFound`] when the fetch or the parse fails, or when `station_id`
    /// is not a valid path segment. Failures are not cached: the next call fetches again.
    pub async fn load(&self, station_id: &str, year: i32) -> Result<Arc<Dataset>, DatasetNotFound> {
        let key = DatasetKey::new(station_id, year);
        if !is_valid_station_id(station_id) {
            warn!("Refusing to load dataset for invalid station id '{}'", station_id);
            return Err(self.not_found(&key, LoadFailure::InvalidStationId(station_id.to_string())));
        }

        let attempt = match self.cache.lookup(&key).await {
            Lookup::Hit(dataset) => {
                debug!("Cache hit for dataset {}", key);
                return Ok(dataset);
            }
            Lookup::Pending(attempt) => attempt,
        };

        let outcome = attempt.get_or_init(|| self.fetch(&key)).await.clone();
        self.cache.settle(&key, &attempt).await;
        outcome
    }

    /// The cached dataset for the pair, if any, without fetching.
    pub async fn cached(&self, station_id: &str, year: i32) -> Option<Arc<Dataset>> {
        self.cache.get(&DatasetKey::new(station_id, year)).await
    }

    fn not_found(&self, key: &DatasetKey, cause: LoadFailure) -> DatasetNotFound {
        DatasetNotFound {
            station_id: key.station_id.clone(),
            year: key.year,
            url: self.transport.describe(&self.layout.path_for(key)),
            cause: Arc::new(cause),
        }
    }

    async fn fetch(&self, key: &DatasetKey) -> Outcome {
        let path = self.layout.path_for(key);
        let url = self.transport.describe(&path);

        debug!("Cache miss for dataset {}, fetching {}", key, url);
        let bytes = match self.transport.fetch(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.is_not_found() {
                    info!("No dataset published for {} at {}", key, url);
                } else {
                    warn!("Failed to fetch dataset {} from {}: {}", key, url, e);
                }
                return Err(self.not_found(key, e.into()));
            }
        };

        let dataset: Dataset = serde_json::from_slice(&bytes).map_err(|e| {
            warn!("Malformed dataset {} at {}: {}", key, url, e);
            self.not_found(key, e.into())
        })?;
        if dataset.station != key.station_id || dataset.year != key.year {
            warn!(
                "Dataset at {} describes {}:{}, expected {}",
                url, dataset.station, dataset.year, key
            );
        }
        info!(
            "Loaded dataset {} ({} months) from {}",
            key,
            dataset.months.len(),
            url
        );
        Ok(Arc::new(dataset))
    }
}
