//! Session cache of parsed datasets.
//!
//! Entries live for the whole session. Historical years do not change once
//! published, so there is no TTL and no eviction. Failed loads never create an
//! entry, which lets a dataset published mid-session show up on retry.
//!
//! Loads in progress are tracked separately as attempts. Every caller asking for a
//! key while its attempt runs waits on that attempt and receives its outcome,
//! success or failure. The attempt is retired as soon as it finishes.

use crate::datasets::error::DatasetNotFound;
use crate::types::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Identifies a dataset. A typed pair, so no id can collide with another id/year combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetKey {
    pub station_id: String,
    pub year: i32,
}

impl DatasetKey {
    pub fn new(station_id: impl Into<String>, year: i32) -> Self {
        Self {
            station_id: station_id.into(),
            year,
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.station_id, self.year)
    }
}

/// Retention rules of a [`DatasetCache`].
///
/// Only successful loads are ever stored, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Maximum number of datasets kept. `None` (the default) keeps everything for the
    /// session; once the bound is reached new datasets are served but not retained.
    pub max_entries: Option<usize>,
}

pub(crate) type Outcome = Result<Arc<Dataset>, DatasetNotFound>;

/// One fetch of one key, shared by everyone who asked while it ran.
pub(crate) type Attempt = Arc<OnceCell<Outcome>>;

pub(crate) enum Lookup {
    Hit(Arc<Dataset>),
    Pending(Attempt),
}

#[derive(Debug, Default)]
struct Slots {
    ready: HashMap<DatasetKey, Arc<Dataset>>,
    in_flight: HashMap<DatasetKey, Attempt>,
}

/// Append-only map from [`DatasetKey`] to a parsed dataset, plus the attempts in flight.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slots: Mutex<Slots>,
    policy: CachePolicy,
}

impl DatasetCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// The cached dataset for `key`, or the attempt to wait on, created if needed.
    pub(crate) async fn lookup(&self, key: &DatasetKey) -> Lookup {
        let mut slots = self.slots.lock().await;
        // An attempt whose caller went away between finishing and settling
        let finished = slots
            .in_flight
            .get(key)
            .is_some_and(|attempt| attempt.initialized());
        if finished {
            self.retire(&mut slots, key);
        }

        if let Some(dataset) = slots.ready.get(key) {
            return Lookup::Hit(dataset.clone());
        }
        Lookup::Pending(slots.in_flight.entry(key.clone()).or_default().clone())
    }

    /// Retires a finished `attempt` and keeps its dataset if the bound allows.
    ///
    /// Returns whether the dataset was retained. Only the first caller settling an
    /// attempt has any effect.
    pub(crate) async fn settle(&self, key: &DatasetKey, attempt: &Attempt) -> bool {
        let mut slots = self.slots.lock().await;
        let current = slots
            .in_flight
            .get(key)
            .is_some_and(|pending| Arc::ptr_eq(pending, attempt));
        current && self.retire(&mut slots, key)
    }

    fn retire(&self, slots: &mut Slots, key: &DatasetKey) -> bool {
        let Some(attempt) = slots.in_flight.remove(key) else {
            return false;
        };
        let Some(Ok(dataset)) = attempt.get() else {
            return false;
        };
        let room = self
            .policy
            .max_entries
            .map_or(true, |max| slots.ready.len() < max);
        if room {
            slots.ready.insert(key.clone(), dataset.clone());
        }
        room
    }

    /// The cached dataset for `key`, without loading.
    pub async fn get(&self, key: &DatasetKey) -> Option<Arc<Dataset>> {
        let slots = self.slots.lock().await;
        slots.ready.get(key).cloned()
    }

    /// Number of datasets held.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.ready.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of loads currently in flight.
    pub async fn pending(&self) -> usize {
        self.slots.lock().await.in_flight.len()
    }
}
