//! Free-text filtering of the station catalog.
//!
//! A query matches a station when it is a substring of `"{id} {name} {uf}"`,
//! compared in lowercase. Accents are significant unless
//! [`SearchPolicy::fold_diacritics`] is enabled, so "sao" does not find
//! "São Paulo" under the default policy.

use crate::stations::collation::{fold, CanonicalKey};
use crate::types::station::Station;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Throttling and matching knobs for [`SearchIndex::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Queries shorter than this (in characters, after trimming) return nothing.
    pub min_query: usize,
    /// Maximum number of stations returned by a query. `None` disables the cap.
    pub max_results: Option<usize>,
    /// Match ignoring accents as well as case.
    pub fold_diacritics: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            min_query: 2,
            max_results: Some(60),
            fold_diacritics: false,
        }
    }
}

/// What the list should tell the user next to the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchHint {
    /// Results are complete.
    None,
    /// The query is below the minimum length; nothing was searched.
    TypeMore { min_len: usize },
    /// Results were capped; `omitted` more stations matched.
    Refine { omitted: usize },
    /// The query matched no station.
    NoMatches,
}

/// The ordered, possibly capped, subset of stations for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The query as typed by the user.
    pub query: String,
    /// Matching stations in canonical order.
    pub stations: Vec<Arc<Station>>,
    /// Number of matching stations before the cap was applied.
    pub total_matches: usize,
    pub hint: SearchHint,
}

impl SearchOutcome {
    pub fn omitted(&self) -> usize {
        self.total_matches - self.stations.len()
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    station: Arc<Station>,
    haystack: String,
}

/// Precomputed search text for a snapshot of stations.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    policy: SearchPolicy,
}

impl SearchIndex {
    /// Indexes `stations`, re-sorting them into canonical order.
    pub fn new(stations: impl IntoIterator<Item = Arc<Station>>, policy: SearchPolicy) -> Self {
        let mut stations: Vec<Arc<Station>> = stations.into_iter().collect();
        stations.sort_by_cached_key(|station| CanonicalKey::of(station));
        let entries = stations
            .into_iter()
            .map(|station| IndexEntry {
                haystack: Self::normalize_with(
                    &format!("{} {} {}", station.id, station.name, station.uf),
                    policy.fold_diacritics,
                ),
                station,
            })
            .collect();
        Self { entries, policy }
    }

    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize_with(text: &str, fold_diacritics: bool) -> String {
        let trimmed = text.trim();
        if fold_diacritics {
            fold(trimmed)
        } else {
            trimmed.to_lowercase()
        }
    }

    /// Normalizes a query the way haystacks are normalized.
    pub fn normalize(&self, query: &str) -> String {
        Self::normalize_with(query, self.policy.fold_diacritics)
    }

    /// Filters the index by `query`.
    ///
    /// Pure: the same query over the same index always yields the same ordered list.
    pub fn apply(&self, query: &str) -> SearchOutcome {
        let needle = self.normalize(query);
        let needle_len = needle.chars().count();
        if needle_len < self.policy.min_query {
            return SearchOutcome {
                query: query.to_string(),
                stations: Vec::new(),
                total_matches: 0,
                hint: SearchHint::TypeMore {
                    min_len: self.policy.min_query,
                },
            };
        }

        let matches: Vec<&Arc<Station>> = self
            .entries
            .iter()
            .filter(|entry| entry.haystack.contains(&needle))
            .map(|entry| &entry.station)
            .collect();
        let total_matches = matches.len();
        let shown = self
            .policy
            .max_results
            .map_or(total_matches, |cap| cap.min(total_matches));

        let hint = if total_matches == 0 {
            SearchHint::NoMatches
        } else if shown < total_matches {
            SearchHint::Refine {
                omitted: total_matches - shown,
            }
        } else {
            SearchHint::None
        };

        SearchOutcome {
            query: query.to_string(),
            stations: matches.into_iter().take(shown).cloned().collect(),
            total_matches,
            hint,
        }
    }

    /// Every indexed station in canonical order, ignoring query, minimum length and cap.
    pub fn show_all(&self) -> SearchOutcome {
        SearchOutcome {
            query: String::new(),
            stations: self.entries.iter().map(|e| e.station.clone()).collect(),
            total_matches: self.entries.len(),
            hint: SearchHint::None,
        }
    }
}
