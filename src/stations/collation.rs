//! Case- and accent-insensitive text keys for the canonical station order and search.

use crate::types::station::Station;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercases `text` and strips diacritics ("São Paulo" -> "sao paulo").
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Sort key implementing the canonical (state, name) order.
///
/// The folded fields decide the order; the raw fields and the id only break ties, so
/// identical input sets always sort the same way whatever order they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct CanonicalKey {
    uf: String,
    name: String,
    raw_uf: String,
    raw_name: String,
    id: String,
}

impl CanonicalKey {
    pub(crate) fn of(station: &Station) -> Self {
        Self {
            uf: fold(&station.uf),
            name: fold(&station.name),
            raw_uf: station.uf.clone(),
            raw_name: station.name.clone(),
            id: station.id.clone(),
        }
    }
}

pub fn canonical_cmp(a: &Station, b: &Station) -> Ordering {
    CanonicalKey::of(a).cmp(&CanonicalKey::of(b))
}
