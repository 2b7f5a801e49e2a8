//! Fetching of the static JSON resources the dashboard is built from.
//!
//! The catalog and every dataset are plain files addressed by a relative path
//! (`assets/stations.json`, `assets/data/A001/2024.json`). A [`Transport`]
//! turns such a path into bytes, either over HTTP ([`HttpTransport`]) or from a
//! local copy of the site ([`DirTransport`]).

pub mod dir;
pub mod error;
pub mod http;

#[cfg(test)]
pub(crate) mod mock;

use crate::transport::error::TransportError;

/// Source of the static resources, addressed by relative path.
///
/// Implementations must not add a caching layer of their own: the dataset cache
/// in [`crate::DatasetLoader`] is the single source of truth for repeated access.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetches the raw bytes stored at `path`.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    /// The absolute location of `path` (URL or file path), used in messages shown to the user.
    fn describe(&self, path: &str) -> String;
}

impl<T: Transport> Transport for &T {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(path).await
    }

    fn describe(&self, path: &str) -> String {
        (**self).describe(path)
    }
}
