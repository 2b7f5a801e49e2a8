use crate::transport::error::TransportError;
use crate::transport::Transport;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};

/// Fetches resources relative to a base URL, e.g. `https://example.org/climogramas/`.
///
/// Every request asks intermediaries not to serve or store cached copies. The
/// application keeps its own cache of parsed datasets instead.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: Url,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`. A trailing `/` is added when missing so
    /// relative paths resolve below the base instead of replacing its last segment.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(base_url, Client::new())
    }

    /// Like [`HttpTransport::new`], sending requests through an existing `client`.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, TransportError> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| TransportError::InvalidUrl {
            url: normalized.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn no_store_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.resolve(path)?;
        let url_string = url.to_string();
        debug!("Requesting {}", url_string);

        let response = self
            .client
            .get(url)
            .headers(Self::no_store_headers())
            .send()
            .await
            .map_err(|e| TransportError::NetworkRequest(url_string.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    if status != reqwest::StatusCode::NOT_FOUND {
                        warn!("HTTP error for {}: {:?}", url_string, e);
                    }
                    TransportError::HttpStatus {
                        url: url_string,
                        status,
                        source: e,
                    }
                } else {
                    TransportError::NetworkRequest(url_string, e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(url_string.clone(), e))?;
        debug!("Received {} bytes from {}", bytes.len(), url_string);
        Ok(bytes.to_vec())
    }

    fn describe(&self, path: &str) -> String {
        self.resolve(path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| path.to_string())
    }
}
