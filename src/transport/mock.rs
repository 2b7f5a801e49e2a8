//! In-memory transport for tests: counts fetches and can hold a path until released.

use crate::transport::error::TransportError;
use crate::transport::Transport;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct MockTransport {
    resources: Mutex<HashMap<String, Vec<u8>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fetches: Mutex<Vec<String>>,
    total: AtomicUsize,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert(path, body);
        self
    }

    pub(crate) fn insert(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.resources
            .lock()
            .unwrap()
            .insert(path.to_string(), body.into());
    }

    /// Makes every fetch of `path` wait until the returned handle is notified.
    pub(crate) fn gate(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), notify.clone());
        notify
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub(crate) fn fetches_of(&self, path: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

impl Transport for MockTransport {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        self.fetches.lock().unwrap().push(path.to_string());

        let gate = self.gates.lock().unwrap().get(path).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.resources
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(PathBuf::from(path)))
    }

    fn describe(&self, path: &str) -> String {
        format!("mock://{}", path)
    }
}
