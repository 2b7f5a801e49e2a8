use crate::transport::error::TransportError;
use crate::transport::Transport;
use log::debug;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Reads resources from a local copy of the static site.
#[derive(Debug, Clone)]
pub struct DirTransport {
    root: PathBuf,
}

impl DirTransport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, TransportError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(TransportError::OutsideRoot(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Transport for DirTransport {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let file = self.resolve(path)?;
        debug!("Reading {}", file.display());
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TransportError::NotFound(file)),
            Err(e) => Err(TransportError::Read(file, e)),
        }
    }

    fn describe(&self, path: &str) -> String {
        self.root
            .join(path.trim_start_matches('/'))
            .display()
            .to_string()
    }
}
