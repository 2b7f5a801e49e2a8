use crate::config::ConfigError;
use crate::datasets::error::DatasetNotFound;
use crate::presentation::export::ExportError;
use crate::stations::error::CatalogError;
use crate::transport::error::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimogramError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Dataset(#[from] DatasetNotFound),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
