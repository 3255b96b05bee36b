use thiserror::Error;

use crate::{bridge_service, device_service, history_service};

pub type Result<T> = std::result::Result<T, Error>;

///
/// Failures that end the whole run before any package is fetched
///
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Device(#[from] device_service::error::Error),
    #[error("reading the package inventory failed: {0}")]
    Inventory(#[from] bridge_service::error::Error),
    #[error(transparent)]
    Ledger(#[from] history_service::error::Error),
    #[error("output directory {path}: {source}")]
    OutputDir { path: std::path::PathBuf, source: std::io::Error },
}
