use std::path::PathBuf;

use thiserror::Error;

use crate::bridge_service;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("device bridge: {0}")]
    Bridge(#[from] bridge_service::error::Error),
    #[error("no install paths reported for {package}")]
    NoPaths { package: String },
    #[error("install path {0:?} has no file name")]
    InvalidRemotePath(String),
    #[error("failed to create {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
}
