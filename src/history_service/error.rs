use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read ledger {path}: {source}")]
    LedgerRead { path: PathBuf, source: std::io::Error },
}
