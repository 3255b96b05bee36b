use std::{collections::HashSet, io::ErrorKind, path::{Path, PathBuf}};

use tracing::debug;

use super::error::*;

pub const LEDGER_FILE_NAME: &str = "existed_list.txt";

///
/// Composite keys of backups another process has recorded as complete.
/// The ledger is read once per run and never written here.
///
#[derive(Debug, Default, Clone)]
pub struct CompletionLedger {
    keys: HashSet<String>,
}

impl CompletionLedger {
    pub fn ledger_path(output_root: &Path) -> PathBuf {
        output_root.join(LEDGER_FILE_NAME)
    }

    ///
    /// Loads `<output_root>/existed_list.txt`. A missing file is an empty ledger.
    ///
    pub async fn load(output_root: &Path) -> Result<Self> {
        let path = Self::ledger_path(output_root);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let ledger = Self::from_lines(&text);
                debug!(path = %path.display(), entries = ledger.len(), "loaded ledger");
                Ok(ledger)
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::LedgerRead { path, source }),
        }
    }

    pub fn from_lines(text: &str) -> Self {
        let keys = text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
