use std::{io::ErrorKind, path::{Path, PathBuf}, time::Duration};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "APK_BACKUP_CONFIG";
pub const ADB_PATH_ENV: &str = "ADB_PATH";
const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub adb_path: PathBuf,
    pub output_dir: PathBuf,
    pub command_timeout_secs: u64,
    pub pull_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
            output_dir: PathBuf::from("./apk_backups"),
            command_timeout_secs: 60,
            pull_timeout_secs: 600,
        }
    }
}

impl Config {
    ///
    /// Loads the config file. An explicitly named file (argument or
    /// `APK_BACKUP_CONFIG`) must exist; the default `config.json` is optional.
    /// `ADB_PATH` overrides `adb_path` either way.
    ///
    pub fn load(explicit: Option<&Path>) -> Result<Self, Error> {
        let named = explicit.map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::from_file(&path)?,
            None => match Self::from_file(Path::new(DEFAULT_CONFIG_FILE)) {
                Err(Error::Read { source, .. }) if source.kind() == ErrorKind::NotFound => Self::default(),
                other => other?,
            },
        };

        if let Some(adb) = std::env::var_os(ADB_PATH_ENV).filter(|v| !v.is_empty()) {
            config.adb_path = PathBuf::from(adb);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&text).map_err(|source| Error::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.command_timeout_secs == 0 {
            return Err(Error::ZeroTimeout("command_timeout_secs"));
        }
        if self.pull_timeout_secs == 0 {
            return Err(Error::ZeroTimeout("pull_timeout_secs"));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.pull_timeout_secs)
    }
}
