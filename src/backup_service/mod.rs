pub mod error;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use self::error::*;
use crate::{bridge_service::DeviceBridge, models::{DeviceSerial, PackageVersion}};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait BackupService : Send + Sync {
    ///
    /// Copies every install file of `entry` into `<output_root>/<package>_<version>/`
    /// and returns the local paths written. The first failed copy ends the
    /// package's backup; nothing is retried.
    ///
    async fn backup_package(&self, serial: &DeviceSerial, entry: &PackageVersion, output_root: &Path) -> Result<Vec<PathBuf>>;
}

pub struct ArtifactBackupService<'a> {
    bridge: &'a dyn DeviceBridge,
}

impl<'a> ArtifactBackupService<'a> {
    pub fn new(bridge: &'a dyn DeviceBridge) -> Self {
        Self { bridge }
    }
}

fn remote_file_name(remote: &str) -> Result<&str> {
    Path::new(remote).file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::InvalidRemotePath(remote.to_string()))
}

#[async_trait]
impl<'a> BackupService for ArtifactBackupService<'a> {
    async fn backup_package(&self, serial: &DeviceSerial, entry: &PackageVersion, output_root: &Path) -> Result<Vec<PathBuf>> {
        let remotes = self.bridge.package_paths(serial, &entry.package).await?;
        if remotes.is_empty() {
            return Err(Error::NoPaths { package: entry.package.clone() });
        }
        let names = remotes.iter()
            .map(|remote| remote_file_name(remote))
            .collect::<Result<Vec<_>>>()?;

        let target_dir = output_root.join(entry.composite_key());
        tokio::fs::create_dir_all(&target_dir).await
            .map_err(|source| Error::CreateDir { path: target_dir.clone(), source })?;

        let mut pulled = Vec::with_capacity(remotes.len());
        for (remote, name) in remotes.iter().zip(names) {
            let local = target_dir.join(name);
            debug!(%remote, local = %local.display(), "pulling");
            self.bridge.pull(serial, remote, &local).await?;
            pulled.push(local);
        }

        Ok(pulled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge_service::{error::Error as BridgeError, MockDeviceBridge};

    fn entry() -> PackageVersion {
        PackageVersion::new("com.a", "1.0")
    }

    #[tokio::test]
    async fn test_backup_pulls_base_and_splits() {
        let root = tempfile::tempdir().unwrap();
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_package_paths()
            .withf(|_, pkg| pkg == "com.a")
            .returning(|_, _| Ok(vec![
                "/data/app/com.a-1/base.apk".to_string(),
                "/data/app/com.a-1/split_config.xxhdpi.apk".to_string(),
            ]));
        bridge.expect_pull().times(2).returning(|_, _, _| Ok(()));

        let svc = ArtifactBackupService::new(&bridge);
        let pulled = svc.backup_package(&DeviceSerial::default_device(), &entry(), root.path()).await.unwrap();

        let dir = root.path().join("com.a_1.0");
        assert!(dir.is_dir());
        assert_eq!(pulled, vec![dir.join("base.apk"), dir.join("split_config.xxhdpi.apk")]);
    }

    #[tokio::test]
    async fn test_no_paths_creates_nothing() {
        let root = tempfile::tempdir().unwrap();
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_package_paths().returning(|_, _| Ok(vec![]));
        bridge.expect_pull().never();

        let svc = ArtifactBackupService::new(&bridge);
        let err = svc.backup_package(&DeviceSerial::default_device(), &entry(), root.path()).await.unwrap_err();

        assert!(matches!(err, Error::NoPaths { .. }));
        assert!(!root.path().join("com.a_1.0").exists());
    }

    #[tokio::test]
    async fn test_failed_pull_stops_remaining_copies() {
        let root = tempfile::tempdir().unwrap();
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_package_paths().returning(|_, _| Ok(vec![
            "/data/app/com.a-1/base.apk".to_string(),
            "/data/app/com.a-1/split_a.apk".to_string(),
            "/data/app/com.a-1/split_b.apk".to_string(),
        ]));
        let mut calls = 0;
        bridge.expect_pull().times(2).returning(move |_, _, _| {
            calls += 1;
            if calls == 2 {
                Err(BridgeError::CommandFailed { command: "adb pull".to_string(), code: Some(1), output: "device offline".to_string() })
            } else {
                Ok(())
            }
        });

        let svc = ArtifactBackupService::new(&bridge);
        let err = svc.backup_package(&DeviceSerial::default_device(), &entry(), root.path()).await.unwrap_err();
        assert!(matches!(err, Error::Bridge(_)));
    }

    #[tokio::test]
    async fn test_existing_directory_is_reused() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("com.a_1.0")).unwrap();
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_package_paths().returning(|_, _| Ok(vec!["/data/app/com.a-1/base.apk".to_string()]));
        bridge.expect_pull().times(1).returning(|_, _, _| Ok(()));

        let svc = ArtifactBackupService::new(&bridge);
        assert!(svc.backup_package(&DeviceSerial::default_device(), &entry(), root.path()).await.is_ok());
    }

    #[test]
    fn test_remote_file_name() {
        assert_eq!(remote_file_name("/data/app/com.a-1/base.apk").unwrap(), "base.apk");
        assert!(remote_file_name("/").is_err());
    }
}
