pub mod error;
pub mod parse;
pub mod runner;

use std::{path::Path, time::Duration};

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use self::{error::*, parse::*, runner::CommandRunner};
use crate::models::DeviceSerial;

///
/// The operations this tool needs from the device bridge. Everything above
/// this trait sees parsed values only, never raw command output.
///
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeviceBridge : Send + Sync {
    ///
    /// Serials of every attached device
    ///
    async fn list_devices(&self) -> Result<Vec<DeviceSerial>>;
    ///
    /// Identifiers of every installed package, in the order the device reports them
    ///
    async fn list_packages(&self, serial: &DeviceSerial) -> Result<Vec<String>>;
    ///
    /// One bulk query returning the version of every package the dump could pair
    ///
    async fn dump_versions(&self, serial: &DeviceSerial) -> Result<VersionDump>;
    ///
    /// Per-package version query, `None` when no `versionName` could be found
    ///
    async fn package_version(&self, serial: &DeviceSerial, package: &str) -> Result<Option<String>>;
    ///
    /// Every on-device file making up the package: base APK first, then splits
    ///
    async fn package_paths(&self, serial: &DeviceSerial, package: &str) -> Result<Vec<String>>;
    ///
    /// Copies `remote` into `local`, which must be the full destination file path
    ///
    async fn pull(&self, serial: &DeviceSerial, remote: &str, local: &Path) -> Result<()>;
}

///
/// `DeviceBridge` backed by the `adb` command line
///
pub struct AdbBridge {
    runner: Box<dyn CommandRunner>,
    query_timeout: Duration,
    pull_timeout: Duration,
}

impl AdbBridge {
    pub fn new(runner: Box<dyn CommandRunner>, query_timeout: Duration, pull_timeout: Duration) -> Self {
        Self { runner, query_timeout, pull_timeout }
    }

    fn device_args(serial: &DeviceSerial, rest: &[&str]) -> Vec<String> {
        let mut args = Vec::with_capacity(rest.len() + 2);
        if !serial.is_default() {
            args.push("-s".to_string());
            args.push(serial.as_str().to_string());
        }
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    async fn shell(&self, serial: &DeviceSerial, rest: &[&str]) -> Result<String> {
        let mut cmd = vec!["shell"];
        cmd.extend_from_slice(rest);
        self.runner.run(&Self::device_args(serial, &cmd), self.query_timeout).await
    }
}

#[async_trait]
impl DeviceBridge for AdbBridge {
    async fn list_devices(&self) -> Result<Vec<DeviceSerial>> {
        let out = self.runner.run(&["devices".to_string()], self.query_timeout).await?;
        Ok(parse_devices(&out))
    }
    async fn list_packages(&self, serial: &DeviceSerial) -> Result<Vec<String>> {
        let out = self.shell(serial, &["pm", "list", "packages"]).await?;
        Ok(parse_packages(&out)?)
    }
    async fn dump_versions(&self, serial: &DeviceSerial) -> Result<VersionDump> {
        let out = self.shell(serial, &["dumpsys", "package", "packages"]).await?;
        Ok(parse_version_dump(&out))
    }
    async fn package_version(&self, serial: &DeviceSerial, package: &str) -> Result<Option<String>> {
        let out = self.shell(serial, &["dumpsys", "package", package]).await?;
        Ok(parse_version_name(&out))
    }
    async fn package_paths(&self, serial: &DeviceSerial, package: &str) -> Result<Vec<String>> {
        let out = self.shell(serial, &["pm", "path", package]).await?;
        Ok(parse_paths(&out))
    }
    async fn pull(&self, serial: &DeviceSerial, remote: &str, local: &Path) -> Result<()> {
        let local = local.display().to_string();
        let args = Self::device_args(serial, &["pull", remote, &local]);
        self.runner.run(&args, self.pull_timeout).await?;
        Ok(())
    }
}
