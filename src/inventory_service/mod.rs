use tracing::{debug, info, warn};

use crate::{bridge_service::{error::Result, DeviceBridge}, models::{DeviceSerial, PackageInventory}};

///
/// Reads the installed packages and their versions. The bulk dump is used
/// whenever it yields any records; otherwise every package is queried on
/// its own. Bridge failures abort the read so no partial inventory is acted on.
///
pub async fn read_inventory(bridge: &dyn DeviceBridge, serial: &DeviceSerial) -> Result<PackageInventory> {
    let packages = bridge.list_packages(serial).await?;
    info!(count = packages.len(), "installed packages");

    let dump = bridge.dump_versions(serial).await?;
    if dump.record_count() > 0 || packages.is_empty() {
        debug!(records = dump.record_count(), malformed = dump.malformed.len(), "bulk version dump parsed");
        return Ok(PackageInventory { packages, versions: dump.versions, malformed: dump.malformed });
    }

    warn!("bulk version dump had no package records, querying packages one by one");
    let mut inventory = PackageInventory { packages, ..Default::default() };
    for package in &inventory.packages {
        if inventory.versions.contains_key(package) {
            continue;
        }
        match bridge.package_version(serial, package).await? {
            Some(version) => { inventory.versions.insert(package.clone(), version); },
            None => inventory.malformed.push(package.clone()),
        }
    }

    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::bridge_service::{parse::VersionDump, MockDeviceBridge};

    fn packages(list: &'static [&'static str]) -> impl Fn(&DeviceSerial) -> Result<Vec<String>> + Send + 'static {
        move |_| Ok(list.iter().map(|p| p.to_string()).collect())
    }

    #[tokio::test]
    async fn test_bulk_dump_is_used() {
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_list_packages().returning(packages(&["com.a", "com.b"]));
        bridge.expect_dump_versions().returning(|_| Ok(VersionDump {
            versions: HashMap::from([("com.a".to_string(), "1.0".to_string())]),
            malformed: vec!["com.b".to_string()],
        }));
        bridge.expect_package_version().never();

        let inv = read_inventory(&bridge, &DeviceSerial::default_device()).await.unwrap();
        assert_eq!(inv.packages, vec!["com.a", "com.b"]);
        assert_eq!(inv.version_of("com.a"), Some("1.0"));
        assert_eq!(inv.malformed, vec!["com.b"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_per_package_queries() {
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_list_packages().returning(packages(&["com.a", "com.b", "com.a"]));
        bridge.expect_dump_versions().returning(|_| Ok(VersionDump::default()));
        bridge.expect_package_version()
            .withf(|_, pkg| pkg == "com.a")
            .times(1)
            .returning(|_, _| Ok(Some("1.0".to_string())));
        bridge.expect_package_version()
            .withf(|_, pkg| pkg == "com.b")
            .times(1)
            .returning(|_, _| Ok(None));

        let inv = read_inventory(&bridge, &DeviceSerial::default_device()).await.unwrap();
        assert_eq!(inv.version_of("com.a"), Some("1.0"));
        assert_eq!(inv.malformed, vec!["com.b"]);
    }

    #[tokio::test]
    async fn test_listing_failure_aborts() {
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_list_packages().returning(|_| Err(crate::bridge_service::error::Error::Timeout {
            command: "adb shell pm list packages".to_string(), secs: 60
        }));
        bridge.expect_dump_versions().never();

        assert!(read_inventory(&bridge, &DeviceSerial::default_device()).await.is_err());
    }
}
