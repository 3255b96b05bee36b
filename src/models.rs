use std::{collections::HashMap, fmt::Display};

///
/// Serial of an attached device. The empty serial stands for
/// "the single default device" and is never passed to adb.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DeviceSerial(String);

impl DeviceSerial {
    pub fn new(serial: impl Into<String>) -> Self {
        Self(serial.into())
    }
    pub fn default_device() -> Self {
        Self(String::new())
    }
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DeviceSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_default() { f.write_str("<default>") } else { f.write_str(&self.0) }
    }
}

///
/// An installed package paired with the version the device reports for it
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion {
    pub package: String,
    pub version: String,
}

impl PackageVersion {
    pub fn new(package: impl Into<String>, version: impl Into<String>) -> Self {
        Self { package: package.into(), version: version.into() }
    }
    ///
    /// `<package>_<version>`, used both as the backup directory name and as a ledger line
    ///
    pub fn composite_key(&self) -> String {
        composite_key(&self.package, &self.version)
    }
    ///
    /// False when the key could not be used as a single directory name
    ///
    pub fn is_path_safe(&self) -> bool {
        !self.composite_key().contains(|c| matches!(c, '/' | '\\' | '\0'))
    }
}

///
/// What the device reported for this run: the installed packages in device
/// order, the versions that could be paired with them, and the packages whose
/// version record was present but unreadable.
///
#[derive(Debug, Default, Clone)]
pub struct PackageInventory {
    pub packages: Vec<String>,
    pub versions: HashMap<String, String>,
    pub malformed: Vec<String>,
}

impl PackageInventory {
    pub fn version_of(&self, package: &str) -> Option<&str> {
        self.versions.get(package).map(String::as_str)
    }
}

pub fn composite_key(package: &str, version: &str) -> String {
    format!("{}_{}", package, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_key() {
        assert_eq!(PackageVersion::new("com.a", "1.0").composite_key(), "com.a_1.0");
    }

    #[test]
    fn test_separator_in_version_is_unsafe() {
        assert!(PackageVersion::new("com.a", "1.0").is_path_safe());
        assert!(!PackageVersion::new("com.a", "1.0/beta").is_path_safe());
        assert!(!PackageVersion::new("com.a", "../../etc").is_path_safe());
        assert!(!PackageVersion::new("com.a", "1.0\\beta").is_path_safe());
    }

    #[test]
    fn test_default_serial() {
        assert!(DeviceSerial::default_device().is_default());
        assert!(!DeviceSerial::new("emulator-5554").is_default());
        assert_eq!(DeviceSerial::default_device().to_string(), "<default>");
    }
}
