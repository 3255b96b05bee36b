pub mod error;
pub mod ledger;

use std::{collections::HashSet, fmt::Display};

pub use ledger::CompletionLedger;

use crate::models::{composite_key, PackageInventory, PackageVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    NeedsBackup,
    /// The ledger already lists this package+version
    InLedger,
    /// A `<package>_<version>` directory already exists under the output root
    OnDisk,
}

///
/// Why a package was left out of the plan without a version to decide on
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFault {
    /// The version dump had a record for the package but no readable `versionName`
    MalformedRecord,
    /// The package was installed but never showed up in the version dump
    MissingVersion,
    /// The version would not stay a single directory name under the output root
    UnsafeVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryError {
    pub package: String,
    pub fault: InventoryFault,
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fault {
            InventoryFault::MalformedRecord => write!(f, "{}: version record could not be parsed", self.package),
            InventoryFault::MissingVersion => write!(f, "{}: no version reported", self.package),
            InventoryFault::UnsafeVersion => write!(f, "{}: version contains a path separator", self.package),
        }
    }
}

///
/// The outcome of reconciliation for one run, in device order
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BackupPlan {
    pub to_backup: Vec<PackageVersion>,
    pub skipped: Vec<(PackageVersion, PackageStatus)>,
    pub inventory_errors: Vec<InventoryError>,
}

///
/// Decides whether `package` at `version` still has to be backed up.
/// `on_disk` holds the directory names found under the output root; either
/// signal on its own is enough to skip.
///
pub fn package_status(package: &str, version: &str, ledger: &CompletionLedger, on_disk: &HashSet<String>) -> PackageStatus {
    let key = composite_key(package, version);
    if ledger.contains(&key) {
        PackageStatus::InLedger
    } else if on_disk.contains(&key) {
        PackageStatus::OnDisk
    } else {
        PackageStatus::NeedsBackup
    }
}

pub fn needs_backup(package: &str, version: &str, ledger: &CompletionLedger, on_disk: &HashSet<String>) -> bool {
    package_status(package, version, ledger, on_disk) == PackageStatus::NeedsBackup
}

///
/// Classifies every installed package. Packages without a usable version
/// become inventory errors and are neither backed up nor skipped.
///
pub fn reconcile(inventory: &PackageInventory, ledger: &CompletionLedger, on_disk: &HashSet<String>) -> BackupPlan {
    let malformed: HashSet<&str> = inventory.malformed.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut plan = BackupPlan::default();

    for package in &inventory.packages {
        if !seen.insert(package.as_str()) {
            continue;
        }

        let version = match inventory.version_of(package) {
            Some(v) if !v.is_empty() => v,
            _ => {
                let fault = if malformed.contains(package.as_str()) {
                    InventoryFault::MalformedRecord
                } else {
                    InventoryFault::MissingVersion
                };
                plan.inventory_errors.push(InventoryError { package: package.clone(), fault });
                continue;
            }
        };

        let entry = PackageVersion::new(package.as_str(), version);
        if !entry.is_path_safe() {
            plan.inventory_errors.push(InventoryError { package: package.clone(), fault: InventoryFault::UnsafeVersion });
            continue;
        }
        match package_status(package, version, ledger, on_disk) {
            PackageStatus::NeedsBackup => plan.to_backup.push(entry),
            status => plan.skipped.push((entry, status)),
        }
    }

    plan
}
