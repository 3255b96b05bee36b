pub mod error;

use std::path::PathBuf;

use tracing::{info, warn};

use self::error::*;
use crate::{
    backup_service::BackupService,
    bridge_service::DeviceBridge,
    device_service::select_device,
    file_svc::existing_backup_dirs,
    history_service::{reconcile, BackupPlan, CompletionLedger},
    inventory_service::read_inventory,
    models::{DeviceSerial, PackageVersion},
};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub serial: Option<String>,
    pub output_root: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFailure {
    pub entry: PackageVersion,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub serial: DeviceSerial,
    pub dry_run: bool,
    pub plan: BackupPlan,
    pub backed_up: Vec<(PackageVersion, Vec<PathBuf>)>,
    pub failures: Vec<PackageFailure>,
}

impl RunReport {
    ///
    /// True when some package was not handled: a fetch failed or its version
    /// could not be read
    ///
    pub fn has_problems(&self) -> bool {
        !self.failures.is_empty() || !self.plan.inventory_errors.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.dry_run {
            return format!(
                "{} to back up, {} already backed up, {} inventory errors (dry run)",
                self.plan.to_backup.len(), self.plan.skipped.len(), self.plan.inventory_errors.len()
            );
        }
        format!(
            "{} backed up, {} failed, {} already backed up, {} inventory errors",
            self.backed_up.len(), self.failures.len(), self.plan.skipped.len(), self.plan.inventory_errors.len()
        )
    }
}

///
/// One full run: pick the device, read its inventory, reconcile against the
/// ledger and the output directory, then fetch what is missing one package
/// at a time. Anything failing before the fetch phase ends the run; a failed
/// fetch is recorded and the run moves on.
///
pub async fn run_backup(bridge: &dyn DeviceBridge, backup: &dyn BackupService, options: &RunOptions) -> Result<RunReport> {
    let serial = select_device(bridge, options.serial.as_deref()).await?;
    let inventory = read_inventory(bridge, &serial).await?;

    let root = &options.output_root;
    if !options.dry_run {
        tokio::fs::create_dir_all(root).await
            .map_err(|source| Error::OutputDir { path: root.clone(), source })?;
    }
    let ledger = CompletionLedger::load(root).await?;
    let on_disk = existing_backup_dirs(root).await
        .map_err(|source| Error::OutputDir { path: root.clone(), source })?;

    let plan = reconcile(&inventory, &ledger, &on_disk);
    for (entry, status) in &plan.skipped {
        info!(package = %entry.package, version = %entry.version, ?status, "skip");
    }
    for fault in &plan.inventory_errors {
        warn!(package = %fault.package, fault = ?fault.fault, "no usable version, not backing up");
    }

    let mut report = RunReport { serial, dry_run: options.dry_run, plan, backed_up: Vec::new(), failures: Vec::new() };
    if options.dry_run {
        return Ok(report);
    }

    for entry in &report.plan.to_backup {
        info!(package = %entry.package, version = %entry.version, "backing up");
        match backup.backup_package(&report.serial, entry, root).await {
            Ok(files) => report.backed_up.push((entry.clone(), files)),
            Err(e) => {
                warn!(package = %entry.package, version = %entry.version, error = %e, "backup failed");
                report.failures.push(PackageFailure { entry: entry.clone(), reason: e.to_string() });
            },
        }
    }

    Ok(report)
}
