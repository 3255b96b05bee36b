use std::process::ExitCode;

use apk_backup::{backup_service::ArtifactBackupService, bridge_service::{runner::ProcessRunner, AdbBridge}, cli::Cli, config::Config, pipeline::{run_backup, RunOptions, RunReport}};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }

    let bridge = AdbBridge::new(
        Box::new(ProcessRunner::new(config.adb_path.clone())),
        config.command_timeout(),
        config.pull_timeout(),
    );
    let backup = ArtifactBackupService::new(&bridge);
    let options = RunOptions { serial: cli.serial.clone(), output_root: config.output_dir.clone(), dry_run: cli.dry_run };

    match run_backup(&bridge, &backup, &options).await {
        Ok(report) => {
            print_report(&report);
            if cli.strict && report.has_problems() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &RunReport) {
    if report.dry_run {
        for entry in &report.plan.to_backup {
            println!("{} {}", entry.package, entry.version);
        }
    } else {
        for (entry, files) in &report.backed_up {
            println!("{} {} ({} files)", entry.package, entry.version, files.len());
        }
        for failure in &report.failures {
            eprintln!("failed: {} {}: {}", failure.entry.package, failure.entry.version, failure.reason);
        }
    }
    for fault in &report.plan.inventory_errors {
        eprintln!("inventory error: {}", fault);
    }
    println!("{}", report.summary());
}
