use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "apk_backup",
    version,
    about = "Pull installed APKs from an Android device, skipping versions already backed up",
    after_help = "\
Configuration:
  --config <path>, else $APK_BACKUP_CONFIG, else ./config.json when present.
  $ADB_PATH overrides the adb binary from the config file.

Backups are written to <output_dir>/<package>_<version>/. Keys listed in
<output_dir>/existed_list.txt are treated as already backed up."
)]
pub struct Cli {
    /// Serial of the device to back up (needed when several are attached)
    #[arg(short, long)]
    pub serial: Option<String>,

    /// Only list the packages that would be backed up
    #[arg(short, long)]
    pub dry_run: bool,

    /// Directory receiving the backups (overrides the config file)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exit non-zero when any package fails or has no readable version
    #[arg(long)]
    pub strict: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
