use std::{path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use super::error::*;

///
/// Runs one device-bridge invocation and hands back its stdout
///
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner : Send + Sync {
    ///
    /// Runs the bridge binary with `args`, failing if it exits unsuccessfully
    /// or does not finish within `limit`
    ///
    async fn run(&self, args: &[String], limit: Duration) -> Result<String>;
}

pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn describe(&self, args: &[String]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }
}

fn to_clean_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\r', "").trim_end().to_string()
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String], limit: Duration) -> Result<String> {
        let command = self.describe(args);
        debug!(%command, "running device bridge");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // a timed out adb is killed when the future is dropped
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn { command: command.clone(), source })?;

        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(res) => res.map_err(|source| Error::Spawn { command: command.clone(), source })?,
            Err(_) => return Err(Error::Timeout { command, secs: limit.as_secs() }),
        };

        let stdout = to_clean_text(&output.stdout);
        if output.status.success() {
            return Ok(stdout);
        }

        // adb reports some failures on stdout
        let output_text = if stdout.is_empty() { to_clean_text(&output.stderr) } else { stdout };
        Err(Error::CommandFailed { command, code: output.status.code(), output: output_text })
    }
}
