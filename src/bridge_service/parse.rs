use std::collections::{HashMap, HashSet};

use super::error::ParseError;
use crate::models::DeviceSerial;

const PACKAGE_PREFIX: &str = "package:";
const VERSION_KEY: &str = "versionName=";

///
/// Versions extracted from a bulk `dumpsys package packages` run.
/// `malformed` holds the packages whose record carried no usable version.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VersionDump {
    pub versions: HashMap<String, String>,
    pub malformed: Vec<String>,
}

impl VersionDump {
    pub fn record_count(&self) -> usize {
        self.versions.len() + self.malformed.len()
    }
}

///
/// Parses `adb devices` output into the serials of the attached devices
///
pub fn parse_devices(output: &str) -> Vec<DeviceSerial> {
    output.lines()
        // adb prints daemon start-up notices ahead of the header
        .filter(|line| !line.starts_with('*'))
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(DeviceSerial::new)
        .collect()
}

///
/// Parses `pm list packages` output. Order is kept as reported and
/// duplicates are not removed.
///
pub fn parse_packages(output: &str) -> Result<Vec<String>, ParseError> {
    output.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix(PACKAGE_PREFIX) {
            Some(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => Err(ParseError::UnexpectedLine(line.to_string())),
        })
        .collect()
}

///
/// Parses `pm path <pkg>` output: the base APK plus any split APKs
///
pub fn parse_paths(output: &str) -> Vec<String> {
    output.lines()
        .filter_map(|line| line.trim().strip_prefix(PACKAGE_PREFIX))
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .collect()
}

///
/// Extracts the first `versionName=` token from `dumpsys package <pkg>` output
///
pub fn parse_version_name(output: &str) -> Option<String> {
    output.lines().find_map(version_token)
}

fn version_token(line: &str) -> Option<String> {
    let start = line.find(VERSION_KEY)? + VERSION_KEY.len();
    let value = line[start..].split_whitespace().next()?;
    Some(value.to_string())
}

fn package_header(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("Package [")?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

///
/// Pairs each `Package [<id>]` header with the `versionName=` line that follows it.
/// A header that is followed by another header, or by the end of the output,
/// without a version is recorded as malformed rather than guessed.
///
pub fn parse_version_dump(output: &str) -> VersionDump {
    let mut dump = VersionDump::default();
    let mut seen = HashSet::new();
    let mut open: Option<String> = None;

    let mut close = |dump: &mut VersionDump, pkg: String, version: Option<String>| {
        // dumpsys lists updated system apps twice; the first record is the live one
        if !seen.insert(pkg.clone()) {
            return;
        }
        match version {
            Some(v) => { dump.versions.insert(pkg, v); },
            None => dump.malformed.push(pkg),
        }
    };

    for line in output.lines() {
        if let Some(pkg) = package_header(line) {
            if let Some(prev) = open.take() {
                close(&mut dump, prev, None);
            }
            open = Some(pkg.to_string());
        } else if line.contains(VERSION_KEY) {
            if let Some(pkg) = open.take() {
                let version = version_token(line);
                close(&mut dump, pkg, version);
            }
        }
    }
    if let Some(pkg) = open.take() {
        close(&mut dump, pkg, None);
    }

    dump
}
