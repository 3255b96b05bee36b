use thiserror::Error;

use crate::{bridge_service, models::DeviceSerial};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("device bridge: {0}")]
    Bridge(#[from] bridge_service::error::Error),
    #[error("multiple devices attached, select one with -s: {}", list(.candidates))]
    AmbiguousDevice { candidates: Vec<DeviceSerial> },
    #[error("no device attached")]
    NoDevices,
}

fn list(serials: &[DeviceSerial]) -> String {
    serials.iter().map(DeviceSerial::to_string).collect::<Vec<_>>().join(", ")
}
