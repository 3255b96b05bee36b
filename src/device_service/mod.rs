pub mod error;

use tracing::{info, warn};

use self::error::*;
use crate::{bridge_service::DeviceBridge, models::DeviceSerial};

///
/// Picks the device for this run. An explicit serial is used as given;
/// without one exactly one attached device is required.
///
pub async fn select_device(bridge: &dyn DeviceBridge, requested: Option<&str>) -> Result<DeviceSerial> {
    let attached = bridge.list_devices().await?;

    if let Some(serial) = requested.filter(|s| !s.is_empty()) {
        let serial = DeviceSerial::new(serial);
        if !attached.contains(&serial) {
            warn!(%serial, "requested device is not in the attached list");
        }
        return Ok(serial);
    }

    match attached.len() {
        0 => Err(Error::NoDevices),
        1 => {
            info!(serial = %attached[0], "using the only attached device");
            Ok(DeviceSerial::default_device())
        },
        _ => Err(Error::AmbiguousDevice { candidates: attached }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge_service::MockDeviceBridge;

    fn bridge_with(devices: &'static [&'static str]) -> MockDeviceBridge {
        let mut bridge = MockDeviceBridge::new();
        bridge.expect_list_devices()
            .returning(move || Ok(devices.iter().map(|d| DeviceSerial::new(*d)).collect()));
        bridge
    }

    #[tokio::test]
    async fn test_single_device_uses_default_serial() {
        let bridge = bridge_with(&["R58M"]);
        let serial = select_device(&bridge, None).await.unwrap();
        assert!(serial.is_default());
    }

    #[tokio::test]
    async fn test_multiple_devices_without_serial_is_ambiguous() {
        let bridge = bridge_with(&["R58M", "emulator-5554"]);
        match select_device(&bridge, None).await {
            Err(Error::AmbiguousDevice { candidates }) => {
                assert_eq!(candidates, vec![DeviceSerial::new("R58M"), DeviceSerial::new("emulator-5554")]);
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_explicit_serial_wins() {
        let bridge = bridge_with(&["R58M", "emulator-5554"]);
        let serial = select_device(&bridge, Some("emulator-5554")).await.unwrap();
        assert_eq!(serial, DeviceSerial::new("emulator-5554"));
    }

    #[tokio::test]
    async fn test_no_devices() {
        let bridge = bridge_with(&[]);
        assert!(matches!(select_device(&bridge, None).await, Err(Error::NoDevices)));
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = Error::AmbiguousDevice { candidates: vec![DeviceSerial::new("a"), DeviceSerial::new("b")] };
        assert_eq!(err.to_string(), "multiple devices attached, select one with -s: a, b");
    }
}
