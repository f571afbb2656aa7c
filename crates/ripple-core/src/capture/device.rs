//! Input device enumeration and resolution
//!
//! Lists capture devices from the default host. The synthetic "Default"
//! entry always comes first and resolves to the host's default input device
//! at stream build time, so the UI has a working choice even when
//! enumeration fails.

use cpal::traits::{DeviceTrait, HostTrait};

use super::error::{CaptureError, CaptureResult};

/// Name of the synthetic entry selecting the host's default input device.
pub const DEFAULT_DEVICE: &str = "Default";

/// List input device names, with [`DEFAULT_DEVICE`] always first.
///
/// Devices whose names cannot be read are skipped with a warning. If the
/// host cannot enumerate inputs at all the list degrades to just the
/// default entry.
pub fn input_device_names() -> Vec<String> {
    let mut names = vec![DEFAULT_DEVICE.to_string()];

    let host = cpal::default_host();
    let devices = match host.input_devices() {
        Ok(devices) => devices,
        Err(e) => {
            log::warn!("Failed to enumerate input devices: {}", e);
            return names;
        }
    };

    for device in devices {
        match device.name() {
            Ok(name) => names.push(name),
            Err(e) => {
                log::warn!("Failed to get input device name, skipping: {}", e);
            }
        }
    }

    names
}

/// Whether `name` matches an enumerated input device.
pub fn is_input_device(name: &str) -> bool {
    let host = cpal::default_host();
    match host.input_devices() {
        Ok(mut devices) => devices.any(|d| d.name().ok().as_deref() == Some(name)),
        Err(e) => {
            log::warn!("Failed to enumerate input devices: {}", e);
            false
        }
    }
}

/// Resolve a device selection to a cpal input device.
///
/// `None` resolves to the host's default input device; any other name must
/// match an enumerated input exactly.
pub fn find_input_device(name: Option<&str>) -> CaptureResult<cpal::Device> {
    let host = cpal::default_host();

    if let Some(name) = name {
        let devices = host
            .input_devices()
            .map_err(|e| CaptureError::ConfigError(e.to_string()))?;
        for device in devices {
            if device.name().ok().as_deref() == Some(name) {
                return Ok(device);
            }
        }
        return Err(CaptureError::DeviceNotFound(name.to_string()));
    }

    host.default_input_device().ok_or(CaptureError::NoDevices)
}
