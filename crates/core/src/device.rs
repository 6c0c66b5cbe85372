//! Device discovery and the hidapi-backed transport.

use crate::error::{Error, Result};
use crate::protocol::{Command, Report};
use crate::transport::FeatureTransport;
use crate::{DS100_PID, DS100_VID};
use tracing::{debug, info};

/// Information about a discovered DS100 HID interface.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub interface: i32,
    pub product: Option<String>,
    pub serial: Option<String>,
}

/// List every HID interface exposed by a connected DS100.
pub fn discover_devices() -> Result<Vec<DeviceInfo>> {
    debug!("Starting HID device enumeration");
    let api = hidapi::HidApi::new().map_err(|e| Error::Hid(e.to_string()))?;

    let devices: Vec<DeviceInfo> = api
        .device_list()
        .filter(|info| info.vendor_id() == DS100_VID && info.product_id() == DS100_PID)
        .map(|info| {
            info!(
                vid = format_args!("0x{:04X}", info.vendor_id()),
                pid = format_args!("0x{:04X}", info.product_id()),
                interface = info.interface_number(),
                path = %info.path().to_string_lossy(),
                "Found DS100 interface"
            );
            DeviceInfo {
                vid: info.vendor_id(),
                pid: info.product_id(),
                path: info.path().to_string_lossy().into_owned(),
                interface: info.interface_number(),
                product: info.product_string().map(|s| s.to_string()),
                serial: info.serial_number().map(|s| s.to_string()),
            }
        })
        .collect();

    debug!(count = devices.len(), "Device enumeration complete");
    Ok(devices)
}

/// An open DS100. The handle is released when this is dropped.
pub struct Ds100Device {
    device: hidapi::HidDevice,
}

impl Ds100Device {
    /// Open the DS100 by its fixed vendor/product ID.
    pub fn open() -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;
        let device = api.open(DS100_VID, DS100_PID).map_err(|e| {
            debug!(error = %e, "hid_open failed");
            Error::DeviceNotFound {
                vid: DS100_VID,
                pid: DS100_PID,
            }
        })?;
        info!(
            vid = format_args!("0x{DS100_VID:04X}"),
            pid = format_args!("0x{DS100_PID:04X}"),
            "Connected to DS100"
        );
        Ok(Self { device })
    }
}

impl FeatureTransport for Ds100Device {
    fn send_feature_report(&self, command: Command, report: &Report) -> Result<()> {
        self.device
            .send_feature_report(report)
            .map_err(|e| Error::Send {
                command: command.name(),
                reason: e.to_string(),
            })
    }
}
