//! ds100-core: device state, feature report encoding, color animation, and
//! session lifecycle for the MSI Interceptor DS100 mouse.
//!
//! The DS100 takes 16-byte HID feature reports to change its LED color,
//! toggle mouse movement passthrough, and persist lighting preferences.

pub mod animation;
pub mod device;
pub mod error;
#[cfg(test)]
mod integration_tests;
pub mod lifecycle;
pub mod protocol;
pub mod state;
pub mod transport;

/// MSI Interceptor DS100 USB Vendor ID.
pub const DS100_VID: u16 = 0x04D9;

/// MSI Interceptor DS100 USB Product ID.
pub const DS100_PID: u16 = 0xFA52;
