//! Error types for ds100-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID API initialization or enumeration failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// The DS100 could not be opened.
    #[error("could not connect to the device (VID=0x{vid:04X} PID=0x{pid:04X})")]
    DeviceNotFound { vid: u16, pid: u16 },

    /// A feature report was rejected by the transport.
    #[error("could not send {command} packet: {reason}")]
    Send {
        command: &'static str,
        reason: String,
    },

    /// User-supplied color or flash setting could not be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
