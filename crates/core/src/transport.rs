//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that the real DS100 and the
//! test mock share the same interface.

use crate::error::Result;
use crate::protocol::{self, Command, Report};
use crate::state::DeviceState;
use tracing::trace;

/// Abstraction over sending fixed-size feature reports.
pub trait FeatureTransport: Send {
    /// Send one feature report. The first byte is the report ID.
    ///
    /// `command` names the report for error messages.
    fn send_feature_report(&self, command: Command, report: &Report) -> Result<()>;
}

/// Encode `command` from `state` and transmit it.
///
/// No retry: a failed send is returned to the caller unchanged.
pub fn send_command(
    transport: &dyn FeatureTransport,
    command: Command,
    state: &DeviceState,
) -> Result<Report> {
    let report = command.encode(state);
    trace!(
        command = command.name(),
        report_hex = %protocol::to_hex(&report),
        "DS100 TX"
    );
    transport.send_feature_report(command, &report)?;
    Ok(report)
}
