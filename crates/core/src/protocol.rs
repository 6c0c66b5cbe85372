//! DS100 feature report encoding.
//!
//! Every command is a 16-byte feature report whose first byte is report ID
//! 0x02. Unused trailing bytes are zero.
//!
//! | Command          | Layout                                             |
//! |------------------|----------------------------------------------------|
//! | Color update     | `02 04 G' B' R' lights flash 00..`                 |
//! | Stop mouse       | `02 06 00 00..`                                    |
//! | Activate mouse   | `02 06 01 00..`                                    |
//! | Save preferences | `02 02 81 08 06 00 FA FA G' B' R' lights flash 00 00 00` |
//!
//! `X'` is the inverted channel `255 - X`. The channel order on the wire is
//! g, b, r.

use crate::state::{DeviceState, FlashSpeed, Rgb};

/// Feature report length (including report ID).
pub const REPORT_LEN: usize = 16;

/// Feature report ID used by every command.
pub const REPORT_ID: u8 = 0x02;

/// Second byte of each report: the command opcode.
pub mod opcodes {
    pub const SAVE_PREFS: u8 = 0x02;
    pub const COLOR_UPDATE: u8 = 0x04;
    pub const MOUSE_PASSTHROUGH: u8 = 0x06;
}

/// Fixed header of the save-preferences report, after report ID and opcode.
const SAVE_PREFS_HEADER: [u8; 6] = [0x81, 0x08, 0x06, 0x00, 0xFA, 0xFA];

/// A raw feature report.
pub type Report = [u8; REPORT_LEN];

/// Commands understood by the DS100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Show the state's color immediately.
    ColorUpdate,
    /// Disable mouse movement passthrough while the host drives the LED.
    StopMouse,
    /// Re-enable mouse movement passthrough.
    ActivateMouse,
    /// Persist color and flags into the device's nonvolatile memory.
    SavePrefs,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::ColorUpdate,
        Command::StopMouse,
        Command::ActivateMouse,
        Command::SavePrefs,
    ];

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ColorUpdate => "color-update",
            Self::StopMouse => "stop-mouse",
            Self::ActivateMouse => "activate-mouse",
            Self::SavePrefs => "save-prefs",
        }
    }

    /// Look up a command by its [`Command::name`] (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(name))
    }

    /// Build the 16-byte report for this command from `state`.
    ///
    /// Passthrough commands ignore the state.
    pub fn encode(&self, state: &DeviceState) -> Report {
        let mut buf = [0u8; REPORT_LEN];
        buf[0] = REPORT_ID;
        match self {
            Self::ColorUpdate => {
                buf[1] = opcodes::COLOR_UPDATE;
                write_color_block(&mut buf[2..7], state);
            }
            Self::StopMouse => {
                buf[1] = opcodes::MOUSE_PASSTHROUGH;
                buf[2] = 0x00;
            }
            Self::ActivateMouse => {
                buf[1] = opcodes::MOUSE_PASSTHROUGH;
                buf[2] = 0x01;
            }
            Self::SavePrefs => {
                buf[1] = opcodes::SAVE_PREFS;
                buf[2..8].copy_from_slice(&SAVE_PREFS_HEADER);
                write_color_block(&mut buf[8..13], state);
            }
        }
        buf
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `G' B' R' lights flash`
fn write_color_block(out: &mut [u8], state: &DeviceState) {
    let inv = state.color.inverted();
    out[0] = inv.g;
    out[1] = inv.b;
    out[2] = inv.r;
    out[3] = state.lights_byte();
    out[4] = state.flash_speed.ordinal();
}

/// Recover the state carried by a color-update or save-preferences report.
///
/// Returns `None` for passthrough reports, unknown layouts, or an
/// out-of-range flash speed.
pub fn decode_state(report: &Report) -> Option<DeviceState> {
    if report[0] != REPORT_ID {
        return None;
    }
    let block = match report[1] {
        opcodes::COLOR_UPDATE => &report[2..7],
        opcodes::SAVE_PREFS if report[2..8] == SAVE_PREFS_HEADER => &report[8..13],
        _ => return None,
    };
    Some(DeviceState {
        color: Rgb::from_device(block[0], block[1], block[2]),
        lights_on: block[3] != 0,
        flash_speed: FlashSpeed::from_ordinal(block[4])?,
    })
}

/// Uppercase space-separated hex, as printed by the CLI and logs.
pub fn to_hex(report: &Report) -> String {
    report
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
