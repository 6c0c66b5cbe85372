//! Device state model: current color, lights flag, and flash speed.
//!
//! Colors are stored in logical RGB space. The device itself expects every
//! channel inverted (`255 - value`); that conversion happens only when a
//! report is encoded.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Device-side blink rate, encoded on the wire as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum FlashSpeed {
    #[default]
    None = 0,
    Slow = 1,
    Medium = 2,
    Fast = 3,
}

impl FlashSpeed {
    /// All flash speeds in ordinal order.
    pub const ALL: &'static [FlashSpeed] = &[
        FlashSpeed::None,
        FlashSpeed::Slow,
        FlashSpeed::Medium,
        FlashSpeed::Fast,
    ];

    /// Wire value (0-3).
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Convert from the wire value.
    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Slow),
            2 => Some(Self::Medium),
            3 => Some(Self::Fast),
            _ => None,
        }
    }

    /// Parse a flash speed from a CLI-friendly name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" | "off" | "0" => Some(Self::None),
            "slow" | "1" => Some(Self::Slow),
            "medium" | "2" => Some(Self::Medium),
            "fast" | "3" => Some(Self::Fast),
            _ => None,
        }
    }

    /// Lowercase name, as accepted by [`FlashSpeed::from_name`].
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
        }
    }
}

impl std::fmt::Display for FlashSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A logical (non-inverted) RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xFF, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 0xFF, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels in device space: each one is `255 - value`.
    pub fn inverted(&self) -> Rgb {
        Rgb::new(0xFF - self.r, 0xFF - self.g, 0xFF - self.b)
    }

    /// Rebuild a logical color from the device's `(g', b', r')` byte triple.
    pub fn from_device(g: u8, b: u8, r: u8) -> Self {
        Rgb::new(0xFF - r, 0xFF - g, 0xFF - b)
    }

    /// True when all three channels are equal.
    pub fn is_gray(&self) -> bool {
        self.r == self.g && self.g == self.b
    }

    /// Parse `RRGGBB` or `#RRGGBB`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidInput(format!(
                "color '{s}' is not in RRGGBB form"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| Error::InvalidInput(format!("color '{s}': {e}")))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Lower a channel by `step`, floored at 0.
pub fn step_down(value: u8, step: u8) -> u8 {
    value.saturating_sub(step)
}

/// Raise a channel by `step`, capped at 255.
pub fn step_up(value: u8, step: u8) -> u8 {
    value.saturating_add(step)
}

/// Everything the encoder needs to build a report.
///
/// One instance per controller; the controller owns it exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub lights_on: bool,
    pub flash_speed: FlashSpeed,
    pub color: Rgb,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            lights_on: true,
            flash_speed: FlashSpeed::None,
            color: Rgb::RED,
        }
    }
}

impl DeviceState {
    /// Lights flag as sent on the wire.
    pub fn lights_byte(&self) -> u8 {
        u8::from(self.lights_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_lit_solid_red() {
        let state = DeviceState::default();
        assert!(state.lights_on);
        assert_eq!(state.flash_speed, FlashSpeed::None);
        assert_eq!(state.color, Rgb::RED);
        assert_eq!(state.lights_byte(), 1);
    }

    #[test]
    fn flash_speed_ordinals() {
        for (i, speed) in FlashSpeed::ALL.iter().enumerate() {
            assert_eq!(speed.ordinal() as usize, i);
            assert_eq!(FlashSpeed::from_ordinal(i as u8), Some(*speed));
        }
        assert_eq!(FlashSpeed::from_ordinal(4), None);
    }

    #[test]
    fn flash_speed_from_name_accepts_variants() {
        assert_eq!(FlashSpeed::from_name("SLOW"), Some(FlashSpeed::Slow));
        assert_eq!(FlashSpeed::from_name("off"), Some(FlashSpeed::None));
        assert_eq!(FlashSpeed::from_name("3"), Some(FlashSpeed::Fast));
        assert_eq!(FlashSpeed::from_name("blinky"), None);
    }

    #[test]
    fn flash_speed_label_parses_back() {
        for speed in FlashSpeed::ALL {
            assert_eq!(FlashSpeed::from_name(speed.label()), Some(*speed));
            assert_eq!(speed.to_string(), speed.label());
        }
    }

    #[test]
    fn inversion_is_complement() {
        let c = Rgb::new(120, 80, 200);
        assert_eq!(c.inverted(), Rgb::new(135, 175, 55));
        assert_eq!(c.inverted().inverted(), c);
    }

    #[test]
    fn from_device_undoes_gbr_inversion() {
        let c = Rgb::new(120, 80, 200);
        let inv = c.inverted();
        assert_eq!(Rgb::from_device(inv.g, inv.b, inv.r), c);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#FF8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_hex("00ff7f").unwrap(), Rgb::new(0, 255, 127));
        assert!(Rgb::from_hex("FFF").is_err());
        assert!(Rgb::from_hex("GG0000").is_err());
        assert_eq!(Rgb::new(1, 2, 254).to_string(), "#0102FE");
    }

    #[test]
    fn steps_clamp_at_bounds() {
        for v in 0..=255u8 {
            for s in [1u8, 5, 7, 255] {
                let down = step_down(v, s);
                let up = step_up(v, s);
                assert!(down <= v);
                assert!(up >= v);
                assert_eq!(down as i16, (v as i16 - s as i16).max(0));
                assert_eq!(up as u16, (v as u16 + s as u16).min(255));
            }
        }
    }

    #[test]
    fn state_json_roundtrip() {
        let state = DeviceState {
            lights_on: false,
            flash_speed: FlashSpeed::Medium,
            color: Rgb::new(1, 2, 3),
        };
        let json = serde_json::to_string(&state).expect("serialize state");
        assert!(json.contains("\"medium\""));
        let back: DeviceState = serde_json::from_str(&json).expect("deserialize state");
        assert_eq!(back, state);
    }
}
