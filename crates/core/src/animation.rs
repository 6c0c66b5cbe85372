//! Host-driven color animations.
//!
//! Two looping patterns walk the color through a closed cycle:
//!
//! - **Rainbow** (hue rotation): red fades into green, green into blue,
//!   blue back into red.
//! - **Grayscale** (pulse): all channels rise together to white, then fall
//!   together to black.
//!
//! Each phase keeps stepping while its guard holds, then hands over to the
//! next phase. [`Animation`] is a pure state machine; the lifecycle
//! controller sends one color update per step.

use crate::state::{step_down, step_up, Rgb};
use tracing::debug;

/// Absolute change of each moving channel per step.
pub const STEP: u8 = 5;

/// Which pattern to run. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Rainbow,
    Grayscale,
}

impl Mode {
    /// Parse a mode from a CLI-friendly name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "rainbow" | "hue" => Some(Self::Rainbow),
            "grayscale" | "greyscale" | "gray" | "grey" | "pulse" => Some(Self::Grayscale),
            _ => None,
        }
    }

    /// Lowercase name, as accepted by [`Mode::from_name`].
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rainbow => "rainbow",
            Self::Grayscale => "grayscale",
        }
    }

    fn phase_count(&self) -> usize {
        match self {
            Self::Rainbow => 3,
            Self::Grayscale => 2,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Position within a looping pattern.
#[derive(Debug, Clone)]
pub struct Animation {
    mode: Mode,
    phase: usize,
    step: u8,
}

impl Animation {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            phase: 0,
            step: STEP,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the phase that will run next.
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Advance `color` by one step.
    ///
    /// Phases whose guard fails are skipped in order. Returns `None` when no
    /// phase can move from `color` (e.g. a grayscale pulse from pure red),
    /// leaving `color` untouched.
    pub fn advance(&mut self, color: &mut Rgb) -> Option<Rgb> {
        for _ in 0..self.mode.phase_count() {
            if self.guard(color) {
                self.apply(color);
                return Some(*color);
            }
            self.phase = (self.phase + 1) % self.mode.phase_count();
            debug!(mode = %self.mode, phase = self.phase, color = %color, "Animation phase change");
        }
        None
    }

    fn guard(&self, c: &Rgb) -> bool {
        match (self.mode, self.phase) {
            (Mode::Rainbow, 0) => c.r > 0 && c.g < 0xFF,
            (Mode::Rainbow, 1) => c.g > 0 && c.b < 0xFF,
            (Mode::Rainbow, _) => c.b > 0 && c.r < 0xFF,
            (Mode::Grayscale, 0) => c.r < 0xFF && c.g < 0xFF && c.b < 0xFF,
            (Mode::Grayscale, _) => c.r > 0 && c.g > 0 && c.b > 0,
        }
    }

    fn apply(&self, c: &mut Rgb) {
        let s = self.step;
        match (self.mode, self.phase) {
            (Mode::Rainbow, 0) => {
                c.r = step_down(c.r, s);
                c.g = step_up(c.g, s);
            }
            (Mode::Rainbow, 1) => {
                c.g = step_down(c.g, s);
                c.b = step_up(c.b, s);
            }
            (Mode::Rainbow, _) => {
                c.b = step_down(c.b, s);
                c.r = step_up(c.r, s);
            }
            (Mode::Grayscale, 0) => {
                c.r = step_up(c.r, s);
                c.g = step_up(c.g, s);
                c.b = step_up(c.b, s);
            }
            (Mode::Grayscale, _) => {
                c.r = step_down(c.r, s);
                c.g = step_down(c.g, s);
                c.b = step_down(c.b, s);
            }
        }
    }
}
