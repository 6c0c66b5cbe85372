//! Session controller: takes the device over, runs an animation, and hands
//! it back on interrupt.
//!
//! ```text
//! Disconnected -> Connecting -> Ready -> Running -> ShuttingDown -> Terminated
//! ```
//!
//! [`Controller::connect`] covers the steps up to `Ready`. Every send error
//! is returned immediately; the caller decides to exit.

use crate::animation::{Animation, Mode};
use crate::error::Result;
use crate::protocol::{Command, Report};
use crate::state::{DeviceState, Rgb};
use crate::transport::{send_command, FeatureTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause after every color update so the device can keep up.
pub const PACING_DELAY: Duration = Duration::from_micros(5000);

/// Where the controller is in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Device open, passthrough still enabled.
    Ready,
    /// Passthrough disabled; the host is driving the LED.
    Running,
    /// Handing the device back.
    ShuttingDown,
    /// Passthrough restored and preferences saved.
    Terminated,
}

/// Why an animation loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The stop flag was raised.
    Interrupted,
    /// The step limit was reached.
    StepLimit,
}

/// Owns the device state and the open transport for one session.
pub struct Controller<T: FeatureTransport> {
    transport: T,
    state: DeviceState,
    session: SessionState,
    pacing: Duration,
}

impl<T: FeatureTransport> Controller<T> {
    pub fn new(transport: T, state: DeviceState) -> Self {
        Self {
            transport,
            state,
            session: SessionState::Ready,
            pacing: PACING_DELAY,
        }
    }

    /// `Disconnected -> Connecting -> Ready`: open the transport with `open`.
    pub fn connect(open: impl FnOnce() -> Result<T>, state: DeviceState) -> Result<Self> {
        debug!("Connecting");
        let transport = open()?;
        Ok(Self::new(transport, state))
    }

    /// Override the post-update delay.
    #[cfg(test)]
    pub(crate) fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, command: Command) -> Result<Report> {
        send_command(&self.transport, command, &self.state)
    }

    /// Send the current color, then wait out the pacing delay.
    pub fn send_color_update(&self) -> Result<Report> {
        let report = self.send(Command::ColorUpdate)?;
        thread::sleep(self.pacing);
        Ok(report)
    }

    pub fn send_stop_mouse(&self) -> Result<Report> {
        self.send(Command::StopMouse)
    }

    pub fn send_activate_mouse(&self) -> Result<Report> {
        self.send(Command::ActivateMouse)
    }

    pub fn send_save_prefs(&self) -> Result<Report> {
        self.send(Command::SavePrefs)
    }

    /// `Ready -> Running`: disable mouse passthrough.
    pub fn start(&mut self) -> Result<()> {
        self.send_stop_mouse()?;
        self.session = SessionState::Running;
        debug!("Mouse passthrough disabled");
        Ok(())
    }

    /// Replace the color and show it.
    pub fn set_color(&mut self, color: Rgb) -> Result<Report> {
        self.state.color = color;
        self.send_color_update()
    }

    /// Run `mode` until `stop` is raised or, if given, `max_steps` updates
    /// have been sent.
    ///
    /// The flag is checked before every step. A grayscale pulse that cannot
    /// move from the starting color starts from black instead. Otherwise,
    /// when the pattern cannot move the loop idles at the pacing interval.
    pub fn run_animation(
        &mut self,
        mode: Mode,
        stop: &AtomicBool,
        max_steps: Option<u64>,
    ) -> Result<LoopExit> {
        let mut first = self.state.color;
        if mode == Mode::Grayscale && Animation::new(mode).advance(&mut first).is_none() {
            debug!(color = %self.state.color, "Seeding grayscale pulse from black");
            self.state.color = Rgb::BLACK;
        }

        let mut animation = Animation::new(mode);
        let mut steps = 0u64;
        let mut stalled = false;
        info!(mode = %mode, color = %self.state.color, "Animation started");

        loop {
            if stop.load(Ordering::SeqCst) {
                debug!(steps, "Animation interrupted");
                return Ok(LoopExit::Interrupted);
            }
            if max_steps.is_some_and(|max| steps >= max) {
                return Ok(LoopExit::StepLimit);
            }

            match animation.advance(&mut self.state.color) {
                Some(_) => {
                    self.send_color_update()?;
                }
                None => {
                    if !stalled {
                        warn!(
                            mode = %mode,
                            color = %self.state.color,
                            "Animation cannot progress from this color; waiting for interrupt"
                        );
                        stalled = true;
                    }
                    thread::sleep(self.pacing);
                }
            }
            steps += 1;
        }
    }

    /// `Running -> ShuttingDown -> Terminated`: re-enable passthrough and
    /// save whatever color is current.
    pub fn shutdown(&mut self) -> Result<()> {
        self.session = SessionState::ShuttingDown;
        info!(
            color = %self.state.color,
            lights_on = self.state.lights_on,
            flash_speed = %self.state.flash_speed,
            "Restoring mouse and saving preferences"
        );
        self.send_activate_mouse()?;
        self.send_save_prefs()?;
        self.session = SessionState::Terminated;
        Ok(())
    }

    /// Full animation session: start, animate until `stop`, shut down.
    pub fn run_session(&mut self, mode: Mode, stop: &AtomicBool) -> Result<()> {
        self.start()?;
        self.run_animation(mode, stop, None)?;
        self.shutdown()
    }

    /// Show one solid color, give the mouse back, and optionally persist it.
    pub fn apply_solid(&mut self, color: Rgb, save: bool) -> Result<()> {
        self.start()?;
        self.set_color(color)?;
        self.send_activate_mouse()?;
        if save {
            self.send_save_prefs()?;
        }
        self.session = SessionState::Terminated;
        Ok(())
    }
}
