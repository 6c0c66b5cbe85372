//! Integration tests: exercise full sessions against a simulated DS100.
//!
//! The mock records every feature report, so each test checks the exact
//! sequence a real device would have received.

#[cfg(test)]
mod tests {
    use crate::animation::Mode;
    use crate::error::Error;
    use crate::lifecycle::{Controller, LoopExit, SessionState};
    use crate::protocol::{decode_state, Command};
    use crate::state::{DeviceState, FlashSpeed, Rgb};
    use crate::transport::mock::MockTransport;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn controller(state: DeviceState) -> Controller<MockTransport> {
        Controller::new(MockTransport::new(), state).with_pacing(Duration::ZERO)
    }

    /// Test: a session brackets the animation with stop and activate/save.
    #[test]
    fn session_command_order() {
        let mut ctl = controller(DeviceState::default());
        let stop = AtomicBool::new(false);

        ctl.start().unwrap();
        let exit = ctl.run_animation(Mode::Rainbow, &stop, Some(20)).unwrap();
        assert_eq!(exit, LoopExit::StepLimit);
        ctl.shutdown().unwrap();

        let commands = ctl.transport().commands();
        assert_eq!(commands.len(), 23);
        assert_eq!(commands[0], Command::StopMouse);
        assert!(commands[1..21].iter().all(|c| *c == Command::ColorUpdate));
        assert_eq!(
            &commands[21..],
            &[Command::ActivateMouse, Command::SavePrefs]
        );
    }

    /// Test: the saved preferences carry the color of the last update.
    #[test]
    fn saved_prefs_match_last_update() {
        let state = DeviceState {
            flash_speed: FlashSpeed::Fast,
            ..DeviceState::default()
        };
        let mut ctl = controller(state);
        let stop = AtomicBool::new(false);

        ctl.start().unwrap();
        ctl.run_animation(Mode::Rainbow, &stop, Some(77)).unwrap();
        ctl.shutdown().unwrap();

        let last_update = decode_state(&ctl.transport().last(Command::ColorUpdate).unwrap());
        let saved = decode_state(&ctl.transport().last(Command::SavePrefs).unwrap());
        assert_eq!(saved, last_update);
        // 51 steps to green, 26 more into the green→blue phase.
        assert_eq!(saved.unwrap().color, Rgb::new(0, 125, 130));
        assert_eq!(saved.unwrap().flash_speed, FlashSpeed::Fast);
    }

    /// Test: every update in a rainbow lap decodes back to a valid hue.
    #[test]
    fn rainbow_lap_reports_decode() {
        let mut ctl = controller(DeviceState::default());
        let stop = AtomicBool::new(false);
        ctl.run_animation(Mode::Rainbow, &stop, Some(153)).unwrap();

        let sent = ctl.transport().sent();
        assert_eq!(sent.len(), 153);
        for (_, report) in &sent {
            let state = decode_state(report).unwrap();
            let c = state.color;
            assert_eq!(c.r as u16 + c.g as u16 + c.b as u16, 255);
            assert!(state.lights_on);
        }
        assert_eq!(decode_state(&sent[152].1).unwrap().color, Rgb::RED);
    }

    /// Test: grayscale session keeps r == g == b on the wire.
    #[test]
    fn grayscale_session_reports_are_gray() {
        let mut ctl = controller(DeviceState {
            color: Rgb::new(100, 100, 100),
            ..DeviceState::default()
        });
        let stop = AtomicBool::new(false);
        ctl.run_animation(Mode::Grayscale, &stop, Some(120)).unwrap();

        for (_, report) in ctl.transport().sent() {
            let c = decode_state(&report).unwrap().color;
            assert!(c.is_gray(), "non-gray update {c}");
        }
    }

    /// Test: interrupt raised from another thread ends the loop, then the
    /// shutdown sequence runs on the controller's own thread.
    #[test]
    fn interrupt_from_another_thread() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut ctl = Controller::new(MockTransport::new(), DeviceState::default())
            .with_pacing(Duration::from_micros(50));

        let flag = Arc::clone(&stop);
        let interrupter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            flag.store(true, Ordering::SeqCst);
        });

        ctl.run_session(Mode::Rainbow, &stop).unwrap();
        interrupter.join().expect("interrupter panicked");

        assert_eq!(ctl.session(), SessionState::Terminated);
        let commands = ctl.transport().commands();
        assert_eq!(commands.first(), Some(&Command::StopMouse));
        assert_eq!(
            &commands[commands.len() - 2..],
            &[Command::ActivateMouse, Command::SavePrefs]
        );
        let saved = decode_state(&ctl.transport().last(Command::SavePrefs).unwrap()).unwrap();
        assert_eq!(saved.color, ctl.state().color);
    }

    /// Test: a failed stop-mouse aborts before any color is sent.
    #[test]
    fn failed_start_sends_no_colors() {
        let mut ctl =
            Controller::new(MockTransport::fail_at(0), DeviceState::default()).with_pacing(Duration::ZERO);
        let stop = AtomicBool::new(false);
        let err = ctl.run_session(Mode::Rainbow, &stop).unwrap_err();
        assert!(matches!(err, Error::Send { command: "stop-mouse", .. }));
        assert!(ctl.transport().sent().is_empty());
        assert_eq!(ctl.session(), SessionState::Ready);
    }
}
