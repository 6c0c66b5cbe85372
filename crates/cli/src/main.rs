//! ds100 CLI: drive the DS100's LED from the command line.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ds100_core::animation::Mode;
use ds100_core::device::{discover_devices, Ds100Device};
use ds100_core::lifecycle::Controller;
use ds100_core::protocol::{self, Command};
use ds100_core::state::{DeviceState, FlashSpeed, Rgb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "ds100",
    version,
    about = "RGB lighting control for the MSI Interceptor DS100"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the LED until Ctrl-C, then save the last color (default).
    Animate {
        /// Pattern: rainbow or grayscale.
        #[arg(long, default_value = "rainbow", value_parser = parse_mode)]
        mode: Mode,
        #[command(flatten)]
        state: StateArgs,
    },
    /// Show one solid color and give the mouse back.
    SetColor {
        /// Color as RRGGBB or #RRGGBB.
        #[arg(value_parser = parse_color)]
        color: Rgb,
        /// Flash speed: none, slow, medium, fast.
        #[arg(long, default_value = "none", value_parser = parse_flash)]
        flash: FlashSpeed,
        /// LED on or off.
        #[arg(long, default_value = "on", value_parser = parse_lights, action = clap::ArgAction::Set)]
        lights: bool,
        /// Persist to the mouse so it survives a replug.
        #[arg(long)]
        save: bool,
    },
    /// Print the report a command would send, without opening the device.
    Encode {
        /// color-update, stop-mouse, activate-mouse, or save-prefs.
        #[arg(value_parser = parse_command)]
        command: Command,
        #[command(flatten)]
        state: StateArgs,
        /// Print JSON instead of hex.
        #[arg(long)]
        json: bool,
    },
    /// List connected DS100 interfaces.
    List,
}

/// Starting device state shared by several subcommands.
#[derive(Args, Clone)]
struct StateArgs {
    /// Color as RRGGBB or #RRGGBB.
    #[arg(long, default_value = "FF0000", value_parser = parse_color)]
    color: Rgb,
    /// Flash speed: none, slow, medium, fast.
    #[arg(long, default_value = "none", value_parser = parse_flash)]
    flash: FlashSpeed,
    /// LED on or off.
    #[arg(long, default_value = "on", value_parser = parse_lights, action = clap::ArgAction::Set)]
    lights: bool,
}

impl Default for StateArgs {
    fn default() -> Self {
        let state = DeviceState::default();
        Self {
            color: state.color,
            flash: state.flash_speed,
            lights: state.lights_on,
        }
    }
}

impl From<StateArgs> for DeviceState {
    fn from(args: StateArgs) -> Self {
        DeviceState {
            lights_on: args.lights,
            flash_speed: args.flash,
            color: args.color,
        }
    }
}

fn parse_color(s: &str) -> std::result::Result<Rgb, String> {
    Rgb::from_hex(s).map_err(|e| e.to_string())
}

fn parse_flash(s: &str) -> std::result::Result<FlashSpeed, String> {
    FlashSpeed::from_name(s).ok_or_else(|| {
        format!("unknown flash speed '{s}'. Valid speeds: none, slow, medium, fast")
    })
}

fn parse_lights(s: &str) -> std::result::Result<bool, String> {
    match s.to_lowercase().as_str() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        _ => Err(format!("expected 'on' or 'off', got '{s}'")),
    }
}

fn parse_mode(s: &str) -> std::result::Result<Mode, String> {
    Mode::from_name(s)
        .ok_or_else(|| format!("unknown mode '{s}'. Valid modes: rainbow, grayscale"))
}

fn parse_command(s: &str) -> std::result::Result<Command, String> {
    Command::from_name(s).ok_or_else(|| {
        format!(
            "unknown command '{s}'. Valid commands: color-update, stop-mouse, activate-mouse, save-prefs"
        )
    })
}

/// Raise the returned flag on Ctrl-C.
fn setup_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;
    Ok(stop)
}

fn open_controller(state: DeviceState) -> Result<Controller<Ds100Device>> {
    Controller::connect(Ds100Device::open, state).context("Could not connect to the device")
}

fn animate(mode: Mode, state: DeviceState) -> Result<()> {
    let mut controller = open_controller(state)?;

    println!("Use Control-C to take the control of the device back or unplug the device to stop...");
    let stop = setup_interrupt_handler()?;

    controller
        .run_session(mode, &stop)
        .context("Could not send packet")?;
    info!(color = %controller.state().color, "Preferences saved");
    Ok(())
}

fn set_color(color: Rgb, flash: FlashSpeed, lights: bool, save: bool) -> Result<()> {
    let state = DeviceState {
        lights_on: lights,
        flash_speed: flash,
        color,
    };
    let mut controller = open_controller(state)?;
    controller
        .apply_solid(color, save)
        .context("Could not send packet")?;
    if save {
        println!("Color set to {color} and saved to the device");
    } else {
        println!("Color set to {color}");
    }
    Ok(())
}

fn encode(command: Command, state: DeviceState, json: bool) -> Result<()> {
    let report = command.encode(&state);
    if json {
        let out = serde_json::json!({
            "command": command.name(),
            "state": state,
            "report": protocol::to_hex(&report),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", protocol::to_hex(&report));
    }
    Ok(())
}

fn list() -> Result<()> {
    let devices = discover_devices()?;
    if devices.is_empty() {
        println!("No DS100 found.");
        println!("Ensure the mouse is plugged in and you have access to its hidraw node.");
    } else {
        for dev in &devices {
            println!(
                "{} (VID: 0x{:04X}, PID: 0x{:04X}, interface: {}, path: {})",
                dev.product.as_deref().unwrap_or("DS100"),
                dev.vid,
                dev.pid,
                dev.interface,
                dev.path
            );
        }
    }
    Ok(())
}

/// Single-line console message for a fatal error, including its causes.
fn diagnostic(err: &anyhow::Error) -> String {
    format!("[!] {err:#}")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", diagnostic(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Animate {
        mode: Mode::default(),
        state: StateArgs::default(),
    }) {
        Commands::Animate { mode, state } => animate(mode, state.into()),
        Commands::SetColor {
            color,
            flash,
            lights,
            save,
        } => set_color(color, flash, lights, save),
        Commands::Encode {
            command,
            state,
            json,
        } => encode(command, state.into(), json),
        Commands::List => list(),
    }
}
