//! One-shot sensor setup script (`--setup`)
//!
//! Resets the module, restricts its output frames, runs accelerometer and
//! magnetometer calibration with operator countdowns, raises the output rate
//! and saves to flash. The module never acknowledges commands, so each step
//! is followed by a fixed pause.
//!
//! Failures of the framing steps (reset, frame selection, speed, save) abort
//! the script. A failed calibration command is logged and the script moves on,
//! since the remaining steps still leave the module in a usable state.

use crate::config::CalibrationConfig;
use crate::error::Result;
use crate::protocol::DeviceCommand;
use std::io::Write;
use std::thread;
use std::time::Duration;

/// Run the full setup sequence against the sensor link
pub fn run<W: Write>(port: &mut W, timing: &CalibrationConfig) -> Result<()> {
    send(port, DeviceCommand::Reset)?;
    log::info!("Module reset");
    thread::sleep(timing.settle());

    send(port, DeviceCommand::SelectFrames)?;
    log::info!("Frames selected");
    thread::sleep(timing.settle());

    countdown(
        "Starting acceleration calibration, keep the module level",
        timing.accel_countdown_secs,
    );
    send_logged(port, DeviceCommand::AccelerationCalibration);
    countdown(
        "Acceleration calibration in progress",
        timing.accel_duration_secs,
    );
    send_logged(port, DeviceCommand::ExitCalibration);
    log::info!("Acceleration calibration complete");

    countdown(
        "Starting magnetic field calibration, rotate the module on all axes",
        timing.mag_countdown_secs,
    );
    send_logged(port, DeviceCommand::MagneticCalibration);
    countdown("Magnetic calibration in progress", timing.mag_duration_secs);
    send_logged(port, DeviceCommand::ExitCalibration);
    log::info!("Magnetic calibration complete");
    thread::sleep(timing.settle());

    send(port, DeviceCommand::SpeedMode)?;
    log::info!("Speed mode selected");
    thread::sleep(timing.settle());

    send(port, DeviceCommand::Save)?;
    log::info!("Configuration saved");
    Ok(())
}

fn send<W: Write>(port: &mut W, command: DeviceCommand) -> Result<()> {
    log::debug!("Sending {} command: {:02X?}", command.name(), command.to_bytes());
    command.send_to(port).map_err(|e| {
        log::error!("Failed to send {} command: {}", command.name(), e);
        e.into()
    })
}

/// Send a command whose failure does not abort the script
fn send_logged<W: Write>(port: &mut W, command: DeviceCommand) {
    if send(port, command).is_err() {
        log::warn!("Continuing setup without {}", command.name());
    }
}

/// Log the remaining seconds once per second
fn countdown(title: &str, secs: u64) {
    for remaining in (1..=secs).rev() {
        log::info!("{}: {}...", title, remaining);
        thread::sleep(Duration::from_secs(1));
    }
}
