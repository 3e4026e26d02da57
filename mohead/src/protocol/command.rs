//! Outbound device commands
//!
//! Command format: [0xFF 0xAA] [ADDR] [DL] [DH]
//!
//! Commands write a 16-bit value (DH:DL) to a configuration register (ADDR).
//! They share the full-duplex serial link with inbound frames; the device
//! does not acknowledge them.

use std::io::{self, Write};

/// Command header bytes
pub const COMMAND_HEADER: [u8; 2] = [0xFF, 0xAA];

/// Encoded command length
pub const COMMAND_LEN: usize = 5;

/// Configuration register addresses
mod register {
    pub const SAVE: u8 = 0x00;
    pub const CALIBRATE: u8 = 0x01;
    pub const OUTPUT_CONTENT: u8 = 0x02;
    pub const OUTPUT_RATE: u8 = 0x03;
}

/// Commands understood by JY901/BT901 modules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Persist current configuration to flash
    Save,
    /// Restore factory configuration
    Reset,
    /// Leave any calibration mode
    ExitCalibration,
    /// Start accelerometer calibration (device must be level and still)
    AccelerationCalibration,
    /// Start magnetometer calibration (rotate the device on all axes)
    MagneticCalibration,
    /// Restrict output frames to time, acceleration, gyro and angle
    SelectFrames,
    /// Raise the output rate
    SpeedMode,
}

impl DeviceCommand {
    /// Register address and value bytes (ADDR, DL, DH)
    pub const fn register(self) -> (u8, u8, u8) {
        match self {
            DeviceCommand::Save => (register::SAVE, 0x00, 0x00),
            DeviceCommand::Reset => (register::SAVE, 0x01, 0x00),
            DeviceCommand::ExitCalibration => (register::CALIBRATE, 0x00, 0x00),
            DeviceCommand::AccelerationCalibration => (register::CALIBRATE, 0x01, 0x00),
            DeviceCommand::MagneticCalibration => (register::CALIBRATE, 0x02, 0x00),
            DeviceCommand::SelectFrames => (register::OUTPUT_CONTENT, 0x0F, 0x00),
            DeviceCommand::SpeedMode => (register::OUTPUT_RATE, 0x08, 0x00),
        }
    }

    /// Encode to wire bytes
    pub const fn to_bytes(self) -> [u8; COMMAND_LEN] {
        let (addr, dl, dh) = self.register();
        [COMMAND_HEADER[0], COMMAND_HEADER[1], addr, dl, dh]
    }

    /// Write the command and flush
    pub fn send_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceCommand::Save => "save",
            DeviceCommand::Reset => "reset",
            DeviceCommand::ExitCalibration => "exit calibration",
            DeviceCommand::AccelerationCalibration => "acceleration calibration",
            DeviceCommand::MagneticCalibration => "magnetic field calibration",
            DeviceCommand::SelectFrames => "select frames",
            DeviceCommand::SpeedMode => "speed mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_encoding() {
        assert_eq!(DeviceCommand::Save.to_bytes(), [0xFF, 0xAA, 0x00, 0x00, 0x00]);
        assert_eq!(DeviceCommand::Reset.to_bytes(), [0xFF, 0xAA, 0x00, 0x01, 0x00]);
        assert_eq!(
            DeviceCommand::ExitCalibration.to_bytes(),
            [0xFF, 0xAA, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            DeviceCommand::AccelerationCalibration.to_bytes(),
            [0xFF, 0xAA, 0x01, 0x01, 0x00]
        );
        assert_eq!(
            DeviceCommand::MagneticCalibration.to_bytes(),
            [0xFF, 0xAA, 0x01, 0x02, 0x00]
        );
        assert_eq!(
            DeviceCommand::SelectFrames.to_bytes(),
            [0xFF, 0xAA, 0x02, 0x0F, 0x00]
        );
        assert_eq!(DeviceCommand::SpeedMode.to_bytes(), [0xFF, 0xAA, 0x03, 0x08, 0x00]);
    }

    #[test]
    fn test_send_to_writes_all_bytes() {
        let mut out = Vec::new();
        DeviceCommand::Reset.send_to(&mut out).unwrap();
        DeviceCommand::Save.send_to(&mut out).unwrap();
        assert_eq!(out, [0xFF, 0xAA, 0x00, 0x01, 0x00, 0xFF, 0xAA, 0x00, 0x00, 0x00]);
    }
}
