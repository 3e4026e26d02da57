//! Angle payload (TYPE=0x53)
//!
//! Payload bytes 0..6 hold roll, pitch and yaw as little-endian i16.
//! Each is normalized by dividing by 32768, giving a value in [-1, 1)
//! that maps to [-180°, 180°). Values are not clamped: whatever the sensor
//! reports in a checksum-valid frame is passed through.

use super::frame::{DEFAULT_PAYLOAD_LEN, Frame};
use super::schema::{FieldLayout, FrameSchema};
use serde::{Deserialize, Serialize};

/// Type tag of angle frames
pub const FRAME_TYPE_ANGLES: u8 = 0x53;

/// Raw i16 full-scale divisor
pub const ANGLE_FULL_SCALE: f64 = 32768.0;

/// Degrees represented by a normalized value of 1.0
const DEGREES_PER_UNIT: f64 = 180.0;

pub const ANGLE_SCHEMA: FrameSchema<3> = FrameSchema {
    frame_type: FRAME_TYPE_ANGLES,
    name: "angles",
    fields: [
        FieldLayout::i16_le("roll", 0, ANGLE_FULL_SCALE),
        FieldLayout::i16_le("pitch", 2, ANGLE_FULL_SCALE),
        FieldLayout::i16_le("yaw", 4, ANGLE_FULL_SCALE),
    ],
};

/// Normalized orientation from one angle frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleReading {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AngleReading {
    /// Extract angles from a validated frame; `None` for any other frame type
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        let [roll, pitch, yaw] = ANGLE_SCHEMA.decode(frame)?;
        Some(Self { roll, pitch, yaw })
    }

    /// Build from raw sensor counts
    pub fn from_raw(roll: i16, pitch: i16, yaw: i16) -> Self {
        Self {
            roll: f64::from(roll) / ANGLE_FULL_SCALE,
            pitch: f64::from(pitch) / ANGLE_FULL_SCALE,
            yaw: f64::from(yaw) / ANGLE_FULL_SCALE,
        }
    }

    /// Convert to degrees (roll, pitch, yaw)
    pub fn to_degrees(&self) -> (f64, f64, f64) {
        (
            self.roll * DEGREES_PER_UNIT,
            self.pitch * DEGREES_PER_UNIT,
            self.yaw * DEGREES_PER_UNIT,
        )
    }
}

/// Encode raw counts as a checksum-valid angle frame with the default payload length
pub fn angle_frame(roll: i16, pitch: i16, yaw: i16) -> Frame {
    let mut payload = [0u8; DEFAULT_PAYLOAD_LEN];
    payload[0..2].copy_from_slice(&roll.to_le_bytes());
    payload[2..4].copy_from_slice(&pitch.to_le_bytes());
    payload[4..6].copy_from_slice(&yaw.to_le_bytes());
    Frame::with_valid_checksum(FRAME_TYPE_ANGLES, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scaling() {
        let reading = AngleReading::from_frame(&angle_frame(16384, -32768, 0)).unwrap();
        assert_eq!(reading.roll, 0.5);
        assert_eq!(reading.pitch, -1.0);
        assert_eq!(reading.yaw, 0.0);
    }

    #[test]
    fn test_reference_payload() {
        let frame = Frame::new(
            FRAME_TYPE_ANGLES,
            &[0x00, 0x40, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00],
            0xA8,
        );
        let reading = AngleReading::from_frame(&frame).unwrap();
        assert_eq!(reading, AngleReading { roll: 0.5, pitch: 0.0, yaw: -0.5 });
    }

    #[test]
    fn test_max_positive_not_clamped() {
        let reading = AngleReading::from_frame(&angle_frame(i16::MAX, 1, -1)).unwrap();
        assert_relative_eq!(reading.roll, 32767.0 / 32768.0, epsilon = 1e-12);
        assert_relative_eq!(reading.pitch, 1.0 / 32768.0, epsilon = 1e-12);
        assert_relative_eq!(reading.yaw, -1.0 / 32768.0, epsilon = 1e-12);
    }

    #[test]
    fn test_other_frame_types_ignored() {
        let accel = Frame::with_valid_checksum(0x51, &[0x00, 0x40, 0, 0, 0, 0, 0, 0]);
        assert_eq!(AngleReading::from_frame(&accel), None);
    }

    #[test]
    fn test_matches_from_raw() {
        let frame = angle_frame(1234, -4321, 32000);
        assert_eq!(
            AngleReading::from_frame(&frame),
            Some(AngleReading::from_raw(1234, -4321, 32000))
        );
    }

    #[test]
    fn test_to_degrees() {
        let (roll, pitch, yaw) = AngleReading::from_raw(16384, -8192, 0).to_degrees();
        assert_relative_eq!(roll, 90.0);
        assert_relative_eq!(pitch, -45.0);
        assert_relative_eq!(yaw, 0.0);
    }
}
