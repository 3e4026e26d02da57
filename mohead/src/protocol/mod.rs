//! JY901 serial protocol
//!
//! Inbound frame format: [0x55] [TYPE] [PAYLOAD x N] [CHECKSUM]
//!
//! Checksum: 8-bit wrapping sum of SYNC + TYPE + every payload byte.
//! N is fixed per deployment (8 on the JY901/BT901 modules).
//!
//! Outbound commands use a separate fixed 5-byte shape, see [`command`].
//!
//! This module provides:
//! - [`FrameDecoder`]: sync search, checksum validation and resync over any `Read`
//! - [`FrameSchema`]: declared field layout per frame type
//! - [`AngleReading`]: the decoded roll/pitch/yaw payload
//! - [`DeviceCommand`]: configuration and calibration commands

pub mod command;
pub mod decoder;
pub mod frame;
pub mod payload;
pub mod schema;

pub use command::DeviceCommand;
pub use decoder::{DecoderStats, FrameDecoder};
pub use frame::{checksum, Frame, DEFAULT_PAYLOAD_LEN, MAX_PAYLOAD_LEN, SYNC};
pub use payload::{AngleReading, ANGLE_SCHEMA, FRAME_TYPE_ANGLES};
pub use schema::{FieldLayout, FrameSchema};
