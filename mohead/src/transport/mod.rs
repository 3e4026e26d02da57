//! Byte-stream endpoints for the sensor link
//!
//! Everything above this layer works on `std::io::Read` / `std::io::Write`,
//! so the decoder and the calibration script run unchanged against a real
//! serial port, an in-memory [`mock::MockPort`] or a `Cursor`.

pub mod serial;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use serial::SerialTransport;
