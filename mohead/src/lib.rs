//! mohead - JY901 orientation decoder and NDJSON broadcaster
//!
//! Reads the JY901/BT901 IMU serial stream, keeps the latest roll/pitch/yaw
//! in a shared versioned store and streams every observed change to TCP
//! consumers as newline-delimited JSON.
//!
//! ## Layout
//!
//! - [`protocol`]: frame decoding, payload schemas and device commands
//! - [`state`]: latest-value store with wake-all broadcast
//! - [`ingest`]: decode loop feeding the store
//! - [`streaming`]: TCP server and per-consumer sessions
//! - [`calibration`]: `--setup` command script
//! - [`transport`]: serial port (and an in-memory port for tests)
//!
//! ## Features
//!
//! - `mock`: Export [`transport::mock::MockPort`] for hardware-free testing

pub mod calibration;
pub mod config;
pub mod error;
pub mod ingest;
pub mod protocol;
pub mod shutdown;
pub mod state;
pub mod streaming;
pub mod transport;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use shutdown::ShutdownToken;
pub use state::{AngleSnapshot, StateStore};
