//! NDJSON records sent to consumers
//!
//! One record per observed state change:
//!
//! ```text
//! {"id":1,"roll":0.5,"pitch":0.0,"yaw":-0.5}\n
//! ```
//!
//! `id` is the store version the values belong to. Angles are normalized to
//! [-1, 1); multiply by 180 for degrees.

use crate::error::Result;
use crate::state::AngleSnapshot;
use serde::{Deserialize, Serialize};

/// Wire form of one orientation update
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AngleMessage {
    pub id: u64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AngleMessage {
    /// Replace `buf` with the JSON record and its trailing newline
    pub fn encode_line(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.clear();
        serde_json::to_writer(&mut *buf, self)?;
        buf.push(b'\n');
        Ok(())
    }
}

impl From<AngleSnapshot> for AngleMessage {
    fn from(snapshot: AngleSnapshot) -> Self {
        Self {
            id: snapshot.version,
            roll: snapshot.roll,
            pitch: snapshot.pitch,
            yaw: snapshot.yaw,
        }
    }
}
