//! Per-consumer stream of orientation updates
//!
//! A session remembers the last version it wrote and blocks in
//! [`StateStore::await_change`] until something newer is published, so a slow
//! consumer skips intermediate updates instead of queueing them.

use super::messages::AngleMessage;
use crate::error::Result;
use crate::shutdown::ShutdownToken;
use crate::state::StateStore;
use log::debug;
use std::io::Write;
use std::sync::Arc;

/// Writes one NDJSON record per observed state change to a consumer
pub struct ConsumerSession<W: Write> {
    writer: W,
    store: Arc<StateStore>,
    shutdown: ShutdownToken,
    /// Version of the last record written
    last_seen: u64,
    /// Reused serialization buffer
    line: Vec<u8>,
}

impl<W: Write> ConsumerSession<W> {
    pub fn new(writer: W, store: Arc<StateStore>, shutdown: ShutdownToken) -> Self {
        Self {
            writer,
            store,
            shutdown,
            last_seen: StateStore::INITIAL_VERSION,
            line: Vec::with_capacity(128),
        }
    }

    /// Stream updates until shutdown or a write failure.
    ///
    /// Returns the number of records written on shutdown. A write failure
    /// ends the session with that error and drops the writer.
    pub fn run(mut self) -> Result<u64> {
        let mut sent = 0u64;

        while self.shutdown.is_running() {
            let snapshot = self.store.await_change(self.last_seen);
            if !self.shutdown.is_running() {
                break;
            }
            self.last_seen = snapshot.version;

            AngleMessage::from(snapshot).encode_line(&mut self.line)?;
            self.writer.write_all(&self.line)?;
            self.writer.flush()?;
            sent += 1;
        }

        debug!("Session stopped after {} records", sent);
        Ok(sent)
    }
}
