//! Cooperative shutdown signalling.
//!
//! Loops check the token at their natural boundaries (after a frame, after a
//! wake, between accepts). A thread blocked in a condvar wait or a socket
//! write only observes the token once that call returns. Serial reads give up
//! at the next port timeout (see `transport::serial`).

use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared running flag; cloning shares the same flag
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    running: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create a token that Ctrl-C (SIGINT) triggers.
    ///
    /// Can only be installed once per process.
    pub fn install_ctrl_c() -> Result<Self> {
        let token = Self::new();
        let handler_token = token.clone();
        ctrlc::set_handler(move || {
            log::info!("Received shutdown signal");
            handler_token.trigger();
        })
        .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;
        Ok(token)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request shutdown; idempotent
    pub fn trigger(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}
