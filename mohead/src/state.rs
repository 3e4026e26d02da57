//! Latest-orientation store with wake-all broadcast
//!
//! A single `parking_lot::Mutex` + `Condvar` pair guards the snapshot.
//!
//! - The decode loop is the only writer. Each [`StateStore::publish`] overwrites
//!   the angles, bumps `version` and wakes every blocked reader before the lock
//!   is released.
//! - Readers call [`StateStore::await_change`] with the last version they saw and
//!   get back whatever is current once it differs.
//!
//! There is no queue: a reader that falls behind by N publishes sees only the
//! latest one, and writers never wait on readers.

use crate::protocol::AngleReading;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Versioned copy of the shared orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngleSnapshot {
    /// Bumped once per publish, wrapping on overflow
    pub version: u64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AngleSnapshot {
    pub fn reading(&self) -> AngleReading {
        AngleReading {
            roll: self.roll,
            pitch: self.pitch,
            yaw: self.yaw,
        }
    }
}

/// Single-writer, many-reader orientation state
#[derive(Debug, Default)]
pub struct StateStore {
    state: Mutex<AngleSnapshot>,
    changed: Condvar,
    waiting: AtomicUsize,
}

impl StateStore {
    /// Version held before the first publish
    pub const INITIAL_VERSION: u64 = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the angles, bump the version and wake all readers.
    ///
    /// Returns the new version. Must only be called from one thread.
    pub fn publish(&self, reading: AngleReading) -> u64 {
        let mut state = self.state.lock();
        self.write_locked(&mut state, reading)
    }

    fn write_locked(
        &self,
        state: &mut MutexGuard<'_, AngleSnapshot>,
        reading: AngleReading,
    ) -> u64 {
        state.roll = reading.roll;
        state.pitch = reading.pitch;
        state.yaw = reading.yaw;
        state.version = state.version.wrapping_add(1);
        self.changed.notify_all();
        state.version
    }

    /// Block until the version differs from `last_seen`, then return a snapshot.
    ///
    /// Returns immediately if it already differs. No timeout.
    pub fn await_change(&self, last_seen: u64) -> AngleSnapshot {
        let mut state = self.state.lock();
        if state.version == last_seen {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            while state.version == last_seen {
                self.changed.wait(&mut state);
            }
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }
        *state
    }

    /// Current snapshot without waiting
    pub fn snapshot(&self) -> AngleSnapshot {
        *self.state.lock()
    }

    /// Readers currently blocked in [`await_change`](Self::await_change)
    pub fn waiting_readers(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }
}
