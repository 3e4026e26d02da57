//! Frame decoder with sync search and checksum-driven resynchronization
//!
//! # Algorithm
//!
//! 1. Read single bytes until one equals [`SYNC`]. A read failure here ends the stream.
//! 2. Read TYPE + PAYLOAD + CHECKSUM as one block (`read_exact`). A short read ends the stream.
//! 3. Validate the checksum. On match, return the frame.
//! 4. On mismatch, drop the block and go back to step 1 on the bytes that follow it.
//!
//! Step 4 never rescans the dropped block. A SYNC byte sitting inside a
//! corrupted frame is skipped along with the rest of that block, so the
//! frame it starts cannot be recovered (see
//! `test_embedded_sync_in_corrupted_frame_is_skipped`).
//!
//! The decoder does not interpret TYPE; unknown types come back as valid frames.

use super::frame::{DEFAULT_PAYLOAD_LEN, Frame, MAX_PAYLOAD_LEN, SYNC};
use crate::error::{Error, Result};
use std::io::{BufReader, Read};

/// Running counters for a decoder instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// Frames that passed checksum validation
    pub frames: u64,
    /// Frames dropped on checksum mismatch
    pub checksum_failures: u64,
    /// Bytes skipped while searching for SYNC
    pub discarded_bytes: u64,
}

/// Pulls checksum-validated frames from a byte stream
pub struct FrameDecoder<R> {
    reader: BufReader<R>,
    payload_len: usize,
    /// TYPE + PAYLOAD + CHECKSUM, reused across frames
    block: [u8; MAX_PAYLOAD_LEN + 2],
    stats: DecoderStats,
}

impl<R: Read> FrameDecoder<R> {
    /// Create a decoder for the default 8-byte payload
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            payload_len: DEFAULT_PAYLOAD_LEN,
            block: [0u8; MAX_PAYLOAD_LEN + 2],
            stats: DecoderStats::default(),
        }
    }

    /// Create a decoder for a deployment-specific payload length
    pub fn with_payload_len(reader: R, payload_len: usize) -> Result<Self> {
        if payload_len == 0 || payload_len > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidParameter(format!(
                "payload length {} outside 1..={}",
                payload_len, MAX_PAYLOAD_LEN
            )));
        }
        let mut decoder = Self::new(reader);
        decoder.payload_len = payload_len;
        Ok(decoder)
    }

    /// Configured payload length
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Return the next frame whose checksum validates.
    ///
    /// Checksum mismatches are absorbed here and never returned. Any read
    /// failure (EOF, short block, I/O fault) is returned as an error and the
    /// decoder should not be used afterwards.
    pub fn next_frame(&mut self) -> Result<Frame> {
        loop {
            self.seek_sync()?;

            let block_len = self.payload_len + 2;
            let block = &mut self.block[..block_len];
            self.reader.read_exact(block)?;

            let frame = Frame::new(block[0], &block[1..block_len - 1], block[block_len - 1]);
            if frame.is_valid() {
                self.stats.frames += 1;
                return Ok(frame);
            }

            self.stats.checksum_failures += 1;
            log::debug!(
                "Checksum mismatch for TYPE=0x{:02X}: received=0x{:02X}, calculated=0x{:02X}",
                frame.frame_type,
                frame.checksum,
                frame.compute_checksum()
            );
        }
    }

    /// Consume bytes up to and including the next SYNC byte
    fn seek_sync(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        loop {
            self.reader.read_exact(&mut byte)?;
            if byte[0] == SYNC {
                return Ok(());
            }
            self.stats.discarded_bytes += 1;
        }
    }
}
