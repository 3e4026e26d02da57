//! Decode loop: serial frames in, published orientation out

use crate::error::Result;
use crate::protocol::{AngleReading, FrameDecoder};
use crate::shutdown::ShutdownToken;
use crate::state::StateStore;
use std::io::Read;

/// Publish every angle frame until the stream fails or shutdown is requested.
///
/// Returns `Ok(())` on shutdown, including a read that gave up because
/// shutdown was requested while the link was silent. Any other stream failure
/// (EOF, device gone) is returned as-is; there is no reconnect.
pub fn run<R: Read>(
    decoder: &mut FrameDecoder<R>,
    store: &StateStore,
    shutdown: &ShutdownToken,
) -> Result<()> {
    log::info!(
        "Decoding frames (payload length {})",
        decoder.payload_len()
    );

    while shutdown.is_running() {
        let frame = match decoder.next_frame() {
            Ok(frame) => frame,
            Err(e) if !shutdown.is_running() => {
                log::debug!("Read ended by shutdown: {}", e);
                break;
            }
            Err(e) => return Err(e),
        };

        match AngleReading::from_frame(&frame) {
            Some(reading) => {
                let version = store.publish(reading);
                log::trace!(
                    "Angles #{}: roll={:.4} pitch={:.4} yaw={:.4}",
                    version,
                    reading.roll,
                    reading.pitch,
                    reading.yaw
                );
            }
            None => {
                log::trace!("Ignoring frame type 0x{:02X}", frame.frame_type);
            }
        }
    }

    log::info!("Decode loop stopped");
    Ok(())
}
