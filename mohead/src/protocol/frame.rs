//! Validated protocol frame
//!
//! Uses a fixed-size inline payload instead of `Vec<u8>` so that frames are
//! `Copy` and the decode loop never allocates.

/// Frame start marker
pub const SYNC: u8 = 0x55;

/// Payload length used by JY901/BT901 modules
pub const DEFAULT_PAYLOAD_LEN: usize = 8;

/// Largest payload length a decoder can be configured for
pub const MAX_PAYLOAD_LEN: usize = 32;

/// Compute the frame checksum: wrapping byte sum of SYNC, type and payload.
pub fn checksum(frame_type: u8, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(SYNC.wrapping_add(frame_type), |acc, &b| acc.wrapping_add(b))
}

/// One protocol unit: type tag, fixed-length payload and trailing checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub frame_type: u8,
    payload: [u8; MAX_PAYLOAD_LEN],
    payload_len: usize,
    pub checksum: u8,
}

impl Frame {
    /// Build a frame from its received parts.
    ///
    /// Payload bytes beyond [`MAX_PAYLOAD_LEN`] are dropped.
    pub fn new(frame_type: u8, payload: &[u8], checksum: u8) -> Self {
        let len = payload.len().min(MAX_PAYLOAD_LEN);
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        buf[..len].copy_from_slice(&payload[..len]);
        Self {
            frame_type,
            payload: buf,
            payload_len: len,
            checksum,
        }
    }

    /// Build a frame with a correct checksum (for simulators and tests)
    pub fn with_valid_checksum(frame_type: u8, payload: &[u8]) -> Self {
        let mut frame = Self::new(frame_type, payload, 0);
        frame.checksum = frame.compute_checksum();
        frame
    }

    /// Payload bytes
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_len]
    }

    /// Checksum this frame should carry
    #[inline]
    pub fn compute_checksum(&self) -> u8 {
        checksum(self.frame_type, self.payload())
    }

    /// True if the stored checksum matches the computed one
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    /// Wire bytes including the sync marker
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.payload_len + 3);
        bytes.push(SYNC);
        bytes.push(self.frame_type);
        bytes.extend_from_slice(self.payload());
        bytes.push(self.checksum);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_reference_angle_frame() {
        // 55 53 | 00 40 00 00 00 C0 00 00 | A8
        let payload = [0x00, 0x40, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00];
        assert_eq!(checksum(0x53, &payload), 0xA8);
    }

    #[test]
    fn test_checksum_wraps() {
        // 0x55 + 0xFF + 0x02 = 0x156 -> 0x56
        assert_eq!(checksum(0xFF, &[0x02]), 0x56);
        assert_eq!(checksum(0x00, &[]), SYNC);
    }

    #[test]
    fn test_is_valid_iff_checksum_matches() {
        let payloads: [[u8; 8]; 4] = [
            [0; 8],
            [0xFF; 8],
            [0x55, 0x53, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
            [0x80, 0x7F, 0x00, 0xAA, 0x10, 0x20, 0xFE, 0x01],
        ];

        for frame_type in [0x00u8, 0x51, 0x53, 0x55, 0xFF] {
            for payload in &payloads {
                let expected = checksum(frame_type, payload);
                for stored in 0..=u8::MAX {
                    let frame = Frame::new(frame_type, payload, stored);
                    assert_eq!(frame.is_valid(), stored == expected);
                }
            }
        }
    }

    #[test]
    fn test_with_valid_checksum() {
        let frame = Frame::with_valid_checksum(0x53, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(frame.is_valid());
        assert_eq!(frame.payload(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_payload_truncated_to_max() {
        let frame = Frame::new(0x53, &[0xAA; 40], 0);
        assert_eq!(frame.payload().len(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn test_to_bytes_layout() {
        let frame =
            Frame::with_valid_checksum(0x53, &[0x00, 0x40, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00]);
        assert_eq!(
            frame.to_bytes(),
            vec![0x55, 0x53, 0x00, 0x40, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0xA8]
        );
    }
}
