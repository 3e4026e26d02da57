//! Declared payload layouts per frame type
//!
//! Each decodable frame type gets a [`FrameSchema`] listing its fields with
//! their byte offset and scale, so extraction never hand-slices the payload.

use super::frame::Frame;

/// One little-endian signed 16-bit field inside a payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub name: &'static str,
    /// Byte offset from payload start
    pub offset: usize,
    /// Raw value is divided by this to get the physical value
    pub full_scale: f64,
}

impl FieldLayout {
    /// Width of an i16 field in bytes
    pub const WIDTH: usize = 2;

    pub const fn i16_le(name: &'static str, offset: usize, full_scale: f64) -> Self {
        Self {
            name,
            offset,
            full_scale,
        }
    }

    /// Raw signed reading, if the payload is long enough
    #[inline]
    pub fn read_raw(&self, payload: &[u8]) -> Option<i16> {
        let bytes = payload.get(self.offset..self.offset + Self::WIDTH)?;
        Some(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Scaled reading, if the payload is long enough
    #[inline]
    pub fn read(&self, payload: &[u8]) -> Option<f64> {
        self.read_raw(payload)
            .map(|raw| f64::from(raw) / self.full_scale)
    }
}

/// Layout of one frame type with `N` fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSchema<const N: usize> {
    pub frame_type: u8,
    pub name: &'static str,
    pub fields: [FieldLayout; N],
}

impl<const N: usize> FrameSchema<N> {
    /// Smallest payload that holds every field
    pub const fn min_payload_len(&self) -> usize {
        let mut len = 0;
        let mut i = 0;
        while i < N {
            let end = self.fields[i].offset + FieldLayout::WIDTH;
            if end > len {
                len = end;
            }
            i += 1;
        }
        len
    }

    /// True if the frame carries this schema's type tag and enough payload
    pub fn matches(&self, frame: &Frame) -> bool {
        frame.frame_type == self.frame_type && frame.payload().len() >= self.min_payload_len()
    }

    /// Decode every field in declaration order
    pub fn decode(&self, frame: &Frame) -> Option<[f64; N]> {
        if !self.matches(frame) {
            return None;
        }

        let payload = frame.payload();
        let mut values = [0.0; N];
        for (value, field) in values.iter_mut().zip(&self.fields) {
            *value = field.read(payload)?;
        }
        Some(values)
    }
}
