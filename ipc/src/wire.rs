//! The i3 IPC wire framing: a 14-byte header followed by a JSON payload.
//!
//! ```text
//! 6 bytes   magic string "i3-ipc"
//! 4 bytes   payload length, little-endian u32
//! 4 bytes   message type, little-endian u32 (top bit set => event)
//! N bytes   UTF-8 JSON payload
//! ```

use std::io::{self, Read, Write};

pub const MAGIC: &[u8; 6] = b"i3-ipc";
pub const HEADER_LEN: usize = 14;

/// Bit that distinguishes an event push from a reply when set on the raw
/// message-type word read off the wire.
pub const EVENT_BIT: u32 = 1 << 31;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("bad magic: expected {MAGIC:?}, found {0:?}")]
    BadMagic([u8; 6]),
    #[error("payload of {0} bytes exceeds the maximum frame size of {MAX_PAYLOAD_LEN}")]
    PayloadTooLarge(usize),
}

/// Refuse to allocate for an absurd length field; a misbehaving peer should
/// fail fast rather than exhaust memory.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

/// A decoded frame: raw message-type word (event bit still set, if present)
/// and the raw JSON payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub raw_type: u32,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn is_event(&self) -> bool {
        self.raw_type & EVENT_BIT != 0
    }

    pub fn type_code(&self) -> u32 {
        self.raw_type & !EVENT_BIT
    }

    pub fn new(raw_type: u32, payload: Vec<u8>) -> Self {
        Self { raw_type, payload }
    }
}

/// Write one frame to `w`: header then payload, in a single buffered write
/// so a concurrent reader never observes a half-written header.
pub fn write_frame(mut w: impl Write, frame: &Frame) -> Result<(), FrameError> {
    if frame.payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge(frame.payload.len()));
    }
    let mut buf = Vec::with_capacity(HEADER_LEN + frame.payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&(frame.payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(&frame.raw_type.to_le_bytes());
    buf.extend_from_slice(&frame.payload);
    w.write_all(&buf)?;
    Ok(())
}

/// Read exactly one frame from `r`, blocking until the header and payload
/// are both available.
pub fn read_frame(mut r: impl Read) -> Result<Frame, FrameError> {
    let mut header = [0u8; HEADER_LEN];
    r.read_exact(&mut header)?;

    let mut magic = [0u8; 6];
    magic.copy_from_slice(&header[0..6]);
    if &magic != MAGIC {
        return Err(FrameError::BadMagic(magic));
    }

    let len = u32::from_le_bytes(header[6..10].try_into().unwrap()) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge(len));
    }
    let raw_type = u32::from_le_bytes(header[10..14].try_into().unwrap());

    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)?;

    Ok(Frame { raw_type, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_frame() {
        let frame = Frame::new(4, br#"{"nodes":[]}"#.to_vec());
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame).unwrap();
        assert_eq!(&buf[0..6], MAGIC);

        let decoded = read_frame(Cursor::new(buf)).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn event_bit_round_trips() {
        let frame = Frame::new(EVENT_BIT | 3, b"{}".to_vec());
        assert!(frame.is_event());
        assert_eq!(frame.type_code(), 3);

        let mut buf = Vec::new();
        write_frame(&mut buf, &frame).unwrap();
        let decoded = read_frame(Cursor::new(buf)).unwrap();
        assert!(decoded.is_event());
        assert_eq!(decoded.type_code(), 3);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = vec![b'x'; HEADER_LEN];
        buf[6..10].copy_from_slice(&0u32.to_le_bytes());
        buf[10..14].copy_from_slice(&0u32.to_le_bytes());
        let err = read_frame(Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, FrameError::BadMagic(_)));
    }

    #[test]
    fn rejects_oversized_payload_len() {
        let mut buf = vec![0u8; HEADER_LEN];
        buf[0..6].copy_from_slice(MAGIC);
        buf[6..10].copy_from_slice(&(MAX_PAYLOAD_LEN as u32 + 1).to_le_bytes());
        let err = read_frame(Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge(_)));
    }
}
