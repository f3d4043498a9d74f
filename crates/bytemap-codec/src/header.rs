use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::error::{CodecError, Result};

/// Tag length in bytes.
pub const MAGIC_LEN: usize = 3;

/// Header: magic (3) + length (8) = 11 bytes.
pub const HEADER_SIZE: usize = MAGIC_LEN + 8;

/// A 3-byte tag identifying which pipeline produced the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Magic(pub [u8; MAGIC_LEN]);

impl Magic {
    /// Raw payload follows ("BMR").
    pub const RAW: Magic = Magic(*b"BMR");

    /// Compressed payload follows ("BMZ").
    pub const COMPRESSED: Magic = Magic(*b"BMZ");

    pub const fn as_bytes(&self) -> &[u8; MAGIC_LEN] {
        &self.0
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic()) {
            for &b in &self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "0x{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
        }
    }
}

/// Append a framed payload to `dst`.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────────┬──────────────────┐
/// │ Magic (3B)   │ Length (8B BE) │ Payload          │
/// │ "BMR"/"BMZ"  │                │ (Length bytes)   │
/// └──────────────┴────────────────┴──────────────────┘
/// ```
pub fn wrap(magic: Magic, payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(magic.as_bytes());
    dst.put_u64(payload.len() as u64);
    dst.put_slice(payload);
}

/// Read the tag at the start of a framed buffer, if there is one.
pub fn peek_magic(framed: &[u8]) -> Option<Magic> {
    framed
        .get(..MAGIC_LEN)
        .and_then(|tag| tag.try_into().ok())
        .map(Magic)
}

/// Strip the header and trailing padding from a framed buffer.
///
/// Returns exactly the `Length` bytes that follow the header; everything after
/// them is padding and is ignored.
pub fn unwrap(framed: &[u8], expected: Magic) -> Result<&[u8]> {
    let found = peek_magic(framed).ok_or(CodecError::Truncated {
        declared: HEADER_SIZE as u64,
        available: framed.len(),
    })?;
    if found != expected {
        return Err(CodecError::MagicMismatch { expected, found });
    }

    let Some(length_bytes) = framed.get(MAGIC_LEN..HEADER_SIZE) else {
        return Err(CodecError::Truncated {
            declared: HEADER_SIZE as u64,
            available: framed.len(),
        });
    };
    let mut raw = [0u8; 8];
    raw.copy_from_slice(length_bytes);
    let declared = u64::from_be_bytes(raw);

    let available = framed.len() - HEADER_SIZE;
    let end = usize::try_from(declared)
        .ok()
        .filter(|&len| len <= available)
        .map(|len| HEADER_SIZE + len)
        .ok_or(CodecError::Truncated {
            declared,
            available,
        })?;

    tracing::trace!(magic = %found, declared, padding = framed.len() - end, "unwrapped header");
    Ok(&framed[HEADER_SIZE..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let mut buf = BytesMut::new();
        wrap(Magic::RAW, b"hello, bytemap!", &mut buf);

        assert_eq!(buf.len(), HEADER_SIZE + 15);
        assert_eq!(&buf[..3], b"BMR");
        assert_eq!(&buf[3..11], &15u64.to_be_bytes());

        let payload = unwrap(&buf, Magic::RAW).unwrap();
        assert_eq!(payload, b"hello, bytemap!");
    }

    #[test]
    fn test_unwrap_ignores_padding() {
        let mut buf = BytesMut::new();
        wrap(Magic::RAW, b"ab\0\0", &mut buf);
        buf.resize(buf.len() + 32, 0);

        let payload = unwrap(&buf, Magic::RAW).unwrap();
        assert_eq!(payload, b"ab\0\0");
    }

    #[test]
    fn test_unwrap_magic_mismatch() {
        let mut buf = BytesMut::new();
        wrap(Magic::COMPRESSED, b"x", &mut buf);

        let err = unwrap(&buf, Magic::RAW).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MagicMismatch {
                expected: Magic::RAW,
                found: Magic::COMPRESSED
            }
        ));
    }

    #[test]
    fn test_unwrap_truncated_payload() {
        let mut buf = BytesMut::new();
        wrap(Magic::RAW, b"hello", &mut buf);
        buf.truncate(HEADER_SIZE + 2);

        let err = unwrap(&buf, Magic::RAW).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Truncated {
                declared: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn test_unwrap_truncated_header() {
        let err = unwrap(b"BMR\0\0", Magic::RAW).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { .. }));

        let err = unwrap(b"BM", Magic::RAW).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { .. }));
    }

    #[test]
    fn test_unwrap_absurd_length() {
        let mut buf = BytesMut::new();
        buf.put_slice(b"BMR");
        buf.put_u64(u64::MAX);

        let err = unwrap(&buf, Magic::RAW).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Truncated {
                declared: u64::MAX,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        wrap(Magic::COMPRESSED, b"", &mut buf);
        assert_eq!(buf.len(), HEADER_SIZE);
        assert!(unwrap(&buf, Magic::COMPRESSED).unwrap().is_empty());
    }

    #[test]
    fn test_peek_magic() {
        assert_eq!(peek_magic(b"BMZrest"), Some(Magic::COMPRESSED));
        assert_eq!(peek_magic(b"BM"), None);
    }

    #[test]
    fn test_magic_display() {
        assert_eq!(Magic::RAW.to_string(), "BMR");
        assert_eq!(Magic([0, 1, 0xff]).to_string(), "0x0001ff");
    }
}
