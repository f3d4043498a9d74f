use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::{CodecError, Result};

/// A lossless byte-stream compressor applied before framing.
pub trait Compressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Exact inverse of [`Compressor::compress`].
    ///
    /// Must fail with [`CodecError::CorruptData`] rather than return a partial
    /// result.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// zlib (RFC 1950) at maximum compression.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zlib;

impl Compressor for Zlib {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(data.len() / 2 + 16),
            Compression::best(),
        );
        encoder.write_all(data).map_err(CodecError::CorruptData)?;
        encoder.finish().map_err(CodecError::CorruptData)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut inflater = Decompress::new(true);
        let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64));

        loop {
            if out.len() == out.capacity() {
                out.reserve(out.capacity());
            }
            let consumed = inflater.total_in() as usize;
            let status = inflater
                .decompress_vec(&data[consumed..], &mut out, FlushDecompress::Finish)
                .map_err(|err| {
                    CodecError::CorruptData(io::Error::new(io::ErrorKind::InvalidData, err))
                })?;

            match status {
                Status::StreamEnd => break,
                // Output space left over means the input ran dry before the end marker.
                Status::Ok | Status::BufError if out.len() < out.capacity() => {
                    return Err(corrupt("stream ended before its end marker"));
                }
                Status::Ok | Status::BufError => {}
            }
        }

        if (inflater.total_in() as usize) < data.len() {
            return Err(corrupt("trailing bytes after end of stream"));
        }
        tracing::trace!(compressed = data.len(), inflated = out.len(), "inflated payload");
        Ok(out)
    }
}

fn corrupt(reason: &'static str) -> CodecError {
    CodecError::CorruptData(io::Error::new(io::ErrorKind::InvalidData, reason))
}
