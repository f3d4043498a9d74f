//! Byte <-> pixel sample packing.
//!
//! In [`SymbolBits::Four`] mode every byte becomes two nibbles (high first),
//! each stored as `nibble * 17` so the 0..=15 range spans the full 0..=255
//! channel range. In [`SymbolBits::Eight`] mode bytes are stored as-is.

use crate::error::{CodecError, Result};
use crate::raster::ChannelMode;

/// Multiplier mapping a nibble onto the 8-bit channel range (255 / 15).
pub const NIBBLE_SCALE: u8 = 17;

/// Logical bits carried by each stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolBits {
    Four,
    Eight,
}

impl SymbolBits {
    pub const fn bits(self) -> u32 {
        match self {
            SymbolBits::Four => 4,
            SymbolBits::Eight => 8,
        }
    }

    /// Samples needed to carry one byte.
    pub const fn symbols_per_byte(self) -> usize {
        match self {
            SymbolBits::Four => 2,
            SymbolBits::Eight => 1,
        }
    }
}

/// Number of whole pixels needed to carry `len` bytes.
pub fn pixels_for(len: usize, bits: SymbolBits, channels: ChannelMode) -> u64 {
    let symbols = len as u64 * bits.symbols_per_byte() as u64;
    symbols.div_ceil(channels.channels() as u64)
}

/// Split `bytes` into samples and group them into pixels of `channels`.
///
/// The final pixel is zero-filled when the symbol count is not a multiple of
/// the channel count.
pub fn pack(bytes: &[u8], bits: SymbolBits, channels: ChannelMode) -> Vec<u8> {
    let per_pixel = channels.channels();
    let symbols = bytes.len() * bits.symbols_per_byte();
    let mut out = Vec::with_capacity(symbols.next_multiple_of(per_pixel));

    match bits {
        SymbolBits::Four => {
            for &byte in bytes {
                out.push((byte >> 4) * NIBBLE_SCALE);
                out.push((byte & 0x0F) * NIBBLE_SCALE);
            }
        }
        SymbolBits::Eight => out.extend_from_slice(bytes),
    }

    out.resize(symbols.next_multiple_of(per_pixel), 0);
    out
}

/// Recover bytes from packed samples. Exact inverse of [`pack`].
///
/// In 4-bit mode a dangling final nibble (odd sample count) carries no byte
/// and is dropped.
pub fn unpack(samples: &[u8], bits: SymbolBits, channels: ChannelMode) -> Result<Vec<u8>> {
    let per_pixel = channels.channels();
    if samples.len() % per_pixel != 0 {
        return Err(CodecError::RaggedSamples {
            len: samples.len(),
            channels: per_pixel,
        });
    }

    let bytes = match bits {
        SymbolBits::Four => samples
            .chunks_exact(2)
            .map(|pair| ((pair[0] / NIBBLE_SCALE) << 4) | (pair[1] / NIBBLE_SCALE))
            .collect(),
        SymbolBits::Eight => samples.to_vec(),
    };
    Ok(bytes)
}
