use std::fmt;
use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::{CodecError, Result};

/// Channels stored per pixel. Every channel is stored as 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    Rgb,
    Rgba,
}

impl ChannelMode {
    /// Number of samples per pixel.
    pub const fn channels(self) -> usize {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Rgba => 4,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Rgb => f.write_str("RGB"),
            ChannelMode::Rgba => f.write_str("RGBA"),
        }
    }
}

/// A row-major grid of 8-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: ChannelMode,
    samples: Bytes,
}

impl Raster {
    /// Create a raster, checking that `samples` fills `width x height` exactly.
    pub fn new(
        width: u32,
        height: u32,
        channels: ChannelMode,
        samples: impl Into<Bytes>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CodecError::ZeroDimension { width, height });
        }
        let samples = samples.into();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(channels.channels()))
            .ok_or(CodecError::RasterTooLarge {
                pixels: u64::from(width) * u64::from(height),
            })?;
        if samples.len() != expected {
            return Err(CodecError::SampleCount {
                expected,
                found: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> ChannelMode {
        self.channels
    }

    /// All samples, row-major, channels interleaved.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Bytes per scanline.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels.channels()
    }

    /// Samples of scanline `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride();
        self.samples.get(start..start + self.stride())
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Consume the raster and return its sample buffer.
    pub fn into_samples(self) -> Bytes {
        self.samples
    }
}

/// A lossless image container that can persist a [`Raster`].
///
/// Implementations must round-trip samples bit-exactly: no quantization,
/// color management or premultiplication.
pub trait RasterFormat {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize `raster` into `dst`.
    fn write_raster<W: Write>(
        &self,
        raster: &Raster,
        dst: W,
    ) -> std::result::Result<(), Self::Error>;

    /// Parse a raster from `src`, reporting its dimensions and channel mode.
    fn read_raster<R: Read>(&self, src: R) -> std::result::Result<Raster, Self::Error>;
}
