use bytes::BytesMut;

use crate::compress::{Compressor, Zlib};
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::header::{self, Magic, HEADER_SIZE};
use crate::pack;
use crate::raster::Raster;

/// Converts payloads to rasters and back under one [`CodecConfig`].
///
/// Every call is independent; the codec holds no state beyond its
/// configuration and compressor.
#[derive(Debug, Clone)]
pub struct ImageCodec<C = Zlib> {
    config: CodecConfig,
    compressor: C,
}

impl ImageCodec<Zlib> {
    /// Create a codec using zlib for compressed configurations.
    pub fn new(config: CodecConfig) -> Result<Self> {
        Self::with_compressor(config, Zlib)
    }
}

impl<C: Compressor> ImageCodec<C> {
    /// Create a codec with a custom compression stage.
    pub fn with_compressor(config: CodecConfig, compressor: C) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, compressor })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a payload into a raster.
    pub fn encode(&self, payload: &[u8]) -> Result<Raster> {
        Ok(self.encode_detailed(payload)?.raster)
    }

    /// Encode a payload, also reporting the length recorded in the header.
    pub fn encode_detailed(&self, payload: &[u8]) -> Result<Encoded> {
        let config = &self.config;
        let compressed;
        let body = if config.compress {
            compressed = self.compressor.compress(payload)?;
            compressed.as_slice()
        } else {
            payload
        };

        let mut framed = BytesMut::new();
        header::wrap(config.magic, body, &mut framed);
        let layout = config.layout_for(body.len())?;

        // Byte capacity of the rectangle; a dangling nibble is left to `pack` to zero-fill.
        let capacity_bits = layout.pixel_count()
            * config.channels.channels() as u64
            * u64::from(config.symbol_bits.bits());
        let capacity = usize::try_from(capacity_bits / 8).map_err(|_| {
            CodecError::RasterTooLarge {
                pixels: layout.pixel_count(),
            }
        })?;
        framed.resize(capacity, 0);

        let samples = pack::pack(&framed, config.symbol_bits, config.channels);
        tracing::debug!(
            payload = payload.len(),
            stored = body.len(),
            magic = %config.magic,
            width = layout.width,
            height = layout.height,
            "encoded payload"
        );
        Ok(Encoded {
            raster: Raster::new(layout.width, layout.height, config.channels, samples)?,
            stored_len: body.len(),
        })
    }

    /// Decode a raster produced by [`ImageCodec::encode`] with the same config.
    pub fn decode(&self, raster: &Raster) -> Result<Vec<u8>> {
        let config = &self.config;
        if raster.channels() != config.channels {
            return Err(CodecError::ChannelMismatch {
                expected: config.channels,
                found: raster.channels(),
            });
        }

        let framed = pack::unpack(raster.samples(), config.symbol_bits, config.channels)?;
        let body = header::unwrap(&framed, config.magic)?;
        let payload = if config.compress {
            self.compressor.decompress(body)?
        } else {
            body.to_vec()
        };

        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            magic = %config.magic,
            stored = body.len(),
            payload = payload.len(),
            "decoded payload"
        );
        Ok(payload)
    }
}

/// Encode `payload` with the stock zlib compressor.
pub fn encode(payload: &[u8], config: &CodecConfig) -> Result<Raster> {
    ImageCodec::new(*config)?.encode(payload)
}

/// Decode `raster` with the stock zlib compressor.
pub fn decode(raster: &Raster, config: &CodecConfig) -> Result<Vec<u8>> {
    ImageCodec::new(*config)?.decode(raster)
}

/// Result of [`ImageCodec::encode_detailed`].
#[derive(Debug, Clone)]
pub struct Encoded {
    pub raster: Raster,
    /// Payload length after the compression stage, as written to the header.
    pub stored_len: usize,
}

/// Result of [`decode_detect`].
#[derive(Debug, Clone)]
pub struct Detected {
    pub payload: Vec<u8>,
    /// The candidate whose tag matched.
    pub config: CodecConfig,
}

/// Read the tag actually present in `raster`, returning the first candidate
/// that matches it.
///
/// Only candidates with the raster's channel mode are considered, and only the
/// leading samples are unpacked to read the tag.
pub fn identify<'a>(
    raster: &Raster,
    candidates: &'a [CodecConfig],
) -> Result<&'a CodecConfig> {
    let mut first_err = None;
    for config in candidates
        .iter()
        .filter(|config| config.channels == raster.channels())
    {
        let err = match raster_magic(raster, config) {
            Ok(magic) if magic == config.magic => return Ok(config),
            Ok(found) => CodecError::UnknownMagic {
                found,
                channels: raster.channels(),
            },
            Err(err) => err,
        };
        if first_err.is_none() {
            first_err = Some(err);
        }
    }

    Err(first_err.unwrap_or(CodecError::NoCandidate {
        channels: raster.channels(),
    }))
}

/// Identify the pipeline from the raster's tag, then decode with it.
pub fn decode_detect(raster: &Raster, candidates: &[CodecConfig]) -> Result<Detected> {
    let config = *identify(raster, candidates)?;
    tracing::debug!(
        magic = %config.magic,
        symbol_bits = ?config.symbol_bits,
        "identified raster pipeline"
    );
    let payload = decode(raster, &config)?;
    Ok(Detected { payload, config })
}

/// Header fields read from a raster without decoding its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    pub magic: Magic,
    /// Stored (possibly compressed) payload length declared by the header.
    pub stored_len: u64,
}

/// Read the header of `raster` as laid out by `config`.
pub fn read_header(raster: &Raster, config: &CodecConfig) -> Result<HeaderInfo> {
    let head = leading_bytes(raster, config, HEADER_SIZE)?;
    let magic = header::peek_magic(&head).ok_or(CodecError::Truncated {
        declared: HEADER_SIZE as u64,
        available: head.len(),
    })?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&head[header::MAGIC_LEN..HEADER_SIZE]);
    Ok(HeaderInfo {
        magic,
        stored_len: u64::from_be_bytes(raw),
    })
}

fn raster_magic(raster: &Raster, config: &CodecConfig) -> Result<Magic> {
    let head = leading_bytes(raster, config, header::MAGIC_LEN)?;
    header::peek_magic(&head).ok_or(CodecError::Truncated {
        declared: header::MAGIC_LEN as u64,
        available: head.len(),
    })
}

/// Unpack just enough whole pixels to recover `len` bytes.
fn leading_bytes(raster: &Raster, config: &CodecConfig, len: usize) -> Result<Vec<u8>> {
    let per_pixel = config.channels.channels();
    let wanted = (len * config.symbol_bits.symbols_per_byte()).next_multiple_of(per_pixel);
    let samples = raster.samples();
    let head = pack::unpack(
        &samples[..wanted.min(samples.len())],
        config.symbol_bits,
        config.channels,
    )?;
    if head.len() < len {
        return Err(CodecError::Truncated {
            declared: len as u64,
            available: head.len(),
        });
    }
    Ok(head)
}
