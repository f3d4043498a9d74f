use std::io::{Read, Write};

use bytemap_codec::{ChannelMode, Raster, RasterFormat};
use tracing::debug;

use crate::error::{RasterIoError, Result};

/// Default ceiling on decoded image memory: 1 GiB.
pub const DEFAULT_MAX_DECODED_BYTES: usize = 1 << 30;

/// PNG container: 8-bit RGB/RGBA, non-interlaced.
///
/// Reading applies no transformations, so samples come back exactly as stored.
#[derive(Debug, Clone, Copy)]
pub struct Png {
    compression: png::Compression,
    max_decoded_bytes: usize,
}

impl Default for Png {
    fn default() -> Self {
        Self {
            compression: png::Compression::Best,
            max_decoded_bytes: DEFAULT_MAX_DECODED_BYTES,
        }
    }
}

impl Png {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zlib effort used for IDAT data. Does not affect samples.
    pub fn with_compression(mut self, compression: png::Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Refuse to decode images whose pixel data would exceed `bytes`.
    pub fn with_max_decoded_bytes(mut self, bytes: usize) -> Self {
        self.max_decoded_bytes = bytes;
        self
    }
}

impl RasterFormat for Png {
    type Error = RasterIoError;

    fn write_raster<W: Write>(&self, raster: &Raster, dst: W) -> Result<()> {
        let mut encoder = png::Encoder::new(dst, raster.width(), raster.height());
        encoder.set_color(color_type(raster.channels()));
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(self.compression);

        let mut writer = encoder.write_header().map_err(encoding_error)?;
        writer
            .write_image_data(raster.samples())
            .map_err(encoding_error)?;
        writer.finish().map_err(encoding_error)?;

        debug!(
            width = raster.width(),
            height = raster.height(),
            channels = %raster.channels(),
            "wrote png"
        );
        Ok(())
    }

    fn read_raster<R: Read>(&self, src: R) -> Result<Raster> {
        let mut decoder = png::Decoder::new_with_limits(
            src,
            png::Limits {
                bytes: self.max_decoded_bytes,
            },
        );
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().map_err(decoding_error)?;

        let channels = match reader.output_color_type() {
            (png::ColorType::Rgb, png::BitDepth::Eight) => ChannelMode::Rgb,
            (png::ColorType::Rgba, png::BitDepth::Eight) => ChannelMode::Rgba,
            (color_type, bit_depth) => {
                return Err(RasterIoError::UnsupportedMode {
                    color_type,
                    bit_depth,
                })
            }
        };

        let size = reader.output_buffer_size();
        if size > self.max_decoded_bytes {
            return Err(RasterIoError::TooLarge {
                bytes: size,
                max: self.max_decoded_bytes,
            });
        }
        let mut buf = vec![0u8; size];
        let frame = reader.next_frame(&mut buf).map_err(decoding_error)?;
        buf.truncate(frame.buffer_size());

        debug!(
            width = frame.width,
            height = frame.height,
            %channels,
            "read png"
        );
        Ok(Raster::new(frame.width, frame.height, channels, buf)?)
    }
}

fn color_type(channels: ChannelMode) -> png::ColorType {
    match channels {
        ChannelMode::Rgb => png::ColorType::Rgb,
        ChannelMode::Rgba => png::ColorType::Rgba,
    }
}

fn encoding_error(err: png::EncodingError) -> RasterIoError {
    match err {
        png::EncodingError::IoError(io) => RasterIoError::Io(io),
        other => RasterIoError::Format(other.to_string()),
    }
}

fn decoding_error(err: png::DecodingError) -> RasterIoError {
    match err {
        png::DecodingError::IoError(io) => RasterIoError::Io(io),
        other => RasterIoError::Format(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytemap_codec::{decode, encode, CodecConfig, Profile};

    use super::*;

    fn to_png(raster: &Raster) -> Vec<u8> {
        let mut out = Vec::new();
        Png::new().write_raster(raster, &mut out).unwrap();
        out
    }

    #[test]
    fn writes_png_signature() {
        let raster = Raster::new(1, 1, ChannelMode::Rgba, vec![68, 17, 68, 34]).unwrap();
        let bytes = to_png(&raster);
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn rgba_samples_survive() {
        let samples: Vec<u8> = (0..=255).cycle().take(5 * 3 * 4).collect();
        let raster = Raster::new(5, 3, ChannelMode::Rgba, samples).unwrap();

        let read = Png::new().read_raster(Cursor::new(to_png(&raster))).unwrap();
        assert_eq!(read, raster);
    }

    #[test]
    fn rgb_samples_survive() {
        let samples: Vec<u8> = (0..7 * 2 * 3).map(|i| (i * 37 % 256) as u8).collect();
        let raster = Raster::new(7, 2, ChannelMode::Rgb, samples).unwrap();

        let read = Png::new().read_raster(Cursor::new(to_png(&raster))).unwrap();
        assert_eq!(read.channels(), ChannelMode::Rgb);
        assert_eq!((read.width(), read.height()), (7, 2));
        assert_eq!(read.samples(), raster.samples());
    }

    #[test]
    fn codec_roundtrip_through_png() {
        let payload = b"through the container\0\0".to_vec();
        for profile in Profile::ALL {
            let config = profile.config();
            let raster = encode(&payload, &config).unwrap();
            let read = Png::new().read_raster(Cursor::new(to_png(&raster))).unwrap();
            assert_eq!(decode(&read, &config).unwrap(), payload, "{profile:?}");
        }
    }

    #[test]
    fn fast_compression_keeps_samples() {
        let raster = encode(b"fast", &CodecConfig::rgb()).unwrap();
        let mut out = Vec::new();
        Png::new()
            .with_compression(png::Compression::Fast)
            .write_raster(&raster, &mut out)
            .unwrap();
        let read = Png::new().read_raster(Cursor::new(out)).unwrap();
        assert_eq!(read, raster);
    }

    #[test]
    fn rejects_bad_signature() {
        let err = Png::new()
            .read_raster(Cursor::new(b"GIF89a not a png at all".to_vec()))
            .unwrap_err();
        assert!(err.is_format(), "{err}");
    }

    #[test]
    fn rejects_grayscale() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 2, 2);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 1, 2, 3]).unwrap();
        }

        let err = Png::new().read_raster(Cursor::new(out)).unwrap_err();
        assert!(matches!(
            err,
            RasterIoError::UnsupportedMode {
                color_type: png::ColorType::Grayscale,
                ..
            }
        ));
    }

    #[test]
    fn rejects_sixteen_bit() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Sixteen);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0; 6]).unwrap();
        }

        let err = Png::new().read_raster(Cursor::new(out)).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn decode_limit_is_enforced() {
        let raster = encode(&[1u8; 4096], &CodecConfig::rgb()).unwrap();
        let err = Png::new()
            .with_max_decoded_bytes(64)
            .read_raster(Cursor::new(to_png(&raster)))
            .unwrap_err();
        assert!(err.is_format(), "{err}");
    }
}
