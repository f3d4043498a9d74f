use std::path::PathBuf;

use bytemap_codec::CodecError;

/// Errors that can occur while reading or writing rasters and payload files.
#[derive(Debug, thiserror::Error)]
pub enum RasterIoError {
    /// The file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Failed to read the file at the specified path.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the file at the specified path.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("raster I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data is not a well-formed PNG.
    #[error("invalid PNG: {0}")]
    Format(String),

    /// The PNG is valid but not 8-bit RGB or RGBA.
    #[error("unsupported PNG mode ({color_type:?}, {bit_depth:?}); expected 8-bit RGB or RGBA")]
    UnsupportedMode {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    /// The image would need more memory than the configured limit.
    #[error("image needs {bytes} bytes, limit is {max}")]
    TooLarge { bytes: usize, max: usize },

    /// The decoded samples do not form a valid raster.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl RasterIoError {
    /// True when the error means the input does not have the expected format.
    pub fn is_format(&self) -> bool {
        match self {
            RasterIoError::Format(_)
            | RasterIoError::UnsupportedMode { .. }
            | RasterIoError::TooLarge { .. } => true,
            RasterIoError::Codec(err) => err.kind() == bytemap_codec::ErrorKind::Format,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RasterIoError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RasterIoError>;
