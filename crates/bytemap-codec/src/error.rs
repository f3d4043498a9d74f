use crate::header::Magic;
use crate::raster::ChannelMode;

/// Coarse classification of [`CodecError`] for callers that only care about
/// what went wrong, not where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The raster or framed buffer does not have the expected shape or tag.
    Format,
    /// The compressed payload could not be inflated.
    CorruptData,
    /// The codec configuration itself is unusable.
    Config,
}

/// Errors that can occur while packing or unpacking a payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The framed buffer starts with a different tag than the codec expects.
    #[error("magic mismatch (expected {expected}, found {found})")]
    MagicMismatch { expected: Magic, found: Magic },

    /// None of the candidate configurations recognise the tag.
    #[error("unrecognised magic {found} for {channels} raster")]
    UnknownMagic { found: Magic, channels: ChannelMode },

    /// No candidate configuration uses the raster's channel layout.
    #[error("no candidate pipeline for {channels} raster")]
    NoCandidate { channels: ChannelMode },

    /// The header declares more bytes than the buffer holds.
    #[error("truncated frame (header declares {declared} bytes, {available} available)")]
    Truncated { declared: u64, available: usize },

    /// The raster's channel layout differs from the codec's.
    #[error("channel mode mismatch (expected {expected}, found {found})")]
    ChannelMismatch {
        expected: ChannelMode,
        found: ChannelMode,
    },

    /// The sample buffer cannot be split into whole pixels.
    #[error("sample count {len} is not a multiple of {channels} channels")]
    RaggedSamples { len: usize, channels: usize },

    /// The sample buffer does not match the raster dimensions.
    #[error("raster holds {found} samples, dimensions require {expected}")]
    SampleCount { expected: usize, found: usize },

    /// Width or height is zero.
    #[error("raster dimensions must be positive (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    /// The payload does not fit any raster this codec can describe.
    #[error("payload needs {pixels} pixels, which exceeds the raster limits")]
    RasterTooLarge { pixels: u64 },

    /// The codec configuration is unusable.
    #[error("invalid codec config: {0}")]
    InvalidConfig(&'static str),

    /// The compressed payload is not a valid stream.
    #[error("corrupt compressed payload: {0}")]
    CorruptData(#[source] std::io::Error),
}

impl CodecError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::CorruptData(_) => ErrorKind::CorruptData,
            CodecError::InvalidConfig(_) => ErrorKind::Config,
            _ => ErrorKind::Format,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
