//! Reversible mapping between byte payloads and pixel rasters.
//!
//! This is the core of bytemap. Every payload is framed with:
//! - A 3-byte magic tag naming the pipeline ("BMR" raw, "BMZ" zlib)
//! - An 8-byte big-endian payload length
//!
//! and then zero-padded to fill a rectangle and packed into 8-bit samples,
//! either one byte per sample or one nibble per sample (scaled by 17).
//! The length field makes decoding exact no matter how the payload ends.
//!
//! Image container I/O is out of scope here; see [`RasterFormat`].

pub mod codec;
pub mod compress;
pub mod config;
pub mod error;
pub mod header;
pub mod layout;
pub mod pack;
pub mod raster;

pub use codec::{
    decode, decode_detect, encode, identify, read_header, Detected, Encoded, HeaderInfo,
    ImageCodec,
};
pub use compress::{Compressor, Zlib};
pub use config::{CodecConfig, Profile};
pub use error::{CodecError, ErrorKind, Result};
pub use header::{Magic, HEADER_SIZE};
pub use layout::{Layout, LayoutPolicy, DEFAULT_MAX_WIDTH};
pub use pack::{SymbolBits, NIBBLE_SCALE};
pub use raster::{ChannelMode, Raster, RasterFormat};
