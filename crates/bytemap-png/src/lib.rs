//! Lossless PNG container and file I/O for bytemap rasters.
//!
//! This is the outermost layer of bytemap: it persists [`Raster`]s produced
//! by `bytemap-codec` and reads them back bit-exactly. The codec never
//! depends on this crate; any other [`RasterFormat`] works as well.
//!
//! [`Raster`]: bytemap_codec::Raster
//! [`RasterFormat`]: bytemap_codec::RasterFormat

pub mod container;
pub mod error;
pub mod fs;

pub use container::{Png, DEFAULT_MAX_DECODED_BYTES};
pub use error::{RasterIoError, Result};
pub use fs::{load_png, read_payload, save_png, write_payload};
