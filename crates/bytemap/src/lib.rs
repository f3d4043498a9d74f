//! Store any file as a lossless PNG image and get it back byte-for-byte.
//!
//! bytemap frames a payload with a tag and exact length, optionally
//! compresses it, and packs the bytes into the samples of an RGB or RGBA
//! raster. This is not image compression: the PNG is usually larger than
//! the input.
//!
//! # Crate Structure
//!
//! - [`codec`]: Header framing, layout, pixel packing and the compression stage
//! - [`png`]: PNG container and file I/O (behind `png` feature)

/// Re-export codec types.
pub mod codec {
    pub use bytemap_codec::*;
}

/// Re-export PNG container types (requires `png` feature).
#[cfg(feature = "png")]
pub mod png {
    pub use bytemap_png::*;
}
