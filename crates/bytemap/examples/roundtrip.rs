//! Encode a payload into a PNG in the temp directory and decode it back.
//!
//! Run with:
//!   cargo run --example roundtrip -- [payload text]

use bytemap::codec::{decode_detect, encode, CodecConfig, Profile};
use bytemap::png::{load_png, save_png};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let payload = if text.is_empty() {
        b"hello from bytemap\0".to_vec()
    } else {
        text.into_bytes()
    };

    let path = std::env::temp_dir().join(format!("bytemap-roundtrip-{}.png", std::process::id()));
    let raster = encode(&payload, &CodecConfig::compressed())?;
    save_png(&path, &raster)?;
    eprintln!(
        "Wrote {} ({}x{} {})",
        path.display(),
        raster.width(),
        raster.height(),
        raster.channels()
    );

    let detected = decode_detect(&load_png(&path)?, &Profile::candidates())?;
    assert_eq!(detected.payload, payload);
    eprintln!(
        "Recovered {} bytes (tag {})",
        detected.payload.len(),
        detected.config.magic
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
