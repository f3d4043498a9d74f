use crate::error::{CodecError, Result};
use crate::header::{Magic, HEADER_SIZE};
use crate::layout::{Layout, LayoutPolicy, DEFAULT_MAX_WIDTH};
use crate::pack::{pixels_for, SymbolBits};
use crate::raster::{ChannelMode, Raster};

/// Controls how a payload is laid out in a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecConfig {
    /// Logical bits per stored sample.
    pub symbol_bits: SymbolBits,
    /// Samples per pixel.
    pub channels: ChannelMode,
    /// How pixels are arranged into rows.
    pub layout: LayoutPolicy,
    /// When true, the payload passes through the compressor before framing.
    pub compress: bool,
    /// Tag written at the start of the framed buffer.
    pub magic: Magic,
}

impl CodecConfig {
    /// 4-bit nibbles in RGBA pixels, square raster, no compression.
    pub const fn nibble() -> Self {
        Self {
            symbol_bits: SymbolBits::Four,
            channels: ChannelMode::Rgba,
            layout: LayoutPolicy::Square,
            compress: false,
            magic: Magic::RAW,
        }
    }

    /// Raw bytes in RGB pixels, width capped at 4096.
    pub const fn rgb() -> Self {
        Self {
            symbol_bits: SymbolBits::Eight,
            channels: ChannelMode::Rgb,
            layout: LayoutPolicy::Bounded {
                max_width: DEFAULT_MAX_WIDTH,
            },
            compress: false,
            magic: Magic::RAW,
        }
    }

    /// zlib-compressed bytes in RGB pixels, width capped at 4096.
    pub const fn compressed() -> Self {
        Self {
            compress: true,
            magic: Magic::COMPRESSED,
            ..Self::rgb()
        }
    }

    /// zlib-compressed bytes in RGB pixels, square raster.
    pub const fn compressed_square() -> Self {
        Self {
            layout: LayoutPolicy::Square,
            ..Self::compressed()
        }
    }

    /// Replace the layout policy.
    pub const fn with_layout(self, layout: LayoutPolicy) -> Self {
        Self { layout, ..self }
    }

    /// Rectangle used for a payload whose stored (post-compression) length is
    /// `stored_len`.
    pub fn layout_for(&self, stored_len: usize) -> Result<Layout> {
        let framed = stored_len
            .checked_add(HEADER_SIZE)
            .ok_or(CodecError::RasterTooLarge { pixels: u64::MAX })?;
        self.layout.layout(pixels_for(framed, self.symbol_bits, self.channels))
    }

    /// Reject configurations whose framed buffers could be misread.
    ///
    /// Raw and compressed pipelines must use distinct tags, since the tag is
    /// all a decoder has to choose between them.
    pub fn validate(&self) -> Result<()> {
        if self.compress && self.magic == Magic::RAW {
            return Err(CodecError::InvalidConfig(
                "compressed payloads cannot use the raw magic tag",
            ));
        }
        if !self.compress && self.magic == Magic::COMPRESSED {
            return Err(CodecError::InvalidConfig(
                "raw payloads cannot use the compressed magic tag",
            ));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::compressed()
    }
}

/// Named presets covering the supported pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Nibble,
    Rgb,
    Compressed,
    CompressedSquare,
}

impl Profile {
    pub const ALL: [Profile; 4] = [
        Profile::Nibble,
        Profile::Rgb,
        Profile::Compressed,
        Profile::CompressedSquare,
    ];

    pub const fn config(self) -> CodecConfig {
        match self {
            Profile::Nibble => CodecConfig::nibble(),
            Profile::Rgb => CodecConfig::rgb(),
            Profile::Compressed => CodecConfig::compressed(),
            Profile::CompressedSquare => CodecConfig::compressed_square(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Profile::Nibble => "nibble",
            Profile::Rgb => "rgb",
            Profile::Compressed => "compressed",
            Profile::CompressedSquare => "compressed-square",
        }
    }

    /// Stock configurations, in the order a decoder should try them.
    pub fn candidates() -> Vec<CodecConfig> {
        Self::ALL.iter().map(|profile| profile.config()).collect()
    }

    /// The stock profile that produced `raster`, given the pipeline decoding
    /// it and the stored length from its header.
    ///
    /// Profiles sharing a pipeline differ only in layout, so the one whose
    /// layout reproduces the raster's dimensions wins. When none does (a
    /// non-default width cap), the first profile with the pipeline is used.
    pub fn matching(raster: &Raster, config: &CodecConfig, stored_len: u64) -> Option<Profile> {
        let same_pipeline: Vec<Profile> = Self::ALL
            .into_iter()
            .filter(|profile| profile.config().with_layout(config.layout) == *config)
            .collect();

        let reproduces = |profile: &Profile| {
            usize::try_from(stored_len)
                .ok()
                .and_then(|len| profile.config().layout_for(len).ok())
                .is_some_and(|layout| {
                    (layout.width, layout.height) == (raster.width(), raster.height())
                })
        };

        same_pipeline
            .iter()
            .copied()
            .find(reproduces)
            .or_else(|| same_pipeline.first().copied())
    }
}
