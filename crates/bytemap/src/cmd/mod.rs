use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use bytemap_codec::Profile;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a file (or inline `[text]`) into a PNG.
    Encode(EncodeArgs),
    /// Recover the original bytes from a PNG.
    Decode(DecodeArgs),
    /// Show raster dimensions and header fields without decoding.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Codec presets selectable on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// 4-bit nibbles in RGBA pixels, square image, no compression.
    Nibble,
    /// One byte per RGB channel, width capped, no compression.
    Rgb,
    /// zlib, then one byte per RGB channel, width capped.
    Compressed,
    /// zlib, then one byte per RGB channel, square image.
    CompressedSquare,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Nibble => Profile::Nibble,
            ProfileArg::Rgb => Profile::Rgb,
            ProfileArg::Compressed => Profile::Compressed,
            ProfileArg::CompressedSquare => Profile::CompressedSquare,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// File to encode. `[some text]` encodes the text between the brackets instead.
    pub input: String,
    /// Destination PNG path.
    pub output: PathBuf,
    /// Codec preset.
    #[arg(long, short = 'p', value_enum, default_value = "compressed", env = "BYTEMAP_PROFILE")]
    pub profile: ProfileArg,
    /// Maximum image width in pixels (width-capped profiles only).
    #[arg(
        long,
        value_name = "PIXELS",
        env = "BYTEMAP_MAX_WIDTH",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_width: Option<u32>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// PNG produced by `bytemap encode`.
    pub input: PathBuf,
    /// Destination file. Omit to print the payload to stdout.
    pub output: Option<PathBuf>,
    /// Require a specific preset instead of detecting it from the header tag.
    #[arg(long, short = 'p', value_enum)]
    pub profile: Option<ProfileArg>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// PNG to inspect.
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
