use std::num::NonZeroU32;
use std::path::Path;

use bytemap_codec::{CodecConfig, ImageCodec, LayoutPolicy, Profile};
use bytemap_png::{read_payload, save_png};

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, raster_error, CliResult, SUCCESS};
use crate::output::{print_report, EncodeReport, OutputFormat};

/// Where the payload comes from.
#[derive(Debug, PartialEq, Eq)]
enum Source<'a> {
    Inline(&'a str),
    File(&'a Path),
}

impl<'a> Source<'a> {
    /// `[text]` is inline text; anything else is a path.
    fn parse(input: &'a str) -> Self {
        match input
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(text) => Source::Inline(text),
            None => Source::File(Path::new(input)),
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Inline(text) => format!("<inline {} bytes>", text.len()),
            Source::File(path) => path.display().to_string(),
        }
    }
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let profile = Profile::from(args.profile);
    let config = resolve_config(profile, args.max_width);

    let source = Source::parse(&args.input);
    let payload = match source {
        Source::Inline(text) => text.as_bytes().to_vec(),
        Source::File(path) => {
            read_payload(path).map_err(|err| raster_error("failed reading input", err))?
        }
    };

    let codec = ImageCodec::new(config).map_err(|err| codec_error("encode failed", err))?;
    let encoded = codec
        .encode_detailed(&payload)
        .map_err(|err| codec_error("encode failed", err))?;
    let raster = encoded.raster;
    save_png(&args.output, &raster).map_err(|err| raster_error("failed writing image", err))?;

    tracing::info!(
        output = %args.output.display(),
        profile = profile.name(),
        width = raster.width(),
        height = raster.height(),
        "encoded"
    );

    let report = EncodeReport {
        schema_id: EncodeReport::SCHEMA_ID,
        input: source.describe(),
        output: args.output.display().to_string(),
        profile: profile.name(),
        magic: config.magic.to_string(),
        original_size: payload.len(),
        stored_size: encoded.stored_len,
        width: raster.width(),
        height: raster.height(),
        channels: raster.channels().to_string(),
    };
    print_report(&report, format);
    Ok(SUCCESS)
}

fn resolve_config(profile: Profile, max_width: Option<u32>) -> CodecConfig {
    let config = profile.config();
    let Some(max_width) = max_width.and_then(NonZeroU32::new) else {
        return config;
    };
    match config.layout {
        LayoutPolicy::Bounded { .. } => config.with_layout(LayoutPolicy::Bounded { max_width }),
        LayoutPolicy::Square => {
            tracing::warn!(profile = profile.name(), "--max-width ignored for square layouts");
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_input_is_inline_text() {
        assert_eq!(Source::parse("[hello world]"), Source::Inline("hello world"));
        assert_eq!(Source::parse("[]"), Source::Inline(""));
    }

    #[test]
    fn other_input_is_a_path() {
        assert_eq!(Source::parse("notes.txt"), Source::File(Path::new("notes.txt")));
        assert_eq!(Source::parse("[unclosed"), Source::File(Path::new("[unclosed")));
        assert_eq!(Source::parse("]["), Source::File(Path::new("][")));
    }

    #[test]
    fn max_width_overrides_bounded_layout() {
        let config = resolve_config(Profile::Rgb, Some(64));
        assert_eq!(
            config.layout,
            LayoutPolicy::Bounded {
                max_width: NonZeroU32::new(64).unwrap()
            }
        );
    }

    #[test]
    fn max_width_leaves_square_layout() {
        let config = resolve_config(Profile::Nibble, Some(64));
        assert_eq!(config.layout, LayoutPolicy::Square);
    }
}
