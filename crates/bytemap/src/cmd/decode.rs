use bytemap_codec::{decode, decode_detect, Detected, Profile};
use bytemap_png::{load_png, write_payload};

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, raster_error, CliResult, SUCCESS};
use crate::output::{print_raw, print_report, DecodeReport, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let raster =
        load_png(&args.input).map_err(|err| raster_error("failed reading image", err))?;

    // A named profile is decoded as-is; otherwise the header tag picks one.
    let detected = match args.profile {
        Some(profile) => {
            let config = Profile::from(profile).config();
            decode(&raster, &config).map(|payload| Detected { payload, config })
        }
        None => decode_detect(&raster, &Profile::candidates()),
    };
    let Detected { payload, config } =
        detected.map_err(|err| codec_error("decode failed", err))?;

    let Some(output) = &args.output else {
        tracing::info!(bytes = payload.len(), magic = %config.magic, "decoded to stdout");
        print_raw(&payload).map_err(|err| io_error("failed writing to stdout", err))?;
        return Ok(SUCCESS);
    };

    write_payload(output, &payload).map_err(|err| raster_error("failed writing output", err))?;
    tracing::info!(output = %output.display(), bytes = payload.len(), "decoded");

    let report = DecodeReport {
        schema_id: DecodeReport::SCHEMA_ID,
        input: args.input.display().to_string(),
        output: output.display().to_string(),
        magic: config.magic.to_string(),
        compressed: config.compress,
        size: payload.len(),
    };
    print_report(&report, format);
    Ok(SUCCESS)
}
