use bytemap_codec::{identify, read_header, Profile, SymbolBits, HEADER_SIZE};
use bytemap_png::load_png;

use crate::cmd::InspectArgs;
use crate::exit::{raster_error, CliResult, SUCCESS};
use crate::output::{print_report, InspectReport, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let raster =
        load_png(&args.input).map_err(|err| raster_error("failed reading image", err))?;

    let candidates = Profile::candidates();

    // An unrecognised header is reported, not treated as an error.
    let detected = identify(&raster, &candidates).ok().and_then(|config| {
        let header = read_header(&raster, config).ok()?;
        let profile = Profile::matching(&raster, config, header.stored_len)?;
        Some((profile, config, header))
    });

    let symbol_bits = match detected {
        Some((_, config, _)) => config.symbol_bits,
        None => SymbolBits::Eight,
    };
    let capacity = (raster.samples().len() / symbol_bits.symbols_per_byte())
        .saturating_sub(HEADER_SIZE);

    let report = InspectReport {
        schema_id: InspectReport::SCHEMA_ID,
        input: args.input.display().to_string(),
        width: raster.width(),
        height: raster.height(),
        channels: raster.channels().to_string(),
        profile: detected.map(|(profile, _, _)| profile.name()),
        magic: detected.map(|(_, _, header)| header.magic.to_string()),
        stored_size: detected.map(|(_, _, header)| header.stored_len),
        capacity,
    };
    print_report(&report, format);
    Ok(SUCCESS)
}
