mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "bytemap",
    version,
    about = "Store arbitrary files as PNG images and recover them"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        env = "BYTEMAP_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "BYTEMAP_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("[ERROR] {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ProfileArg;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from([
            "bytemap",
            "encode",
            "notes.txt",
            "notes.png",
            "--profile",
            "compressed-square",
            "--max-width",
            "128",
        ])
        .expect("encode args should parse");

        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.input, "notes.txt");
        assert_eq!(args.profile, ProfileArg::CompressedSquare);
        assert_eq!(args.max_width, Some(128));
    }

    #[test]
    fn encode_defaults_to_compressed_profile() {
        let cli = Cli::try_parse_from(["bytemap", "encode", "[hi]", "hi.png"])
            .expect("encode args should parse");
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.profile, ProfileArg::Compressed);
        assert_eq!(args.max_width, None);
    }

    #[test]
    fn rejects_zero_max_width() {
        let err = Cli::try_parse_from([
            "bytemap",
            "encode",
            "in.bin",
            "out.png",
            "--max-width",
            "0",
        ])
        .expect_err("zero width should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_decode_without_output() {
        let cli = Cli::try_parse_from(["bytemap", "decode", "in.png"])
            .expect("decode args should parse");
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert!(args.output.is_none());
        assert!(args.profile.is_none());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "bytemap",
            "inspect",
            "in.png",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("inspect args should parse");
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(matches!(cli.command, Command::Inspect(_)));
    }
}
