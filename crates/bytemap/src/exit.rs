use std::fmt;
use std::io;

use bytemap_codec::{CodecError, ErrorKind};
use bytemap_png::RasterIoError;

// Any failure is exit code 1; the message says which kind it was.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(FAILURE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::failure(format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    let class = match err.kind() {
        ErrorKind::Format => "format error",
        ErrorKind::CorruptData => "corrupt data",
        ErrorKind::Config => "invalid configuration",
    };
    CliError::failure(format!("{context}: {class}: {err}"))
}

pub fn raster_error(context: &str, err: RasterIoError) -> CliError {
    match err {
        RasterIoError::Codec(err) => codec_error(context, err),
        RasterIoError::Io(source) => io_error(context, source),
        other if other.is_format() => CliError::failure(format!("{context}: format error: {other}")),
        other => CliError::failure(format!("{context}: {other}")),
    }
}
