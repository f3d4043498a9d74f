use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use bytemap_codec::{Raster, RasterFormat};
use tracing::debug;

use crate::container::Png;
use crate::error::{RasterIoError, Result};

/// Read a whole payload file.
pub fn read_payload(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|err| read_error(path, err))?;
    debug!(?path, bytes = data.len(), "read payload");
    Ok(data)
}

/// Write a whole payload file, replacing any existing file.
///
/// On failure the destination is left in an undefined state.
pub fn write_payload(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, data).map_err(|source| RasterIoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, bytes = data.len(), "wrote payload");
    Ok(())
}

/// Load a PNG file as a raster.
pub fn load_png(path: impl AsRef<Path>) -> Result<Raster> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| read_error(path, err))?;
    Png::default().read_raster(BufReader::new(file))
}

/// Save a raster as a PNG file, replacing any existing file.
///
/// On failure the destination is left in an undefined state.
pub fn save_png(path: impl AsRef<Path>, raster: &Raster) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| RasterIoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut out = BufWriter::new(file);
    Png::default()
        .write_raster(raster, &mut out)
        .map_err(|err| match err {
            RasterIoError::Io(source) => write_error(source),
            other => other,
        })?;
    out.flush().map_err(write_error)?;
    Ok(())
}

fn read_error(path: &Path, err: io::Error) -> RasterIoError {
    if err.kind() == io::ErrorKind::NotFound {
        RasterIoError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        RasterIoError::Read {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
