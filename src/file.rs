//! Whole file compression.
//!
//! The input is read completely before it is transformed. The output is first written to a
//! temporary file next to its destination, which is renamed over the destination once all of it
//! has been written. A failed run leaves the destination as it was.
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Format, LzwError};

/// Sizes of a completed file operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Compress the file at `input` into `output`.
pub fn compress_file(input: &Path, output: &Path, format: Format) -> io::Result<FileStats> {
    let data = fs::read(input)?;
    let packed = crate::compress(&data, format);
    tracing::info!(
        input = %input.display(),
        bytes = data.len(),
        packed = packed.len(),
        "compressed"
    );

    persist(output, &packed)?;
    Ok(FileStats {
        bytes_read: data.len() as u64,
        bytes_written: packed.len() as u64,
    })
}

/// Decompress the file at `input` into `output`.
pub fn decompress_file(input: &Path, output: &Path, format: Format) -> io::Result<FileStats> {
    let packed = fs::read(input)?;
    let data = crate::decompress(&packed, format).map_err(invalid_data)?;
    tracing::info!(
        input = %input.display(),
        packed = packed.len(),
        bytes = data.len(),
        "decompressed"
    );

    persist(output, &data)?;
    Ok(FileStats {
        bytes_read: packed.len() as u64,
        bytes_written: data.len() as u64,
    })
}

/// Atomically replace `path` with `contents`.
fn persist(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    // Dropping the temporary on any error path removes it.
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn invalid_data(err: LzwError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}
