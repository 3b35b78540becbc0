//! Local filesystem adapter
//!
//! Reads source videos for upload and writes downloaded videos and frames,
//! including the resettable result directory the download flows target.

use std::io;
use std::path::Path;

use reelbank_core::{Error, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Delete `path` recursively if it exists, then recreate it empty.
/// Calling this on a non-existent path is a no-op delete.
pub async fn reset_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::Io(e)),
    }
    fs::create_dir_all(path).await?;
    Ok(())
}

/// Write `bytes` to `path`, creating intermediate directories as needed.
/// An existing file is overwritten.
pub async fn write_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Read a local file for upload. A missing file is reported as `NotFound`
/// rather than a bare IO error, matching the facade's error taxonomy.
pub async fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    match fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(format!(
            "Local file does not exist: {}",
            path.display()
        ))),
        Err(e) => Err(Error::Io(e)),
    }
}

/// File name component of a path, for use as a default upload name.
pub fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .ok_or_else(|| {
            Error::InvalidInput(format!("Path has no usable file name: {}", path.display()))
        })
}
