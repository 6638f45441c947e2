/// Reading media files picked on the command line
use crate::error::{CliError, Result};
use std::path::Path;
use studio_core::MediaFile;
use tracing::debug;

/// Read a file into memory for upload.
///
/// The content type comes from the extension.
pub async fn load_media(path: &Path) -> Result<MediaFile> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Media {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"),
        })?;

    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::Media {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = ?path, len = bytes.len(), "Loaded media file");
    Ok(MediaFile::new(file_name, bytes))
}
