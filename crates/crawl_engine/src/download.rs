use std::path::{Path, PathBuf};

use crawl_logging::crawl_info;

use crate::client::JobApi;
use crate::persist::AtomicFileWriter;
use crate::{ApiError, FailureKind};

/// Fetches `filename` from the download endpoint and stores it under `dir`.
pub async fn save_download(
    api: &dyn JobApi,
    filename: &str,
    dir: &Path,
) -> Result<PathBuf, ApiError> {
    let body = api.download(filename).await?;
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let target = writer
        .write(filename, &body)
        .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
    crawl_info!("Saved {} ({} bytes) to {:?}", filename, body.len(), target);
    Ok(target)
}
