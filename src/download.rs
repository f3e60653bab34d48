//! The fetch → decode → expand pipeline.

use std::path::{Path, PathBuf};

use crate::crx;
use crate::error::DownloadError;
use crate::fetch::PackageSource;
use crate::zip;

/// Summary of one completed download.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Vendor-assigned extension identifier the package was fetched for.
    pub extension_id: String,
    /// Directory the files were written to: `<destination>/<extension_id>`.
    pub output_dir: PathBuf,
    /// Number of regular files extracted (directories not counted).
    pub files_extracted: usize,
    /// Size of the downloaded container, envelope included.
    pub container_bytes: u64,
}

/// Download one extension and unpack it under `destination/<extension_id>/`.
///
/// The three stages run sequentially and each failure is terminal for the
/// request: the tagged [`DownloadError`] tells the caller which stage broke
/// and why. The raw container only lives for the duration of the call; the
/// extracted tree is the sole durable output.
pub async fn download_extension(
    source: &dyn PackageSource,
    extension_id: &str,
    destination: &Path,
) -> Result<ExtractionResult, DownloadError> {
    let container = source.fetch(extension_id).await?;
    let payload = crx::zip_payload(&container)?;

    let output_dir = destination.join(extension_id);
    let files_extracted = zip::unpack(payload, &output_dir).await?;

    Ok(ExtractionResult {
        extension_id: extension_id.to_string(),
        output_dir,
        files_extracted,
        container_bytes: container.len() as u64,
    })
}
