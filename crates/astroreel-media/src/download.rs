//! Content image download.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Per-download timeout.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Download an image to `dest`.
///
/// A failed download is reported, not fatal: the renderer degrades to a
/// frame without a content image.
pub async fn fetch_image(
    http: &reqwest::Client,
    url: &str,
    dest: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let dest = dest.as_ref();

    let response = http
        .get(url)
        .timeout(DOWNLOAD_TIMEOUT)
        .send()
        .await
        .map_err(|e| MediaError::download_failed(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MediaError::download_failed(format!(
            "{url}: status {status}"
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| MediaError::download_failed(format!("{url}: {e}")))?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(dest, &bytes).await?;

    debug!("Downloaded image ({} bytes): {}", bytes.len(), dest.display());
    Ok(dest.to_path_buf())
}
