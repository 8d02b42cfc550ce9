//! Streaming granule downloads.
//!
//! Bytes go to `.{filename}.partial` in the output directory, which is
//! flushed, synced and renamed into place only once the body is complete.
//! Readers never see a half-written granule under its final name.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

/// Why a single URL could not be downloaded.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no data from {url} for {}s", .idle.as_secs())]
    Stalled { url: String, idle: Duration },

    #[error("I/O error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Temporary name used while `filename` is downloading.
pub fn partial_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(format!(".{}.partial", filename))
}

/// Download `url` to `output_dir/filename`.
///
/// Any existing file is replaced. The response headers and every body
/// chunk must arrive within `idle_timeout`. On failure the partial file is
/// removed and the final path is left untouched.
#[instrument(skip(client, output_dir), fields(output_dir = %output_dir.display()))]
pub async fn download_granule(
    client: &Client,
    url: &str,
    output_dir: &Path,
    filename: &str,
    idle_timeout: Duration,
) -> Result<PathBuf, DownloadError> {
    let final_path = output_dir.join(filename);
    let temp_path = partial_path(output_dir, filename);

    let result = match stream_to_file(client, url, &temp_path, idle_timeout).await {
        Ok(bytes) => fs::rename(&temp_path, &final_path)
            .await
            .map(|()| bytes)
            .map_err(|source| DownloadError::Io {
                path: final_path.clone(),
                source,
            }),
        Err(e) => Err(e),
    };

    match result {
        Ok(bytes) => {
            info!(path = %final_path.display(), bytes, "Wrote granule");
            Ok(final_path)
        }
        Err(e) => {
            if fs::remove_file(&temp_path).await.is_ok() {
                debug!(path = %temp_path.display(), "Removed partial download");
            }
            Err(e)
        }
    }
}

async fn stream_to_file(
    client: &Client,
    url: &str,
    path: &Path,
    idle_timeout: Duration,
) -> Result<u64, DownloadError> {
    let request_error = |source| DownloadError::Request {
        url: url.to_string(),
        source,
    };
    let io_error = |source| DownloadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let stalled = || DownloadError::Stalled {
        url: url.to_string(),
        idle: idle_timeout,
    };

    let response = timeout(idle_timeout, client.get(url).send())
        .await
        .map_err(|_| stalled())?
        .map_err(request_error)?;
    match response.status() {
        status if status.is_success() => {}
        StatusCode::NOT_FOUND => {
            return Err(DownloadError::NotFound {
                url: url.to_string(),
            })
        }
        status => {
            return Err(DownloadError::Http {
                url: url.to_string(),
                status,
            })
        }
    }

    let mut file = File::create(path).await.map_err(io_error)?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = timeout(idle_timeout, stream.next())
        .await
        .map_err(|_| stalled())?
    {
        let chunk = chunk.map_err(request_error)?;
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_error)?;
    file.sync_all().await.map_err(io_error)?;

    Ok(written)
}
