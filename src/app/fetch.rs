// nettrawl - app/fetch.rs
//
// Blocking HTTP download of the log archive.
//
// The pipeline is deliberately synchronous and single-threaded, so the
// blocking reqwest client is used rather than the async one. The whole
// request runs under one wall-clock timeout; there is no retry -- a failed
// download is fatal to the run.

use crate::util::constants;
use crate::util::error::FetchError;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

/// Download `url` to `dest`, streaming the body in fixed-size chunks.
///
/// # Progress reporting
/// `on_progress` is called after each chunk with the bytes downloaded so
/// far and the total size when the server sent `Content-Length`. The
/// callback should be cheap (e.g. print a percentage); it is called on the
/// caller's thread.
///
/// Returns the total number of bytes written on success.
pub fn download_archive<F>(url: &str, dest: &Path, mut on_progress: F) -> Result<u64, FetchError>
where
    F: FnMut(u64, Option<u64>),
{
    tracing::info!(url, dest = %dest.display(), "Download starting");

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(constants::DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|source| FetchError::Client { source })?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let total_size = response.content_length();

    let file = File::create(dest).map_err(|source| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut downloaded: u64 = 0;
    let mut chunk = [0u8; constants::DOWNLOAD_CHUNK_SIZE];

    loop {
        let read = response.read(&mut chunk).map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        if read == 0 {
            break;
        }

        writer
            .write_all(&chunk[..read])
            .map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        downloaded += read as u64;
        on_progress(downloaded, total_size);
    }

    writer.flush().map_err(|source| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    tracing::info!(bytes = downloaded, "Download complete");
    Ok(downloaded)
}

/// Percentage of `downloaded` out of `total`, clamped to 0-100.
/// Returns `None` when the server did not send a length.
pub fn progress_percent(downloaded: u64, total: Option<u64>) -> Option<u64> {
    match total {
        Some(total) if total > 0 => Some((downloaded * 100 / total).min(100)),
        _ => None,
    }
}
