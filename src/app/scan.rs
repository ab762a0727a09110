// nettrawl - app/scan.rs
//
// The scan pipeline: discovery, per-file content reads, fragment
// extraction, aggregation.
//
// Sequential and single-threaded by design -- each file is independent and
// the batch is small enough that parallelism buys nothing worth the
// complexity.
//
//   - Transient I/O errors are retried with capped backoff.
//   - All per-file errors are non-fatal; the scan continues to the next file.
//   - Records are aggregated in file-discovery order.

use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::extract;
use crate::core::model::{NetworkRecord, ScanSummary};
use crate::util::constants;
use crate::util::error::{DiscoveryError, ScanError};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

// =============================================================================
// Constants
// =============================================================================

/// Retry limits for transient I/O errors.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

// =============================================================================
// Types
// =============================================================================

/// How file bytes are decoded into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Reject files that are not valid UTF-8.
    Strict,

    /// Replace invalid byte sequences with U+FFFD. Log bundles routinely
    /// mix encodings, so this is what the pipeline uses.
    Lossy,
}

/// Everything a completed scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Records in file-discovery order.
    pub records: Vec<NetworkRecord>,

    /// Non-fatal warnings for the operator (capped at MAX_WARNINGS).
    pub warnings: Vec<String>,

    /// Aggregate statistics.
    pub summary: ScanSummary,
}

// =============================================================================
// Pipeline
// =============================================================================

/// Scan every discovered text file under `root` for network fragments.
///
/// Per-file read failures are converted to warnings and never abort the
/// batch. Returns `Err` only when discovery itself cannot run (invalid
/// root).
pub fn scan_directory(
    root: &Path,
    config: &DiscoveryConfig,
    mode: DecodeMode,
) -> Result<ScanOutcome, DiscoveryError> {
    let started = Instant::now();

    let (files, mut warnings) = discovery::discover_files(root, config)?;
    let files_discovered = files.len();

    tracing::info!(files = files_discovered, "Scan starting");

    let mut records: Vec<NetworkRecord> = Vec::new();
    let mut files_with_errors = 0usize;

    for file in &files {
        // Discovery already rejected non-UTF-8 filenames.
        let file_name = file
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let content = match read_file_content(&file.path, file.is_large, mode) {
            Ok(content) => content,
            Err(e) => {
                files_with_errors += 1;
                tracing::warn!(file = %file.path.display(), error = %e, "File skipped");
                push_warning(&mut warnings, e.to_string());
                continue;
            }
        };

        if let Some(record) = extract::extract_fragments(file_name, &content) {
            records.push(record);
        }
    }

    let summary = ScanSummary {
        files_discovered,
        files_with_records: records.len(),
        files_with_errors,
        total_urls: records.iter().map(|r| r.urls.len()).sum(),
        total_status_codes: records.iter().map(|r| r.status_codes.len()).sum(),
        total_payloads: records.iter().map(|r| r.yfl_network.len()).sum(),
        duration: started.elapsed(),
    };

    tracing::info!(
        files = summary.files_discovered,
        records = summary.files_with_records,
        errors = summary.files_with_errors,
        "Scan complete"
    );

    Ok(ScanOutcome {
        records,
        warnings,
        summary,
    })
}

/// Append a warning unless the cap is reached; note the suppression once.
fn push_warning(warnings: &mut Vec<String>, message: String) {
    if warnings.len() < constants::MAX_WARNINGS {
        warnings.push(message);
    } else if warnings.len() == constants::MAX_WARNINGS {
        warnings.push(format!(
            "More than {} warnings; further warnings suppressed",
            constants::MAX_WARNINGS
        ));
    }
}

// =============================================================================
// File reading
// =============================================================================

/// Read and decode the full content of a file.
///
/// For large files, uses `memmap2` which avoids copying the entire file
/// into heap memory before decoding. Small files use a plain read with
/// transient-error retries.
pub fn read_file_content(
    path: &Path,
    is_large: bool,
    mode: DecodeMode,
) -> Result<String, ScanError> {
    let result = if is_large {
        read_large_file(path, mode)
    } else {
        read_small_file_with_retry(path, mode)
    };

    result.map_err(|e| classify_read_error(path, e))
}

/// Map an io::Error onto the scan error taxonomy.
fn classify_read_error(path: &Path, e: io::Error) -> ScanError {
    match e.kind() {
        io::ErrorKind::NotFound => ScanError::FileNotFound {
            path: path.to_path_buf(),
        },
        io::ErrorKind::InvalidData => ScanError::InvalidEncoding {
            path: path.to_path_buf(),
        },
        _ => ScanError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    }
}

/// Read using `memmap2` for large files (avoids allocating the full buffer).
fn read_large_file(path: &Path, mode: DecodeMode) -> io::Result<String> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the file is read-only and we do not mutate the map. External
    // modification during the map's lifetime is a documented risk we accept
    // for already-written log files extracted from an archive.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    decode_bytes(&mmap, mode)
}

/// Read a small file with transient-error retries.
fn read_small_file_with_retry(path: &Path, mode: DecodeMode) -> io::Result<String> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return decode_bytes(&bytes, mode),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e), // Permanent error; do not retry.
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Decode raw bytes according to the requested mode.
fn decode_bytes(bytes: &[u8], mode: DecodeMode) -> io::Result<String> {
    match mode {
        DecodeMode::Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DecodeMode::Strict => std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
    }
}

// =============================================================================
// Tests
// =============================================================================
