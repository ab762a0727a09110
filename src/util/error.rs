// nettrawl - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all nettrawl operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum NettrawlError {
    /// Archive download failed.
    Fetch(FetchError),

    /// Archive expansion failed.
    Archive(ArchiveError),

    /// File discovery failed.
    Discovery(DiscoveryError),

    /// Report writing failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for NettrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Download error: {e}"),
            Self::Archive(e) => write!(f, "Archive error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for NettrawlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Archive(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

/// Errors related to downloading the archive. All fatal to the run.
#[derive(Debug)]
pub enum FetchError {
    /// HTTP client construction failed.
    Client { source: reqwest::Error },

    /// The request could not be sent or timed out.
    Request { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Reading the response body failed mid-stream.
    Body { url: String, source: io::Error },

    /// Writing the downloaded bytes to disk failed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { source } => {
                write!(f, "Failed to build HTTP client: {source}")
            }
            Self::Request { url, source } => {
                if source.is_timeout() {
                    write!(f, "Download of '{url}' timed out")
                } else {
                    write!(f, "Request to '{url}' failed: {source}")
                }
            }
            Self::HttpStatus { url, status } => {
                write!(f, "Server returned HTTP {status} for '{url}'")
            }
            Self::Body { url, source } => {
                write!(f, "Failed reading response body from '{url}': {source}")
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "Failed writing download to '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client { source } | Self::Request { source, .. } => Some(source),
            Self::Body { source, .. } | Self::Io { source, .. } => Some(source),
            Self::HttpStatus { .. } => None,
        }
    }
}

impl From<FetchError> for NettrawlError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

// ---------------------------------------------------------------------------
// Archive errors
// ---------------------------------------------------------------------------

/// Errors related to ZIP expansion. All fatal to the run.
#[derive(Debug)]
pub enum ArchiveError {
    /// The archive file could not be opened.
    Open { path: PathBuf, source: io::Error },

    /// The file is not a valid ZIP archive.
    Malformed {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    /// An entry name escapes the extraction directory (zip-slip).
    UnsafeEntryPath { name: String },

    /// Writing an extracted entry to disk failed.
    EntryIo { name: String, source: io::Error },

    /// Creating the extraction directory tree failed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "Cannot open archive '{}': {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "Invalid ZIP archive '{}': {source}", path.display())
            }
            Self::UnsafeEntryPath { name } => {
                write!(
                    f,
                    "Archive entry '{name}' escapes the extraction directory"
                )
            }
            Self::EntryIo { name, source } => {
                write!(f, "Failed extracting entry '{name}': {source}")
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "Cannot create extraction directory '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::EntryIo { source, .. } | Self::Io { source, .. } => {
                Some(source)
            }
            Self::Malformed { source, .. } => Some(source),
            Self::UnsafeEntryPath { .. } => None,
        }
    }
}

impl From<ArchiveError> for NettrawlError {
    fn from(e: ArchiveError) -> Self {
        Self::Archive(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to file discovery. Per-entry access failures are
/// non-fatal warnings; these variants cover invalid roots only.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The scan root does not exist.
    RootNotFound { path: PathBuf },

    /// The scan root is not a directory.
    NotADirectory { path: PathBuf },

    /// Permission denied accessing the scan root.
    PermissionDenied { path: PathBuf, source: io::Error },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Scan path '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Scan path '{}' is not a directory", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for NettrawlError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Scan errors (file-level, non-fatal to the batch)
// ---------------------------------------------------------------------------

/// Per-file read failures during the scan. These never propagate out of the
/// batch; the pipeline converts them to operator warnings and moves on to
/// the next file.
#[derive(Debug)]
pub enum ScanError {
    /// The file vanished between discovery and read.
    FileNotFound { path: PathBuf },

    /// The file is not valid UTF-8 and strict decoding was requested.
    InvalidEncoding { path: PathBuf },

    /// Any other read failure (permissions, hardware, ...).
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "File not found: '{}'", path.display())
            }
            Self::InvalidEncoding { path } => {
                write!(f, "'{}' is not valid UTF-8", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to report writing. Fatal to the run.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the report file.
    Io { path: PathBuf, source: io::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Report I/O error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON report error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV report error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for NettrawlError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for nettrawl results.
pub type Result<T> = std::result::Result<T, NettrawlError>;
