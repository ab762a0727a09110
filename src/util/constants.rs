// nettrawl - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "nettrawl";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction patterns
// =============================================================================

/// Literal marker token that introduces a network-log line of interest.
/// Text between this marker and the end of the line is scanned for
/// brace-delimited JSON payload candidates.
pub const NETWORK_MARKER: &str = "[YFLNetwork]";

/// The closed set of HTTP status codes recognised by the extractor.
///
/// This is a deliberate enumeration, not a general 3-digit matcher: codes
/// outside this list (e.g. 204, 418, 502) are silently ignored. Widening
/// the set is a scope decision, not a bug fix.
pub const RECOGNIZED_STATUS_CODES: &[&str] =
    &["200", "301", "302", "400", "401", "403", "404", "500"];

// =============================================================================
// Download
// =============================================================================

/// Whole-request timeout for the archive download, in seconds.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 15;

/// Chunk size in bytes for streaming the response body to disk.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// Local file name for the downloaded archive.
pub const DOWNLOAD_FILE_NAME: &str = "downloaded_log.zip";

/// Suffix appended to the archive stem to form the extraction directory
/// ("downloaded_log" -> "downloaded_log_extracted").
pub const EXTRACT_DIR_SUFFIX: &str = "_extracted";

// =============================================================================
// Archive expansion limits
// =============================================================================

/// Maximum uncompressed size for a single archive entry.
///
/// Entries exceeding this limit are skipped with a warning so a zip bomb
/// or stray oversized file cannot exhaust the disk.
pub const MAX_ARCHIVE_ENTRY_BYTES: u64 = 100 * 1024 * 1024; // 100 MB

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Maximum number of files to discover in a single scan.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Hard upper bound on max depth (prevents infinite traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// File size threshold in bytes above which content is read via mmap
/// instead of a plain buffered read.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100 MB

/// Default include glob patterns for text file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.txt"];

/// Default exclude glob patterns for text file discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "*.gz",
    "*.zip",
    "*.bak",
    "*.tmp",
    "node_modules",
    ".git",
    "__pycache__",
];

// =============================================================================
// Scan limits
// =============================================================================

/// Maximum number of non-fatal warnings accumulated across a single scan.
/// Prevents the warnings Vec from growing without bound when an archive
/// contains many unreadable files.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Output
// =============================================================================

/// Report file name written next to the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "network_analysis.json";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
