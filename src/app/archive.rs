// nettrawl - app/archive.rs
//
// ZIP archive expansion.
//
// Entry names are sanitised through `enclosed_name`, so an entry whose
// path escapes the extraction directory (zip-slip, absolute paths, `..`
// components) aborts the expansion as an error. Oversized entries are
// skipped with a warning rather than filling the disk.

use crate::util::constants;
use crate::util::error::ArchiveError;
use std::fs;
use std::fs::File;
use std::path::Path;

/// Result of expanding an archive.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStats {
    /// Files written to disk.
    pub files_extracted: usize,

    /// Entries skipped because their uncompressed size exceeded
    /// `MAX_ARCHIVE_ENTRY_BYTES`.
    pub entries_skipped: usize,
}

/// Extract every entry of the ZIP at `zip_path` under `dest_dir`.
///
/// The destination directory is created if missing. Directory entries are
/// recreated; file entries are streamed to disk. Returns expansion
/// statistics on success.
pub fn extract_archive(zip_path: &Path, dest_dir: &Path) -> Result<ExpansionStats, ArchiveError> {
    tracing::info!(archive = %zip_path.display(), dest = %dest_dir.display(), "Expansion starting");

    let file = File::open(zip_path).map_err(|source| ArchiveError::Open {
        path: zip_path.to_path_buf(),
        source,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|source| ArchiveError::Malformed {
        path: zip_path.to_path_buf(),
        source,
    })?;

    fs::create_dir_all(dest_dir).map_err(|source| ArchiveError::Io {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let mut stats = ExpansionStats::default();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|source| ArchiveError::Malformed {
                path: zip_path.to_path_buf(),
                source,
            })?;

        // `enclosed_name` returns None for names that would escape the
        // destination (`../`, absolute paths, drive prefixes).
        let relative = match entry.enclosed_name() {
            Some(p) => p,
            None => {
                return Err(ArchiveError::UnsafeEntryPath {
                    name: entry.name().to_string(),
                });
            }
        };
        let out_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|source| ArchiveError::Io {
                path: out_path.clone(),
                source,
            })?;
            continue;
        }

        if entry.size() > constants::MAX_ARCHIVE_ENTRY_BYTES {
            tracing::warn!(
                entry = entry.name(),
                size = entry.size(),
                limit = constants::MAX_ARCHIVE_ENTRY_BYTES,
                "Entry exceeds size limit, skipping"
            );
            stats.entries_skipped += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ArchiveError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let name = entry.name().to_string();
        let mut out = File::create(&out_path).map_err(|source| ArchiveError::EntryIo {
            name: name.clone(),
            source,
        })?;
        std::io::copy(&mut entry, &mut out)
            .map_err(|source| ArchiveError::EntryIo { name, source })?;

        stats.files_extracted += 1;
    }

    tracing::info!(
        files = stats.files_extracted,
        skipped = stats.entries_skipped,
        "Expansion complete"
    );
    Ok(stats)
}

// =============================================================================
// Tests
// =============================================================================
