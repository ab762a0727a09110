// nettrawl - tests/e2e_pipeline.rs
//
// End-to-end tests for the expansion -> discovery -> extraction -> report
// pipeline.
//
// These tests exercise the real filesystem, real ZIP expansion, real
// walkdir traversal, and real regex extraction -- no mocks, no stubs.
// Only the network download is out of scope (the fixture archive is built
// locally with the same zip crate the expander reads with).

use nettrawl::app::archive::extract_archive;
use nettrawl::app::scan::{scan_directory, DecodeMode};
use nettrawl::core::discovery::DiscoveryConfig;
use nettrawl::core::export::write_json_report;
use nettrawl::core::model::NetworkRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

// =============================================================================
// Helpers
// =============================================================================

/// Build a zip at `path` from (entry name, content) pairs.
fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(content).expect("write entry");
    }
    writer.finish().expect("finish zip");
}

// =============================================================================
// Full pipeline E2E
// =============================================================================

/// The canonical scenario: one text file with 2 duplicate URLs, one
/// recognised status code appearing twice, and one valid JSON block must
/// produce exactly one record with one entry in each field.
#[test]
fn e2e_duplicates_collapse_to_single_entries() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("logs.zip");

    let log = "\
2024-03-02 10:11:12 GET https://api.example.com/v1/sync started\n\
2024-03-02 10:11:13 retry https://api.example.com/v1/sync\n\
2024-03-02 10:11:14 response 200 cached\n\
2024-03-02 10:11:15 response 200 fresh\n\
2024-03-02 10:11:16 [YFLNetwork] exchange {\"method\":\"GET\",\"ok\":true}\n";
    write_zip(&zip_path, &[("session.txt", log.as_bytes())]);

    let extract_dir = dir.path().join("logs_extracted");
    extract_archive(&zip_path, &extract_dir).unwrap();

    let outcome =
        scan_directory(&extract_dir, &DiscoveryConfig::default(), DecodeMode::Lossy).unwrap();

    assert_eq!(outcome.records.len(), 1, "exactly one record expected");
    let record = &outcome.records[0];
    assert_eq!(record.file, "session.txt");
    assert_eq!(record.urls.len(), 1, "duplicate URLs must collapse");
    assert_eq!(record.status_codes.len(), 1, "duplicate codes must collapse");
    assert_eq!(record.yfl_network.len(), 1);
    assert!(outcome.warnings.is_empty(), "got {:?}", outcome.warnings);
}

/// Files that yield nothing produce no record; files in nested directories
/// and non-txt entries are handled per discovery rules.
#[test]
fn e2e_mixed_archive_content() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("bundle.zip");

    write_zip(
        &zip_path,
        &[
            ("readme.txt", b"installation notes, nothing network related\n"),
            (
                "device/net.txt",
                b"probe http://device.local/status -> 403\n" as &[u8],
            ),
            ("trace.log", b"https://ignored.example.com (wrong extension)\n"),
        ],
    );

    let extract_dir = dir.path().join("bundle_extracted");
    extract_archive(&zip_path, &extract_dir).unwrap();

    let outcome =
        scan_directory(&extract_dir, &DiscoveryConfig::default(), DecodeMode::Lossy).unwrap();

    assert_eq!(outcome.summary.files_discovered, 2, "two .txt files");
    assert_eq!(outcome.records.len(), 1, "only net.txt has fragments");
    assert_eq!(outcome.records[0].file, "net.txt");
    assert!(outcome.records[0].urls.contains("http://device.local/status"));
    assert_eq!(
        outcome.records[0].status_codes,
        std::collections::BTreeSet::from(["403".to_string()])
    );
}

/// A file with invalid UTF-8 bytes is decoded lossily and still scanned;
/// the batch never fails on encoding.
#[test]
fn e2e_invalid_utf8_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("enc.zip");

    let mut garbled = Vec::new();
    garbled.extend_from_slice(b"\xff\xfe binary prefix\n");
    garbled.extend_from_slice(b"[YFLNetwork] {\"device\":\"cam-3\"} 301 tail\n");
    write_zip(&zip_path, &[("garbled.txt", &garbled)]);

    let extract_dir = dir.path().join("enc_extracted");
    extract_archive(&zip_path, &extract_dir).unwrap();

    let outcome =
        scan_directory(&extract_dir, &DiscoveryConfig::default(), DecodeMode::Lossy).unwrap();

    assert_eq!(outcome.summary.files_with_errors, 0);
    assert_eq!(outcome.records.len(), 1);
    let record = &outcome.records[0];
    assert_eq!(record.yfl_network.len(), 1);
    assert!(record.status_codes.contains("301"));
}

/// A file removed between discovery and read is skipped with a warning and
/// must not prevent the remaining files from being processed.
#[test]
fn e2e_vanished_file_does_not_abort_batch() {
    use nettrawl::core::discovery::discover_files;
    use nettrawl::core::extract::extract_fragments;
    use nettrawl::app::scan::read_file_content;
    use nettrawl::util::error::ScanError;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("keep.txt"), "alive https://example.com/kept\n").unwrap();
    std::fs::write(dir.path().join("gone.txt"), "will vanish\n").unwrap();

    let (files, _) = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
    assert_eq!(files.len(), 2);

    // Simulate the race: one file disappears after discovery.
    std::fs::remove_file(dir.path().join("gone.txt")).unwrap();

    let mut records = Vec::new();
    let mut vanished = 0;
    for file in &files {
        match read_file_content(&file.path, file.is_large, DecodeMode::Lossy) {
            Ok(content) => {
                let name = file.path.file_name().unwrap().to_str().unwrap();
                if let Some(record) = extract_fragments(name, &content) {
                    records.push(record);
                }
            }
            Err(ScanError::FileNotFound { .. }) => vanished += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(vanished, 1, "the removed file classifies as not-found");
    assert_eq!(records.len(), 1, "the surviving file is still processed");
    assert_eq!(records[0].file, "keep.txt");
}

// =============================================================================
// Report E2E
// =============================================================================

/// Scan results written to disk parse back into structurally equal records.
#[test]
fn e2e_report_round_trips_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("report.zip");

    write_zip(
        &zip_path,
        &[
            (
                "alpha.txt",
                b"https://one.example.com 200\n[YFLNetwork] {\"seq\":1}\n" as &[u8],
            ),
            ("beta.txt", b"https://two.example.com 404\n"),
        ],
    );

    let extract_dir = dir.path().join("report_extracted");
    extract_archive(&zip_path, &extract_dir).unwrap();

    let outcome =
        scan_directory(&extract_dir, &DiscoveryConfig::default(), DecodeMode::Lossy).unwrap();
    assert_eq!(outcome.records.len(), 2);

    let report_path = dir.path().join("network_analysis.json");
    let written = write_json_report(&outcome.records, &report_path).unwrap();
    assert_eq!(written, 2);

    let raw = std::fs::read_to_string(&report_path).unwrap();
    let parsed: Vec<NetworkRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, outcome.records);

    // The report is human-readable (pretty-printed array).
    assert!(raw.trim_start().starts_with('['));
    assert!(raw.contains('\n'), "report should be indented across lines");
}

/// Shallow brace matching end-to-end: a nested JSON object on a marker
/// line never survives to the report.
#[test]
fn e2e_nested_marker_json_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("nested.zip");

    let log = b"[YFLNetwork] {\"outer\":{\"inner\":1}}\n[YFLNetwork] {\"flat\":2}\n";
    write_zip(&zip_path, &[("nested.txt", log as &[u8])]);

    let extract_dir = dir.path().join("nested_extracted");
    extract_archive(&zip_path, &extract_dir).unwrap();

    let outcome =
        scan_directory(&extract_dir, &DiscoveryConfig::default(), DecodeMode::Lossy).unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(
        outcome.records[0].yfl_network,
        vec![serde_json::json!({"flat": 2})],
        "only the flat object parses; the nested candidate is truncated and dropped"
    );
}
