// nettrawl - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

// =============================================================================
// Network Record (output of fragment extraction)
// =============================================================================

/// The structured findings extracted from a single source file.
///
/// Produced once per input file that yields at least one non-empty field;
/// immutable after construction. Serialises to the report format:
/// `{ "file": ..., "urls": [...], "status_codes": [...], "yfl_network": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    /// Base name of the source file the fragments were found in.
    pub file: String,

    /// Deduplicated URLs found anywhere in the file. Sorted-set
    /// representation makes the serialised order deterministic; the order
    /// itself carries no meaning.
    pub urls: BTreeSet<String>,

    /// Deduplicated recognised HTTP status codes, kept as the literal
    /// digit strings that matched.
    pub status_codes: BTreeSet<String>,

    /// JSON payloads recovered from marker-tagged lines, in order of
    /// first appearance. Not deduplicated.
    pub yfl_network: Vec<serde_json::Value>,
}

impl NetworkRecord {
    /// True when no field holds any finding. Empty records are never
    /// emitted by the extractor; this guard is what enforces that.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.status_codes.is_empty() && self.yfl_network.is_empty()
    }
}

// =============================================================================
// Discovered File (output of discovery phase)
// =============================================================================

/// Metadata about a file found during directory scanning, before any
/// content is read.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last modification timestamp.
    pub modified: Option<DateTime<Utc>>,

    /// Whether this file exceeds the large file threshold and should be
    /// read through a memory map.
    pub is_large: bool,
}

// =============================================================================
// Scan Summary
// =============================================================================

/// Summary statistics for a completed scan, reported to the operator.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Total text files discovered.
    pub files_discovered: usize,

    /// Files that produced a record.
    pub files_with_records: usize,

    /// Files that could not be read.
    pub files_with_errors: usize,

    /// Distinct URLs across all records.
    pub total_urls: usize,

    /// Distinct status codes across all records.
    pub total_status_codes: usize,

    /// JSON payloads across all records.
    pub total_payloads: usize,

    /// Wall-clock scan duration.
    pub duration: std::time::Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> NetworkRecord {
        NetworkRecord {
            file: "session.txt".to_string(),
            urls: BTreeSet::from([
                "https://api.example.com/v1/ping".to_string(),
                "http://cdn.example.com/asset.js".to_string(),
            ]),
            status_codes: BTreeSet::from(["200".to_string(), "404".to_string()]),
            yfl_network: vec![json!({"event": "request", "durée": 12}), json!([1, 2, 3])],
        }
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = sample_record();
        let serialized = serde_json::to_string_pretty(&record).unwrap();
        let parsed: NetworkRecord = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, record);
        // Payload sequence order must survive the round trip.
        assert_eq!(parsed.yfl_network[0]["event"], "request");
        assert!(parsed.yfl_network[1].is_array());
    }

    #[test]
    fn record_serialises_with_report_field_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("file"));
        assert!(obj.contains_key("urls"));
        assert!(obj.contains_key("status_codes"));
        assert!(obj.contains_key("yfl_network"));
        assert_eq!(obj.len(), 4);
    }

    #[test]
    fn is_empty_requires_all_fields_empty() {
        let mut record = NetworkRecord {
            file: "empty.txt".to_string(),
            urls: BTreeSet::new(),
            status_codes: BTreeSet::new(),
            yfl_network: Vec::new(),
        };
        assert!(record.is_empty());

        record.status_codes.insert("500".to_string());
        assert!(!record.is_empty());
    }
}
