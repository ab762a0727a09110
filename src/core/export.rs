// nettrawl - core/export.rs
//
// JSON and CSV report serialisation.
// Core layer: writes to any Write trait object; the file-level helper is
// the only place a path is opened.

use crate::core::model::NetworkRecord;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Write the record sequence as a pretty-printed JSON array.
///
/// Record order is preserved; serde_json leaves non-ASCII characters
/// unescaped, so the report stays human-readable for non-English log
/// content. Returns the number of records written.
pub fn write_json<W: Write>(
    records: &[NetworkRecord],
    writer: W,
    report_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: report_path.to_path_buf(),
        source: e,
    })?;
    Ok(records.len())
}

/// Write the records as flattened CSV rows.
///
/// One row per record: file, semicolon-joined urls, semicolon-joined
/// status codes, payload count. Payload bodies do not flatten usefully
/// into cells; consumers that need them use the JSON report.
pub fn write_csv<W: Write>(
    records: &[NetworkRecord],
    writer: W,
    report_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["file", "urls", "status_codes", "payload_count"])
        .map_err(|e| ExportError::Csv {
            path: report_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for record in records {
        let urls = record.urls.iter().cloned().collect::<Vec<_>>().join(";");
        let codes = record
            .status_codes
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(";");

        csv_writer
            .write_record([
                record.file.as_str(),
                urls.as_str(),
                codes.as_str(),
                &record.yfl_network.len().to_string(),
            ])
            .map_err(|e| ExportError::Csv {
                path: report_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: report_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Create `report_path` and write the JSON report into it.
pub fn write_json_report(
    records: &[NetworkRecord],
    report_path: &Path,
) -> Result<usize, ExportError> {
    let file = std::fs::File::create(report_path).map_err(|e| ExportError::Io {
        path: report_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    let count = write_json(records, &mut writer, report_path)?;
    writer.flush().map_err(|e| ExportError::Io {
        path: report_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(report = %report_path.display(), records = count, "Report written");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn make_record(file: &str) -> NetworkRecord {
        NetworkRecord {
            file: file.to_string(),
            urls: BTreeSet::from(["https://example.com/santé".to_string()]),
            status_codes: BTreeSet::from(["200".to_string()]),
            yfl_network: vec![json!({"msg": "журнал"})],
        }
    }

    #[test]
    fn json_report_round_trips() {
        let records = vec![make_record("a.txt"), make_record("b.txt")];
        let mut buf = Vec::new();
        let count = write_json(&records, &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 2);

        let parsed: Vec<NetworkRecord> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, records);
        // Record order is file-discovery order and must be preserved.
        assert_eq!(parsed[0].file, "a.txt");
        assert_eq!(parsed[1].file, "b.txt");
    }

    #[test]
    fn json_report_preserves_non_ascii_unescaped() {
        let records = vec![make_record("utf8.txt")];
        let mut buf = Vec::new();
        write_json(&records, &mut buf, &PathBuf::from("out.json")).unwrap();

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("santé"), "URL non-ASCII must stay literal");
        assert!(output.contains("журнал"), "payload non-ASCII must stay literal");
        assert!(!output.contains("\\u"), "no unicode escaping expected");
    }

    #[test]
    fn empty_record_list_serialises_to_empty_array() {
        let mut buf = Vec::new();
        let count = write_json(&[], &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }

    #[test]
    fn csv_report_flattens_records() {
        let mut record = make_record("flat.txt");
        record.urls.insert("https://example.com/two".to_string());

        let mut buf = Vec::new();
        let count = write_csv(&[record], &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("file,urls,status_codes,payload_count"));
        assert!(output.contains("flat.txt"));
        assert!(
            output.contains("https://example.com/santé;https://example.com/two"),
            "urls should be semicolon-joined in set order, got: {output}"
        );
        assert!(output.contains(",1\n"), "payload count column expected");
    }
}
