// nettrawl - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. The download -> expand -> scan -> report pipeline
//
// Collaborator failures (download, expansion, report writing) are fatal
// and unretried; per-file scan failures are warnings handled inside the
// pipeline.

use clap::Parser;
use nettrawl::app::{archive, fetch, scan};
use nettrawl::core::discovery::DiscoveryConfig;
use nettrawl::core::export;
use nettrawl::util::constants;
use nettrawl::util::error::{NettrawlError, Result};
use nettrawl::util::logging;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// nettrawl - network-log fragment extraction.
///
/// Downloads a ZIP of log files, extracts it, trawls the text files inside
/// for URLs, HTTP status codes and [YFLNetwork]-tagged JSON payloads, and
/// writes the aggregated findings to a JSON report.
#[derive(Parser, Debug)]
#[command(name = "nettrawl", version, about)]
struct Cli {
    /// Archive URL to download (prompts interactively if omitted).
    url: Option<String>,

    /// Report output path.
    #[arg(short = 'o', long = "output", default_value = constants::DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Remove the downloaded archive and extraction directory on success.
    #[arg(long = "clean")]
    clean: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    logging::init(cli.debug);

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "nettrawl starting"
    );

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url().map_err(|source| NettrawlError::Io {
            path: PathBuf::from("<stdin>"),
            operation: "URL prompt",
            source,
        })?,
    };

    if url.is_empty() {
        eprintln!("Error: no URL given");
        std::process::exit(1);
    }

    let archive_path = PathBuf::from(constants::DOWNLOAD_FILE_NAME);
    let extract_dir = extraction_dir_for(&archive_path);

    // -------------------------------------------------------------------------
    // Phase 1: Download
    // -------------------------------------------------------------------------
    println!("Downloading {url}");
    let bytes = fetch::download_archive(&url, &archive_path, |downloaded, total| {
        if let Some(percent) = fetch::progress_percent(downloaded, total) {
            eprint!("\rDownload progress: {percent}%");
            let _ = std::io::stderr().flush();
        }
    })?;
    eprintln!();
    println!("Downloaded {bytes} bytes to '{}'", archive_path.display());

    // -------------------------------------------------------------------------
    // Phase 2: Expansion
    // -------------------------------------------------------------------------
    let stats = archive::extract_archive(&archive_path, &extract_dir)?;
    println!(
        "Extracted {} files to '{}'",
        stats.files_extracted,
        extract_dir.display()
    );
    if stats.entries_skipped > 0 {
        println!("Skipped {} oversized archive entries", stats.entries_skipped);
    }

    // -------------------------------------------------------------------------
    // Phase 3: Scan
    // -------------------------------------------------------------------------
    let outcome = scan::scan_directory(
        &extract_dir,
        &DiscoveryConfig::default(),
        scan::DecodeMode::Lossy,
    )?;

    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    if outcome.summary.files_discovered == 0 {
        println!("No text files found in the archive");
    }

    // -------------------------------------------------------------------------
    // Phase 4: Report
    // -------------------------------------------------------------------------
    if outcome.records.is_empty() {
        println!("No network fragments found; no report written");
    } else {
        let count = export::write_json_report(&outcome.records, &cli.output)?;
        println!(
            "Extracted network data for {count} files, saved to '{}'",
            cli.output.display()
        );
        println!(
            "  {} URLs, {} status codes, {} JSON payloads ({} files had read errors, {:.2?} elapsed)",
            outcome.summary.total_urls,
            outcome.summary.total_status_codes,
            outcome.summary.total_payloads,
            outcome.summary.files_with_errors,
            outcome.summary.duration
        );
    }

    if cli.clean {
        clean_artifacts(&archive_path, &extract_dir);
    }

    Ok(())
}

/// Read the archive URL from stdin.
fn prompt_for_url() -> std::io::Result<String> {
    print!("Archive URL to download: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Extraction directory derived from the archive name
/// ("downloaded_log.zip" -> "downloaded_log_extracted").
fn extraction_dir_for(archive_path: &Path) -> PathBuf {
    let stem = archive_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("archive");
    archive_path.with_file_name(format!("{stem}{}", constants::EXTRACT_DIR_SUFFIX))
}

/// Best-effort removal of the working artifacts after a successful run.
fn clean_artifacts(archive_path: &Path, extract_dir: &Path) {
    if let Err(e) = std::fs::remove_file(archive_path) {
        tracing::warn!(path = %archive_path.display(), error = %e, "Could not remove archive");
    }
    if let Err(e) = std::fs::remove_dir_all(extract_dir) {
        tracing::warn!(path = %extract_dir.display(), error = %e, "Could not remove extraction directory");
    }
}
