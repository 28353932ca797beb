// Public endpoint scanning for apirecon
// Loads each source in turn, classifies it, and collects per-source reports

use crate::config::ScanConfig;
use crate::error::{ReconError, Result};
use crate::loader::{self, DocumentFetcher};
use crate::reporting::{format_report, SourceReport};
use crate::security::classify;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DOCUMENT_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Read a URL list: one per line, blank lines and `#` comments skipped.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| ReconError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Expand directories into the JSON/YAML documents beneath them.
pub fn expand_spec_paths(paths: &[PathBuf]) -> Vec<String> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.display().to_string());
            continue;
        }
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let is_document = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);
            if entry.file_type().is_file() && is_document {
                files.push(entry.path().display().to_string());
            }
        }
    }
    files
}

/// Every source of a scan, URLs normalised, in processing order.
pub fn collect_sources(config: &ScanConfig) -> Result<Vec<String>> {
    let mut urls = config.urls.clone();
    if let Some(list) = &config.url_list {
        urls.extend(read_url_list(list)?);
    }
    let mut sources: Vec<String> = urls.iter().map(|u| loader::normalize_url(u)).collect();
    sources.extend(expand_spec_paths(&config.specs));
    Ok(sources)
}

/// Load and classify one source; load failures are logged and yield no endpoints.
///
/// With `silent` set, failures only show up at debug level.
pub async fn scan_source(fetcher: &DocumentFetcher, source: &str, silent: bool) -> SourceReport {
    let endpoints = match fetcher.load(source).await {
        Ok(doc) => classify(&doc),
        Err(e) if silent => {
            debug!("failed to download or parse {}: {}", source, e);
            Vec::new()
        }
        Err(e) => {
            warn!("failed to download or parse {}: {}", source, e);
            Vec::new()
        }
    };
    debug!("{}: {} public endpoint(s)", source, endpoints.len());
    SourceReport {
        source: source.to_string(),
        endpoints,
    }
}

pub async fn run_scan(config: &ScanConfig, sources: &[String]) -> Result<Vec<SourceReport>> {
    let fetcher = DocumentFetcher::new()?;
    let mut reports = Vec::with_capacity(sources.len());
    for (i, source) in sources.iter().enumerate() {
        if !config.silent {
            info!("processing {}", source);
        }
        let remote = loader::is_remote(source);
        reports.push(scan_source(&fetcher, source, config.silent).await);
        if remote && i + 1 < sources.len() {
            tokio::time::sleep(config.delay).await;
        }
    }
    Ok(reports)
}

/// The combined report text; silent mode drops sources without findings.
pub fn render_reports(reports: &[SourceReport], silent: bool, separator: &str) -> String {
    reports
        .iter()
        .filter(|r| r.has_public() || !silent)
        .map(|r| format_report(r, silent, separator))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the reports or write them to `config.output`.
pub fn emit_results(config: &ScanConfig, reports: &[SourceReport]) -> Result<()> {
    let rendered = render_reports(reports, config.silent, config.separator());
    let with_results: Vec<&str> = reports
        .iter()
        .filter(|r| r.has_public())
        .map(|r| r.source.as_str())
        .collect();

    match &config.output {
        Some(path) => {
            let contents = if config.silent {
                with_results.join("\n")
            } else {
                rendered
            };
            std::fs::write(path, contents).map_err(|source| ReconError::Write {
                path: path.display().to_string(),
                source,
            })?;
            if !config.silent {
                println!("\nResults written to {}", path.display());
                if !with_results.is_empty() {
                    println!("Found public endpoints in {} source(s)", with_results.len());
                }
            }
        }
        None => {
            if !rendered.trim().is_empty() {
                println!("{}", rendered);
            } else if !config.silent {
                println!("No results to display");
            }
        }
    }
    Ok(())
}
