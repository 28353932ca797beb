// Reporting and output for apirecon
// Text blocks for the terminal/output file and a CSV export of public endpoints

use crate::models::PublicEndpoint;
use chrono::Local;
use std::fs::File;
use std::io::Write;

pub const SEPARATOR: &str = "-----";
pub const LIST_SEPARATOR: &str = "#####";

/// Scan result for one source (URL or file)
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: String,
    pub endpoints: Vec<PublicEndpoint>,
}

impl SourceReport {
    pub fn has_public(&self) -> bool {
        !self.endpoints.is_empty()
    }
}

/// Render one source's result.
///
/// Verbose mode prints a separated block listing every public endpoint; silent
/// mode prints only the source name, and only when something was found.
pub fn format_report(report: &SourceReport, silent: bool, separator: &str) -> String {
    let mut lines = Vec::new();
    if silent {
        if report.has_public() {
            lines.push(report.source.clone());
        }
    } else {
        lines.push(format!("\n{}", separator));
        lines.push(format!("Public endpoints in {}:", report.source));
        if report.has_public() {
            for endpoint in &report.endpoints {
                lines.push(format!("  {} {}", endpoint.method, endpoint.path));
            }
        } else {
            lines.push("  No public endpoints found.".to_string());
        }
        lines.push(separator.to_string());
    }
    lines.join("\n")
}

/// Escape CSV field to prevent formula injection attacks
/// Cells starting with =, +, -, @, or tab are prefixed with single quote
fn escape_csv_field(field: &str) -> String {
    let needs_escaping = matches!(field.chars().next(), Some('=' | '+' | '-' | '@' | '\t'));

    if needs_escaping {
        format!("\"'{}\"", field.replace('"', "\"\""))
    } else if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_csv<W: Write>(out: &mut W, reports: &[SourceReport]) -> std::io::Result<()> {
    writeln!(out, "Source,Method,Path")?;
    for report in reports {
        for endpoint in &report.endpoints {
            writeln!(
                out,
                "{},{},{}",
                escape_csv_field(&report.source),
                escape_csv_field(endpoint.method.as_str()),
                escape_csv_field(&endpoint.path)
            )?;
        }
    }
    Ok(())
}

/// Write `apirecon_public_<timestamp>.csv` in the working directory.
pub fn export_csv(reports: &[SourceReport]) -> Result<String, std::io::Error> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("apirecon_public_{}.csv", timestamp);
    let mut file = File::create(&filename)?;
    write_csv(&mut file, reports)?;
    Ok(filename)
}
