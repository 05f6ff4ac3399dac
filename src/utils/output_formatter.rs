/// Output formatter for classification results
///
/// This module builds the fixed verdict messages and exports batch results as
/// JSON or CSV, plus a colored console summary.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::core::result::{ClassificationResult, ScanRecord};
use crate::utils::file_utils;

/// Message logged for an infected file
pub fn infected_message(flags: &[String], hide_details: bool) -> String {
    if hide_details {
        return "VIRUS Dangerous macro".to_string();
    }

    format!("VIRUS Contains macro(s) that {}", flags.join(", "))
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    path: &'a Path,
    sha256: Option<String>,
    result: &'a ClassificationResult,
}

/// Export scan records to a JSON file
///
/// Each entry carries the SHA-256 of the file when it could be read.
pub fn export_results_json(records: &[ScanRecord], output_path: &Path) -> Result<()> {
    let entries: Vec<JsonEntry<'_>> = records
        .iter()
        .map(|record| JsonEntry {
            path: &record.path,
            sha256: match record.result {
                ClassificationResult::Skipped(_) => None,
                _ => file_utils::sha256_hex(&record.path).ok(),
            },
            result: &record.result,
        })
        .collect();

    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, &entries).context("Failed to write JSON data")?;

    Ok(())
}

/// Create a CSV report with `path,status,detail` columns
pub fn create_csv_report(records: &[ScanRecord], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)
        .context(format!("Failed to create CSV file: {}", output_path.display()))?;

    writer.write_record(["path", "status", "detail"])?;
    for record in records {
        let path = record.path.to_string_lossy();
        let detail = record.result.detail();
        writer.write_record([&*path, record.result.status(), detail.as_str()])?;
    }

    writer.flush().context("Failed to write CSV data")?;
    Ok(())
}

/// Human-readable summary of a batch
pub fn format_summary(records: &[ScanRecord]) -> String {
    let count = |status: &str| {
        records
            .iter()
            .filter(|record| record.result.status() == status)
            .count()
    };

    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Scan Complete".bold()));
    output.push_str(&format!("{} {}\n", "Files checked:".green(), records.len()));
    output.push_str(&format!("{} {}\n", "Clean:".green(), count("clean")));
    output.push_str(&format!("{} {}\n", "Infected:".red(), count("infected")));
    output.push_str(&format!("{} {}\n", "Skipped:".yellow(), count("skipped")));
    output.push_str(&format!("{} {}\n", "Errors:".yellow(), count("error")));

    let infected: Vec<_> = records.iter().filter(|r| r.result.is_infected()).collect();
    if !infected.is_empty() {
        output.push_str(&format!("\n{}\n", "Infected files".red().bold()));
        for record in infected {
            output.push_str(&format!(
                "  - {} ({})\n",
                record.path.display(),
                record.result.detail()
            ));
        }
    }

    output
}
