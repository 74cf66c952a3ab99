//! CLI report formatting.
//!
//! Each piece of output has a pure `format_*` function returning lines (for
//! testability) and a `print_*` wrapper that writes them. Success paths go
//! to stdout so they can be piped into the next tool; failure detail goes to
//! stderr. The `--json` mode serializes a [`FileReport`] instead.

use crate::converter::Conversion;
use serde::Serialize;
use std::path::Path;

/// One output's entry in the JSON report.
#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub key: String,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Whole-file report for `--json`.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub source: String,
    pub outputs: Vec<ReportEntry>,
}

pub fn build_report(source: &Path, results: &Conversion) -> FileReport {
    FileReport {
        source: source.display().to_string(),
        outputs: results
            .iter()
            .map(|(key, outcome)| ReportEntry {
                key: key.clone(),
                done: outcome.is_done(),
                path: outcome.path().map(|p| p.display().to_string()),
                error: outcome.error().map(|e| e.to_string()),
            })
            .collect(),
    }
}

/// Success lines for stdout: one derived path per completed output.
pub fn format_done_paths(results: &Conversion) -> Vec<String> {
    results
        .values()
        .filter_map(|outcome| outcome.path())
        .map(|path| path.display().to_string())
        .collect()
}

/// Failure lines for stderr: `ERROR: (key) detail`.
pub fn format_failures(results: &Conversion) -> Vec<String> {
    results
        .iter()
        .filter_map(|(key, outcome)| {
            outcome
                .error()
                .map(|error| format!("ERROR: ({key}) {error}"))
        })
        .collect()
}

/// Print one conversion's results: paths to stdout, failures to stderr.
pub fn print_conversion(results: &Conversion) {
    for line in format_done_paths(results) {
        println!("{line}");
    }
    for line in format_failures(results) {
        eprintln!("{line}");
    }
}
