use serde::Serialize;
use std::fs;
use std::path::Path;
use stringloc::ValidationReport;
use stringloc::runner::{run_locales, validate_file};

use crate::config::ResolvedRun;

#[derive(Debug, Serialize)]
struct FailedLocale {
    locale: String,
    error: String,
}

/// Body of `--report-json`.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    reports: Vec<&'a ValidationReport>,
    failed: Vec<FailedLocale>,
}

/// Run the validate command: check every selected locale file against the source.
///
/// Findings never fail the command; only locales that could not be validated
/// at all are returned as failed.
pub fn run_validate_command(
    run: &ResolvedRun,
    report_json: Option<&Path>,
) -> Result<Vec<String>, String> {
    let runs = run_locales(&run.locales, run.config.workers, |locale| {
        validate_file(&run.input, &run.output_root, locale, &run.config)
    })
    .map_err(|e| e.to_string())?;

    let mut reports = Vec::new();
    let mut failed = Vec::new();
    for locale_run in &runs {
        match &locale_run.result {
            Ok(report) => {
                for issue in report.issues() {
                    println!("{}", issue);
                }
                reports.push(report);
            }
            Err(e) => {
                eprintln!("❌ [{}] {}", locale_run.locale, e);
                failed.push(FailedLocale {
                    locale: locale_run.locale.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let issues: usize = reports.iter().map(|r| r.issue_count()).sum();
    let leaves: usize = reports.iter().map(|r| r.leaves.len()).sum();
    println!(
        "Checked {} strings in {} locales: {} issues, {} locales failed",
        leaves,
        reports.len(),
        issues,
        failed.len()
    );

    let failed_locales: Vec<String> = failed.iter().map(|f| f.locale.clone()).collect();
    if let Some(path) = report_json {
        write_json_report(path, &JsonReport { reports, failed })?;
        println!("✅ Report written to: {}", path.display());
    }
    Ok(failed_locales)
}

fn write_json_report(path: &Path, report: &JsonReport) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Error serializing report: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Error writing to {}: {}", path.display(), e))
}
