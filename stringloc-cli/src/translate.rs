use stringloc::runner::{run_locales, translate_file};
use stringloc::{MergeReport, Outcome, Translator};

use crate::config::ResolvedRun;

/// Run the translate command: merge the source into every selected locale.
///
/// Returns the locales that failed fatally. Leaves that could not be translated
/// are reported but do not fail their locale.
pub fn run_translate_command<T: Translator + ?Sized>(
    run: &ResolvedRun,
    translator: &T,
) -> Result<Vec<String>, String> {
    let runs = run_locales(&run.locales, run.config.workers, |locale| {
        translate_file(
            &run.input,
            &run.output_root,
            locale,
            &run.config,
            translator,
        )
    })
    .map_err(|e| e.to_string())?;

    let mut failed = Vec::new();
    for locale_run in runs {
        match locale_run.result {
            Ok(report) => print_report(&report),
            Err(e) => {
                eprintln!("❌ [{}] {}", locale_run.locale, e);
                failed.push(locale_run.locale.to_string());
            }
        }
    }
    Ok(failed)
}

fn print_report(report: &MergeReport) {
    for leaf in &report.outcomes {
        let marker = match leaf.outcome {
            Outcome::Dropped(_) => "⚠️",
            _ => "✅",
        };
        println!("{} [{}] {}: {}", marker, report.locale, leaf.key, leaf.outcome);
    }
    println!("{}", summary_line(report));
}

/// One-line summary of a locale's merge.
pub fn summary_line(report: &MergeReport) -> String {
    format!(
        "[{}] {} translated, {} reused, {} references, {} not translatable, {} failed",
        report.locale,
        report.translated(),
        report.reused(),
        report.references(),
        report.not_translatable(),
        report.failed()
    )
}
