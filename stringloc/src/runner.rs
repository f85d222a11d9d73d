//! Per-locale jobs over files on disk and the worker pool running them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{debug, error, info_span};

use crate::{
    config::RunConfig,
    error::Error,
    locale::{Locale, target_path},
    merge::merge,
    report::{MergeReport, ValidationReport},
    traits::{Parser, Translator},
    types::ResourceDocument,
    validate::validate,
};

/// Result of one locale's job.
#[derive(Debug)]
pub struct LocaleRun<T> {
    pub locale: Locale,
    pub result: Result<T, Error>,
}

/// Merges `source_path` into `values-<locale>/` under `output_root` and writes it.
///
/// An existing locale file is the previous translation, unless `config.force`
/// is set. A previous file that fails to parse is fatal for this locale.
pub fn translate_file<T: Translator + ?Sized>(
    source_path: &Path,
    output_root: &Path,
    locale: &Locale,
    config: &RunConfig,
    translator: &T,
) -> Result<MergeReport, Error> {
    let file_name = file_name_of(source_path)?;
    let source = ResourceDocument::read_from(source_path)?;
    let target = target_path(output_root, locale, file_name);

    let previous = if !config.force && target.is_file() {
        debug!(path = %target.display(), "reading previous translation");
        Some(ResourceDocument::read_from(&target)?)
    } else {
        None
    };

    let options = config.merge_options(locale.language());
    let mut output = merge(&source, previous.as_ref(), translator, &options)?;
    output.report.locale = locale.suffix().to_string();

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    output.document.write_to(&target)?;
    debug!(path = %target.display(), "wrote locale file");
    Ok(output.report)
}

/// Validates the existing `values-<locale>/` file against `source_path`.
pub fn validate_file(
    source_path: &Path,
    output_root: &Path,
    locale: &Locale,
    config: &RunConfig,
) -> Result<ValidationReport, Error> {
    let file_name = file_name_of(source_path)?;
    let target = target_path(output_root, locale, file_name);
    if !target.is_file() {
        return Err(Error::MissingTargetFile(target));
    }

    let source = ResourceDocument::read_from(source_path)?;
    let translated = ResourceDocument::read_from(&target)?;
    let report = validate(&source, &translated, locale.suffix())?;
    if config.verbose {
        for leaf in &report.leaves {
            debug!(leaf = %leaf.key, issues = leaf.issues.len(), "checked");
        }
    }
    Ok(report)
}

/// Runs `job` once per locale on a pool of `workers` threads.
///
/// Results come back in the order of `locales`. A failing locale never affects
/// the others; only a pool that cannot be built fails the call.
pub fn run_locales<T, F>(
    locales: &[Locale],
    workers: usize,
    job: F,
) -> Result<Vec<LocaleRun<T>>, Error>
where
    T: Send,
    F: Fn(&Locale) -> Result<T, Error> + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| Error::WorkerPool(e.to_string()))?;

    Ok(pool.install(|| {
        locales
            .par_iter()
            .map(|locale| {
                let span = info_span!("locale", locale = %locale);
                let _enter = span.enter();
                let result = job(locale);
                if let Err(e) = &result {
                    error!(error = %e, "locale failed");
                }
                LocaleRun {
                    locale: locale.clone(),
                    result,
                }
            })
            .collect()
    }))
}

fn file_name_of(path: &Path) -> Result<&str, Error> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::malformed(format!("no file name in {}", path.display())))
}

/// Where `translate_file` writes and `validate_file` reads for `locale`.
pub fn locale_file(
    source_path: &Path,
    output_root: &Path,
    locale: &Locale,
) -> Result<PathBuf, Error> {
    Ok(target_path(output_root, locale, file_name_of(source_path)?))
}
