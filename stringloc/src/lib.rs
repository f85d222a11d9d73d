#![forbid(unsafe_code)]
//! Incremental machine translation and validation for Android `strings.xml` files.
//!
//! A run takes the source `values/strings.xml`, the previously generated
//! `values-<locale>/strings.xml` if any, and a [`Translator`]. Only leaves that
//! have no usable translation yet go to the backend; everything else is reused.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stringloc::{GoogleWebTranslator, RunConfig, locale::parse_locale_list, runner};
//! use std::path::Path;
//!
//! let source = Path::new("app/src/main/res/values/strings.xml");
//! let root = Path::new("app/src/main/res");
//! let config = RunConfig::default();
//! let translator = GoogleWebTranslator::new()?;
//!
//! let locales = parse_locale_list("fr,de,pt-rBR")?;
//! let runs = runner::run_locales(&locales, config.workers, |locale| {
//!     runner::translate_file(source, root, locale, &config, &translator)
//! })?;
//! for run in runs {
//!     match run.result {
//!         Ok(report) => println!("{}: {} translated", run.locale, report.translated()),
//!         Err(e) => eprintln!("{}: {}", run.locale, e),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Checks
//!
//! [`validate()`] compares a generated file with its source and reports, per leaf:
//!
//! - missing `%s` / `%1$d` placeholders (counted with multiplicity)
//! - empty translations
//! - suspicious characters (`&`, `...`, `5-6`, `--`)
//! - text that changes under XML escaping

pub mod android_strings;
pub mod checks;
pub mod config;
pub mod error;
pub mod locale;
pub mod merge;
pub mod placeholder;
pub mod report;
pub mod runner;
pub mod traits;
pub mod translator;
pub mod types;
pub mod validate;

// Re-export most used types for easy consumption
pub use crate::{
    config::RunConfig,
    error::{Error, TranslateError},
    locale::Locale,
    merge::{MergeOptions, MergeOutput, merge},
    report::{
        DropReason, LeafKey, MergeReport, Outcome, ValidationIssue, ValidationReport, WarningKind,
    },
    traits::{Parser, Translator},
    translator::{GoogleWebTranslator, translate_segmented},
    types::{
        ItemEntry, Layout, ListEntry, ListKind, ResourceDocument, ResourceEntry, StringEntry,
    },
    validate::validate,
};
