//! All error types for the stringloc crate.
//!
//! [`Error`] is returned from every fallible operation that aborts a run for one
//! (file, locale) pair. [`TranslateError`] describes a single failed backend call
//! and never aborts a run on its own: the merge engine downgrades it to a dropped
//! leaf.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("structural error: {0}")]
    Structural(String),

    #[error("target file not found: {}", .0.display())]
    MissingTargetFile(PathBuf),

    #[error("no translation for string `{name}` in locale `{locale}`")]
    MissingTranslation { name: String, locale: String },

    #[error("empty translated text for `{name}` (source: {original})")]
    EmptyText { name: String, original: String },

    #[error("invalid locale: {0}")]
    InvalidLocale(String),

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("translation backend error: {0}")]
    Translation(#[from] TranslateError),
}

impl Error {
    /// Creates a new malformed-input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }

    /// Creates a new structural error
    pub fn structural(message: impl Into<String>) -> Self {
        Error::Structural(message.into())
    }
}

/// Failure of one backend request.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend answered with status {0}")]
    Status(u16),

    #[error("no translation found in backend response")]
    EmptyResponse,

    #[error("{0}")]
    Backend(String),
}
