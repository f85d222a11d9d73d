//! Locale identifiers and the `values-<suffix>` folder layout.

use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Serialize;
use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// Prefix of every resource folder.
pub const VALUES_PREFIX: &str = "values-";

/// Qualifier folders that look like locales but are not.
pub const RESERVED_FOLDERS: [&str; 1] = ["values-night"];

/// A target locale as it appears in a folder name.
///
/// The folder suffix may carry a region (`pt-rBR`, `zh-CN`); translation
/// requests only use the language before the first `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Locale {
    suffix: String,
    language: String,
}

impl Locale {
    /// Folder suffix, e.g. `pt-rBR`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Language code sent to the backend, e.g. `pt`.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s.trim();
        if suffix.is_empty() {
            return Err(Error::InvalidLocale("locale cannot be empty".to_string()));
        }
        if !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::InvalidLocale(format!(
                "`{}` is not a valid folder suffix",
                suffix
            )));
        }

        let language = suffix.split('-').next().unwrap_or(suffix);
        // Android locale qualifiers start with an ISO 639 code; longer words are
        // other qualifiers (`large`, `night`, `land`).
        if !(2..=3).contains(&language.len())
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(Error::InvalidLocale(format!(
                "`{}` does not start with a two or three letter language code",
                suffix
            )));
        }
        language
            .parse::<LanguageIdentifier>()
            .map_err(|e| Error::InvalidLocale(format!("`{}`: {}", suffix, e)))?;

        Ok(Locale {
            suffix: suffix.to_string(),
            language: language.to_ascii_lowercase(),
        })
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.suffix)
    }
}

/// Parses a comma-separated locale list, dropping blanks and duplicates.
pub fn parse_locale_list(list: &str) -> Result<Vec<Locale>, Error> {
    let mut locales: Vec<Locale> = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let locale: Locale = part.parse()?;
        if !locales.contains(&locale) {
            locales.push(locale);
        }
    }
    Ok(locales)
}

/// Path of `file_name` for `locale` under `root`.
pub fn target_path(root: &Path, locale: &Locale, file_name: &str) -> PathBuf {
    root.join(format!("{}{}", VALUES_PREFIX, locale.suffix()))
        .join(file_name)
}

/// Locales with an existing `values-<suffix>/<file_name>` under `root`, sorted.
pub fn discover_locales(root: &Path, file_name: &str) -> Result<Vec<Locale>, Error> {
    let mut locales = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let folder = entry.file_name();
        let Some(folder) = folder.to_str() else {
            continue;
        };
        let Some(suffix) = folder.strip_prefix(VALUES_PREFIX) else {
            continue;
        };
        if RESERVED_FOLDERS.contains(&folder) || !entry.path().join(file_name).is_file() {
            continue;
        }

        match suffix.parse::<Locale>() {
            Ok(locale) => locales.push(locale),
            Err(e) => debug!(folder, error = %e, "skipping non-locale folder"),
        }
    }

    locales.sort();
    debug!(root = %root.display(), count = locales.len(), "discovered locales");
    Ok(locales)
}

/// Output root used when none is given: `res/values/strings.xml` gives `res/`.
pub fn default_output_root(input: &Path) -> PathBuf {
    input
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
