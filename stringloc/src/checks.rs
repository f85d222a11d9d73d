//! Character-level checks on translated text.

use std::borrow::Cow;

use lazy_static::lazy_static;
use quick_xml::escape::partial_escape;
use regex::Regex;

use crate::{
    error::Error,
    report::{LeafKey, ValidationIssue, WarningKind},
};

lazy_static! {
    static ref NUMERIC_RANGE_REGEX: Regex = Regex::new(r"\d-\d").expect("valid range regex");
}

/// Every warning pattern present in `text`, in a fixed order.
///
/// Fails with [`Error::EmptyText`] on empty input; callers report empty
/// translations through the placeholder check instead.
pub fn warning_kinds(key: &LeafKey, text: &str, source: &str) -> Result<Vec<WarningKind>, Error> {
    ensure_non_empty(key, text, source)?;

    let mut kinds = Vec::new();
    if text.contains('&') {
        kinds.push(WarningKind::Ampersand);
    }
    if text.contains("...") {
        kinds.push(WarningKind::Ellipsis);
    }
    if NUMERIC_RANGE_REGEX.is_match(text) {
        kinds.push(WarningKind::NumericRange);
    }
    if text.contains("--") {
        kinds.push(WarningKind::DoubleHyphen);
    }
    Ok(kinds)
}

/// One issue per warning pattern found in `translated`.
pub fn check_warning_characters(
    key: &LeafKey,
    locale: &str,
    source: &str,
    translated: &str,
) -> Result<Vec<ValidationIssue>, Error> {
    Ok(warning_kinds(key, translated, source)?
        .into_iter()
        .map(|kind| ValidationIssue::WarningCharacters {
            key: key.clone(),
            locale: locale.to_string(),
            kind,
            source: source.to_string(),
            translated: translated.to_string(),
        })
        .collect())
}

/// Standard XML text escaping of `&`, `<` and `>`.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    partial_escape(text)
}

/// Reports translated text that changes under XML escaping.
pub fn check_xml_escaping(
    key: &LeafKey,
    locale: &str,
    source: &str,
    translated: &str,
) -> Result<Option<ValidationIssue>, Error> {
    ensure_non_empty(key, translated, source)?;

    let escaped = escape_xml(translated);
    if escaped == translated {
        return Ok(None);
    }
    Ok(Some(ValidationIssue::WrongEscaping {
        key: key.clone(),
        locale: locale.to_string(),
        source: source.to_string(),
        translated: translated.to_string(),
        escaped: escaped.into_owned(),
    }))
}

fn ensure_non_empty(key: &LeafKey, text: &str, source: &str) -> Result<(), Error> {
    if text.is_empty() {
        return Err(Error::EmptyText {
            name: key.to_string(),
            original: source.to_string(),
        });
    }
    Ok(())
}
