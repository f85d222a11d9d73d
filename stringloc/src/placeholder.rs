//! Format-specifier extraction and comparison.
//!
//! Recognizes the printf-style placeholders Android string resources use:
//! `%s`, `%d`, and their positional forms `%1$s`, `%2$d`.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::report::{LeafKey, ValidationIssue};

lazy_static! {
    static ref FORMAT_SPECIFIER_REGEX: Regex =
        Regex::new(r"%(?:(\d+)\$)?([sd])").expect("valid format specifier regex");
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderToken {
    pub index: Option<usize>,
    pub kind: char,
}

impl PlaceholderToken {
    /// The placeholder as written in a resource, e.g. `%1$s`.
    pub fn to_signature(&self) -> String {
        match self.index {
            Some(i) => format!("%{}${}", i, self.kind),
            None => format!("%{}", self.kind),
        }
    }
}

/// Extracts placeholder tokens in occurrence order, duplicates included.
pub fn extract_placeholders(input: &str) -> Vec<PlaceholderToken> {
    FORMAT_SPECIFIER_REGEX
        .captures_iter(input)
        .map(|caps| PlaceholderToken {
            index: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            kind: caps
                .get(2)
                .and_then(|m| m.as_str().chars().next())
                .unwrap_or('s'),
        })
        .collect()
}

/// Placeholder signatures (`%s`, `%2$d`, ...) in occurrence order.
pub fn signature(input: &str) -> Vec<String> {
    extract_placeholders(input)
        .iter()
        .map(PlaceholderToken::to_signature)
        .collect()
}

/// Placeholders of `source` with no counterpart in `translated`, counted with
/// multiplicity and returned in source order. Order in `translated` is irrelevant.
pub fn missing_placeholders(source: &str, translated: &str) -> Vec<String> {
    let mut available: HashMap<PlaceholderToken, usize> = HashMap::new();
    for token in extract_placeholders(translated) {
        *available.entry(token).or_default() += 1;
    }

    extract_placeholders(source)
        .into_iter()
        .filter(|token| match available.get_mut(token) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .map(|token| token.to_signature())
        .collect()
}

/// Compares the placeholders of one leaf.
///
/// An empty translation yields [`ValidationIssue::EmptyTranslation`] without
/// looking at placeholders.
pub fn check_placeholders(
    key: &LeafKey,
    locale: &str,
    source: &str,
    translated: &str,
) -> Option<ValidationIssue> {
    if translated.is_empty() {
        return Some(ValidationIssue::EmptyTranslation {
            key: key.clone(),
            locale: locale.to_string(),
        });
    }

    let missing = missing_placeholders(source, translated);
    if missing.is_empty() {
        return None;
    }
    Some(ValidationIssue::MissingPlaceholders {
        key: key.clone(),
        locale: locale.to_string(),
        source: source.to_string(),
        translated: translated.to_string(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_preserves_order_and_duplicates() {
        let s = "Hello %1$s, you have %2$d items, %s and %s";
        assert_eq!(signature(s), vec!["%1$s", "%2$d", "%s", "%s"]);
    }

    #[test]
    fn test_other_conversions_are_not_placeholders() {
        assert!(extract_placeholders("Progress %f and %x and 100%").is_empty());
        assert_eq!(signature("%10$s"), vec!["%10$s"]);
    }

    #[test]
    fn test_missing_reports_absent_positional() {
        assert_eq!(missing_placeholders("%s of %1$d", "%s de"), vec!["%1$d"]);
    }

    #[test]
    fn test_reordered_placeholders_match() {
        assert!(missing_placeholders("%s of %1$d", "%1$d de %s").is_empty());
    }

    #[test]
    fn test_duplicates_counted_with_multiplicity() {
        assert_eq!(missing_placeholders("%s and %s", "%s et"), vec!["%s"]);
        assert!(missing_placeholders("%s and %s", "%s, %s").is_empty());
    }

    #[test]
    fn test_extra_placeholders_in_translation_are_ignored() {
        assert!(missing_placeholders("Hello", "Bonjour %s").is_empty());
    }

    #[test]
    fn test_check_placeholders_empty_translation() {
        let key = LeafKey::string("greeting");
        let issue = check_placeholders(&key, "fr", "Hello %s", "");
        assert_eq!(
            issue,
            Some(ValidationIssue::EmptyTranslation {
                key,
                locale: "fr".to_string()
            })
        );
    }

    #[test]
    fn test_check_placeholders_reports_missing() {
        let key = LeafKey::item("counts", 1);
        let Some(ValidationIssue::MissingPlaceholders { missing, .. }) =
            check_placeholders(&key, "de", "%s and %1$d", "%s und")
        else {
            panic!("expected missing placeholders");
        };
        assert_eq!(missing, vec!["%1$d"]);
    }
}
