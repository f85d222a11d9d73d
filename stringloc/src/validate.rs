//! Validation of a generated locale file against its source.

use tracing::debug;

use crate::{
    checks::{check_warning_characters, check_xml_escaping},
    error::Error,
    placeholder::check_placeholders,
    report::{LeafKey, LeafValidation, ValidationIssue, ValidationReport},
    types::{ListEntry, ResourceDocument, ResourceEntry, StringEntry, is_reference},
};

/// Checks every translatable, non-reference leaf of `source` against `target`.
///
/// A top-level string missing from `target` is fatal, since validation expects
/// a completed merge. A list item without a counterpart (see
/// [`ListEntry::align_items`]) is reported as an empty translation.
pub fn validate(
    source: &ResourceDocument,
    target: &ResourceDocument,
    locale: &str,
) -> Result<ValidationReport, Error> {
    let mut report = ValidationReport {
        locale: locale.to_string(),
        leaves: Vec::new(),
    };

    for entry in &source.entries {
        match entry {
            ResourceEntry::String(s) => {
                if let Some(leaf) = validate_string(s, target, locale)? {
                    report.leaves.push(leaf);
                }
            }
            ResourceEntry::List(l) => validate_list(l, target, locale, &mut report.leaves)?,
            _ => {}
        }
    }

    debug!(
        locale,
        leaves = report.leaves.len(),
        issues = report.issue_count(),
        "validation finished"
    );
    Ok(report)
}

fn validate_string(
    entry: &StringEntry,
    target: &ResourceDocument,
    locale: &str,
) -> Result<Option<LeafValidation>, Error> {
    let source_text = match entry.text.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => {
            return Err(Error::malformed(format!(
                "string `{}` is empty in the source",
                entry.name
            )));
        }
    };
    if is_reference(source_text) || !entry.translatable {
        return Ok(None);
    }

    let translated = target
        .find_string(&entry.name)
        .ok_or_else(|| Error::MissingTranslation {
            name: entry.name.clone(),
            locale: locale.to_string(),
        })?;

    let key = LeafKey::string(&entry.name);
    let issues = check_leaf(
        &key,
        locale,
        source_text,
        translated.text.as_deref().unwrap_or_default(),
        translated.markup,
    )?;
    Ok(Some(LeafValidation { key, issues }))
}

fn validate_list(
    list: &ListEntry,
    target: &ResourceDocument,
    locale: &str,
    leaves: &mut Vec<LeafValidation>,
) -> Result<(), Error> {
    let aligned = target
        .find_list(list.kind, &list.name)
        .map(|target_list| list.align_items(target_list))
        .unwrap_or_default();

    for (index, item) in list.items.iter().enumerate() {
        let source_text = item.text.as_deref().ok_or_else(|| {
            Error::malformed(format!(
                "item {} of {} `{}` has no text",
                index, list.kind, list.name
            ))
        })?;
        if is_reference(source_text) || !item.translatable {
            continue;
        }

        let translated = aligned.get(index).copied().flatten();
        let key = LeafKey::item(&list.name, index);
        let issues = check_leaf(
            &key,
            locale,
            source_text,
            translated.and_then(|i| i.text.as_deref()).unwrap_or_default(),
            translated.is_some_and(|i| i.markup),
        )?;
        leaves.push(LeafValidation { key, issues });
    }
    Ok(())
}

/// Runs the placeholder, warning-character and escaping checks in that order.
fn check_leaf(
    key: &LeafKey,
    locale: &str,
    source: &str,
    translated: &str,
    markup: bool,
) -> Result<Vec<ValidationIssue>, Error> {
    let mut issues: Vec<ValidationIssue> = check_placeholders(key, locale, source, translated)
        .into_iter()
        .collect();
    if translated.is_empty() {
        return Ok(issues);
    }

    issues.extend(check_warning_characters(key, locale, source, translated)?);
    // Markup leaves are stored raw, never escaped.
    if !markup {
        issues.extend(check_xml_escaping(key, locale, source, translated)?);
    }
    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{report::WarningKind, traits::Parser};
    use indoc::indoc;

    fn doc(xml: &str) -> ResourceDocument {
        ResourceDocument::from_str(xml).unwrap()
    }

    #[test]
    fn test_clean_translation_passes() {
        let source = doc(indoc! {r#"
            <resources>
                <string name="greet">Hello %s</string>
                <string name="alias">@string/greet</string>
                <string name="brand" translatable="false">Acme</string>
            </resources>
        "#});
        let target = doc(r#"<resources><string name="greet">Bonjour %s</string></resources>"#);

        let report = validate(&source, &target, "fr").unwrap();
        assert_eq!(report.leaves.len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_placeholder_reported() {
        let source = doc(r#"<resources><string name="count">%s of %1$d</string></resources>"#);
        let target = doc(r#"<resources><string name="count">%s de</string></resources>"#);

        let report = validate(&source, &target, "fr").unwrap();
        let issues: Vec<_> = report.issues().collect();
        assert_eq!(issues.len(), 1);
        let ValidationIssue::MissingPlaceholders { missing, .. } = issues[0] else {
            panic!("expected missing placeholders");
        };
        assert_eq!(missing, &vec!["%1$d".to_string()]);
    }

    #[test]
    fn test_reordered_placeholders_pass() {
        let source = doc(r#"<resources><string name="count">%s of %1$d</string></resources>"#);
        let target = doc(r#"<resources><string name="count">%1$d de %s</string></resources>"#);
        assert!(validate(&source, &target, "fr").unwrap().is_clean());
    }

    #[test]
    fn test_missing_target_string_is_fatal() {
        let source = doc(r#"<resources><string name="a">Alpha</string></resources>"#);
        let target = doc(r#"<resources></resources>"#);
        let result = validate(&source, &target, "de");
        assert!(matches!(result, Err(Error::MissingTranslation { .. })));
    }

    #[test]
    fn test_empty_target_string_reported_once() {
        let source = doc(r#"<resources><string name="a">Alpha &amp; Beta</string></resources>"#);
        let target = doc(r#"<resources><string name="a"></string></resources>"#);

        let report = validate(&source, &target, "de").unwrap();
        let issues: Vec<_> = report.issues().collect();
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], ValidationIssue::EmptyTranslation { .. }));
    }

    #[test]
    fn test_empty_source_string_is_fatal() {
        let source = doc(r#"<resources><string name="a"></string></resources>"#);
        let target = doc(r#"<resources><string name="a">x</string></resources>"#);
        assert!(matches!(
            validate(&source, &target, "de"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_ampersand_flags_warning_and_escaping() {
        let source = doc(r#"<resources><string name="amp">A and B</string></resources>"#);
        let target = doc(r#"<resources><string name="amp">A &amp; B</string></resources>"#);

        let report = validate(&source, &target, "fr").unwrap();
        let issues: Vec<_> = report.issues().collect();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0],
            ValidationIssue::WarningCharacters {
                kind: WarningKind::Ampersand,
                ..
            }
        ));
        assert!(matches!(issues[1], ValidationIssue::WrongEscaping { .. }));
    }

    #[test]
    fn test_list_items_checked_with_their_own_text() {
        let source = doc(indoc! {r#"
            <resources>
                <string name="title">Title</string>
                <string-array name="ranges">
                    <item>Small</item>
                    <item>Large</item>
                    <item>Huge</item>
                </string-array>
            </resources>
        "#});
        let target = doc(indoc! {r#"
            <resources>
                <string name="title">Titre...</string>
                <string-array name="ranges">
                    <item>Petit</item>
                    <item>5-6 grand</item>
                    <item></item>
                </string-array>
            </resources>
        "#});

        let report = validate(&source, &target, "fr").unwrap();
        assert_eq!(report.leaves.len(), 4);

        let title = &report.leaves[0];
        assert_eq!(title.issues.len(), 1);
        assert!(report.leaves[1].passed());

        let large = &report.leaves[2];
        assert_eq!(large.key, LeafKey::item("ranges", 1));
        assert!(matches!(
            large.issues.as_slice(),
            [ValidationIssue::WarningCharacters {
                kind: WarningKind::NumericRange,
                ..
            }]
        ));

        let huge = &report.leaves[3];
        assert!(matches!(
            huge.issues.as_slice(),
            [ValidationIssue::EmptyTranslation { .. }]
        ));
    }

    #[test]
    fn test_plural_items_checked_against_same_quantity() {
        let source = doc(indoc! {r#"
            <resources>
                <plurals name="apples">
                    <item quantity="one">One apple</item>
                    <item quantity="other">%d apples</item>
                </plurals>
            </resources>
        "#});
        let target = doc(indoc! {r#"
            <resources>
                <plurals name="apples">
                    <item quantity="other">%d pommes</item>
                </plurals>
            </resources>
        "#});

        let report = validate(&source, &target, "fr").unwrap();
        assert!(matches!(
            report.leaves[0].issues.as_slice(),
            [ValidationIssue::EmptyTranslation { .. }]
        ));
        assert!(report.leaves[1].passed());
    }

    #[test]
    fn test_shrunken_array_not_checked_against_shifted_items() {
        let source = doc(indoc! {r#"
            <resources>
                <string-array name="counts">
                    <item>One</item>
                    <item>%d items</item>
                </string-array>
            </resources>
        "#});
        let target = doc(indoc! {r#"
            <resources>
                <string-array name="counts">
                    <item>%d éléments</item>
                </string-array>
            </resources>
        "#});

        let report = validate(&source, &target, "fr").unwrap();
        assert_eq!(report.leaves.len(), 2);
        assert!(report.leaves.iter().all(|leaf| matches!(
            leaf.issues.as_slice(),
            [ValidationIssue::EmptyTranslation { .. }]
        )));
    }

    #[test]
    fn test_markup_leaf_exempt_from_escaping() {
        let source = doc(r#"<resources><string name="bold">Hi <b>you</b></string></resources>"#);
        let target = doc(r#"<resources><string name="bold">Salut <b>toi</b></string></resources>"#);
        assert!(validate(&source, &target, "fr").unwrap().is_clean());
    }

    #[test]
    fn test_plurals_placeholders_per_item() {
        let source = doc(indoc! {r#"
            <resources>
                <plurals name="files">
                    <item quantity="one">One file</item>
                    <item quantity="other">%d files</item>
                </plurals>
            </resources>
        "#});
        let target = doc(indoc! {r#"
            <resources>
                <plurals name="files">
                    <item quantity="one">Un fichier</item>
                    <item quantity="other">fichiers</item>
                </plurals>
            </resources>
        "#});

        let report = validate(&source, &target, "fr").unwrap();
        assert_eq!(report.issue_count(), 1);
        assert_eq!(
            report.issues().next().map(|i| i.key().clone()),
            Some(LeafKey::item("files", 1))
        );
    }
}
