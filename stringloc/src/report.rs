//! Outcome and issue records produced by merge and validation runs.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Identifies one leaf: a top-level `<string>` or one `<item>` of a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LeafKey {
    pub name: String,
    /// Item position inside the source list; `None` for a `<string>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl LeafKey {
    pub fn string(name: impl Into<String>) -> Self {
        LeafKey {
            name: name.into(),
            index: None,
        }
    }

    pub fn item(name: impl Into<String>, index: usize) -> Self {
        LeafKey {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl Display for LeafKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]", self.name, i),
            None => f.write_str(&self.name),
        }
    }
}

/// Why a leaf is missing from the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum DropReason {
    NotTranslatable,
    TranslationFailed(String),
}

/// What the merge engine did with one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// `@string/` reference copied from the source.
    Reference,
    /// Previous translation carried forward.
    Reused,
    /// Fresh translation from the backend.
    Translated,
    Dropped(DropReason),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Reference => f.write_str("reference"),
            Outcome::Reused => f.write_str("reused"),
            Outcome::Translated => f.write_str("translated"),
            Outcome::Dropped(DropReason::NotTranslatable) => {
                f.write_str("dropped (not translatable)")
            }
            Outcome::Dropped(DropReason::TranslationFailed(reason)) => {
                write!(f, "dropped (translation failed: {})", reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafOutcome {
    pub key: LeafKey,
    pub outcome: Outcome,
}

/// Per-leaf outcomes of one merge run, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MergeReport {
    pub locale: String,
    pub outcomes: Vec<LeafOutcome>,
}

impl MergeReport {
    pub fn new(locale: impl Into<String>) -> Self {
        MergeReport {
            locale: locale.into(),
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, key: LeafKey, outcome: Outcome) {
        self.outcomes.push(LeafOutcome { key, outcome });
    }

    pub fn outcome_of(&self, key: &LeafKey) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| &o.key == key)
            .map(|o| &o.outcome)
    }

    pub fn references(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Reference))
    }

    pub fn reused(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Reused))
    }

    pub fn translated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Translated))
    }

    pub fn not_translatable(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Dropped(DropReason::NotTranslatable)))
    }

    /// Leaves dropped because the backend failed (soft failures).
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Dropped(DropReason::TranslationFailed(_))))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

/// Suspicious character patterns flagged in translated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A literal `&`.
    Ampersand,
    /// Three dots `...`.
    Ellipsis,
    /// Digit, hyphen, digit, e.g. `5-6`.
    NumericRange,
    /// Two hyphens `--`.
    DoubleHyphen,
}

impl WarningKind {
    pub fn label(self) -> &'static str {
        match self {
            WarningKind::Ampersand => "Warning characters &",
            WarningKind::Ellipsis => "Warning characters ...",
            WarningKind::NumericRange => "Warning characters -",
            WarningKind::DoubleHyphen => "Warning characters --",
        }
    }
}

/// One finding of the validation pass. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    EmptyTranslation {
        key: LeafKey,
        locale: String,
    },
    MissingPlaceholders {
        key: LeafKey,
        locale: String,
        source: String,
        translated: String,
        missing: Vec<String>,
    },
    WarningCharacters {
        key: LeafKey,
        locale: String,
        kind: WarningKind,
        source: String,
        translated: String,
    },
    WrongEscaping {
        key: LeafKey,
        locale: String,
        source: String,
        translated: String,
        escaped: String,
    },
}

impl ValidationIssue {
    pub fn key(&self) -> &LeafKey {
        match self {
            ValidationIssue::EmptyTranslation { key, .. }
            | ValidationIssue::MissingPlaceholders { key, .. }
            | ValidationIssue::WarningCharacters { key, .. }
            | ValidationIssue::WrongEscaping { key, .. } => key,
        }
    }

    pub fn locale(&self) -> &str {
        match self {
            ValidationIssue::EmptyTranslation { locale, .. }
            | ValidationIssue::MissingPlaceholders { locale, .. }
            | ValidationIssue::WarningCharacters { locale, .. }
            | ValidationIssue::WrongEscaping { locale, .. } => locale,
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::EmptyTranslation { key, locale } => {
                write!(f, "[{}] {}: String is empty", locale, key)
            }
            ValidationIssue::MissingPlaceholders {
                key,
                locale,
                source,
                translated,
                missing,
            } => write!(
                f,
                "[{}] {}: missing placeholders {} | source: \"{}\" | translated: \"{}\"",
                locale,
                key,
                missing.join(", "),
                source,
                translated
            ),
            ValidationIssue::WarningCharacters {
                key,
                locale,
                kind,
                source,
                translated,
            } => write!(
                f,
                "[{}] {}: {} | source: \"{}\" | translated: \"{}\"",
                locale,
                key,
                kind.label(),
                source,
                translated
            ),
            ValidationIssue::WrongEscaping {
                key,
                locale,
                source,
                translated,
                escaped,
            } => write!(
                f,
                "[{}] {}: Wrong xml escaping | source: \"{}\" | translated: \"{}\" | Escaped string: \"{}\"",
                locale, key, source, translated, escaped
            ),
        }
    }
}

/// Validation result for one leaf; an empty `issues` list means it passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafValidation {
    pub key: LeafKey,
    pub issues: Vec<ValidationIssue>,
}

impl LeafValidation {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Every checked leaf of one locale, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub locale: String,
    pub leaves: Vec<LeafValidation>,
}

impl ValidationReport {
    /// All findings, skipping leaves that passed.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.leaves.iter().flat_map(|leaf| leaf.issues.iter())
    }

    pub fn issue_count(&self) -> usize {
        self.issues().count()
    }

    pub fn is_clean(&self) -> bool {
        self.leaves.iter().all(LeafValidation::passed)
    }
}
