//! Incremental merge of a source document with a previously generated locale file.
//!
//! Every leaf of the source is resolved on its own:
//!
//! 1. `@string/` references are copied verbatim.
//! 2. A previous translation is reused when it exists, is non-empty and differs
//!    from the source text. A previous value identical to the source counts as
//!    "not translated yet".
//! 3. Otherwise untranslatable leaves are dropped, and translatable ones go to the
//!    backend. A backend failure drops that leaf only.
//!
//! The output is built as a fresh sequence of kept entries. Report keys always
//! use the leaf's position in the *source*, so dropping a leaf never shifts the
//! keys of its siblings. Previous list items are paired with source items through
//! [`ListEntry::align_items`]: plurals by `quantity`, arrays by position only
//! while the previous list still lines up with the source.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::{
    android_strings::is_well_formed_fragment,
    error::Error,
    report::{DropReason, LeafKey, MergeReport, Outcome},
    traits::Translator,
    translator::translate_segmented,
    types::{
        ItemEntry, Layout, ListEntry, ListKind, ResourceDocument, ResourceEntry, StringEntry,
        is_reference,
    },
};

/// Language pair and policy switches of one merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub source_lang: String,
    pub target_lang: String,
    /// Ignore the previous document and translate everything again.
    pub force: bool,
    /// Log every leaf with its source and resulting text.
    pub verbose: bool,
}

impl MergeOptions {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        MergeOptions {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            force: false,
            verbose: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// The merged document plus what happened to each leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    pub document: ResourceDocument,
    pub report: MergeReport,
}

/// Builds the locale document for `source`, reusing `previous` where possible.
///
/// Fails only on a malformed source (a `string` or `item` without text); backend
/// failures are recorded in the report.
pub fn merge<T: Translator + ?Sized>(
    source: &ResourceDocument,
    previous: Option<&ResourceDocument>,
    translator: &T,
    options: &MergeOptions,
) -> Result<MergeOutput, Error> {
    let previous = if options.force { None } else { previous };
    let mut merger = Merger {
        previous: PreviousIndex::build(previous),
        translator,
        options,
        report: MergeReport::new(options.target_lang.clone()),
    };

    let mut document = ResourceDocument {
        root: source.root.clone(),
        root_attributes: source.root_attributes.clone(),
        entries: Vec::with_capacity(source.entries.len()),
        prolog: source.prolog.clone(),
        layout: Layout {
            leading: Vec::with_capacity(source.entries.len()),
            trailing: source.layout.trailing.clone(),
        },
    };

    for (index, entry) in source.entries.iter().enumerate() {
        let merged = match entry {
            ResourceEntry::Comment(_) | ResourceEntry::Passthrough(_) => Some(entry.clone()),
            ResourceEntry::String(s) => merger.merge_string(s)?.map(ResourceEntry::String),
            ResourceEntry::List(l) => merger.merge_list(l)?.map(ResourceEntry::List),
        };
        if let Some(merged) = merged {
            document
                .layout
                .leading
                .push(source.layout.leading(index).map(str::to_string));
            document.entries.push(merged);
        }
    }

    let report = merger.report;
    debug!(
        locale = %report.locale,
        translated = report.translated(),
        reused = report.reused(),
        references = report.references(),
        failed = report.failed(),
        "merge finished"
    );
    Ok(MergeOutput { document, report })
}

/// Text of a leaf together with its representation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LeafText {
    text: String,
    markup: bool,
}

/// First-occurrence lookup tables over the previous document.
#[derive(Default)]
struct PreviousIndex<'a> {
    strings: HashMap<&'a str, &'a StringEntry>,
    lists: HashMap<(ListKind, &'a str), &'a ListEntry>,
}

impl<'a> PreviousIndex<'a> {
    fn build(document: Option<&'a ResourceDocument>) -> Self {
        let mut index = PreviousIndex::default();
        let Some(document) = document else {
            return index;
        };
        for entry in &document.entries {
            match entry {
                ResourceEntry::String(s) => {
                    index.strings.entry(s.name.as_str()).or_insert(s);
                }
                ResourceEntry::List(l) => {
                    index.lists.entry((l.kind, l.name.as_str())).or_insert(l);
                }
                _ => {}
            }
        }
        index
    }

    fn string(&self, name: &str) -> Option<LeafText> {
        self.strings.get(name).and_then(|s| {
            s.text.as_ref().map(|text| LeafText {
                text: text.clone(),
                markup: s.markup,
            })
        })
    }

    /// Previous counterpart of every item of `list`, by source index.
    fn items(&self, list: &ListEntry) -> Vec<Option<LeafText>> {
        match self.lists.get(&(list.kind, list.name.as_str())) {
            Some(previous) => list
                .align_items(previous)
                .into_iter()
                .map(|item| {
                    item.and_then(|item| {
                        item.text.as_ref().map(|text| LeafText {
                            text: text.clone(),
                            markup: item.markup,
                        })
                    })
                })
                .collect(),
            None => vec![None; list.items.len()],
        }
    }
}

struct Merger<'a, T: ?Sized> {
    previous: PreviousIndex<'a>,
    translator: &'a T,
    options: &'a MergeOptions,
    report: MergeReport,
}

impl<T: Translator + ?Sized> Merger<'_, T> {
    fn merge_string(&mut self, entry: &StringEntry) -> Result<Option<StringEntry>, Error> {
        let text = entry
            .text
            .as_deref()
            .ok_or_else(|| Error::malformed(format!("string `{}` has no text", entry.name)))?;
        let previous = self.previous.string(&entry.name);

        let resolved = self.resolve(
            LeafKey::string(&entry.name),
            text,
            entry.markup,
            entry.translatable,
            previous,
        );
        Ok(resolved.map(|leaf| StringEntry {
            name: entry.name.clone(),
            translatable: entry.translatable,
            text: Some(leaf.text),
            markup: leaf.markup,
            attributes: entry.attributes.clone(),
        }))
    }

    fn merge_list(&mut self, list: &ListEntry) -> Result<Option<ListEntry>, Error> {
        let mut items = Vec::with_capacity(list.items.len());
        let mut leading = Vec::with_capacity(list.items.len());
        let mut previous_items = self.previous.items(list).into_iter();

        for (index, item) in list.items.iter().enumerate() {
            let text = item.text.as_deref().ok_or_else(|| {
                Error::malformed(format!(
                    "item {} of {} `{}` has no text",
                    index, list.kind, list.name
                ))
            })?;
            let previous = previous_items.next().flatten();

            let resolved = self.resolve(
                LeafKey::item(&list.name, index),
                text,
                item.markup,
                item.translatable,
                previous,
            );
            if let Some(leaf) = resolved {
                leading.push(list.layout.leading(index).map(str::to_string));
                items.push(ItemEntry {
                    translatable: item.translatable,
                    text: Some(leaf.text),
                    markup: leaf.markup,
                    attributes: item.attributes.clone(),
                });
            }
        }

        if items.is_empty() && !list.items.is_empty() {
            debug!(name = %list.name, kind = %list.kind, "every item dropped, omitting list");
            return Ok(None);
        }
        Ok(Some(ListEntry {
            kind: list.kind,
            name: list.name.clone(),
            attributes: list.attributes.clone(),
            items,
            layout: Layout {
                leading,
                trailing: list.layout.trailing.clone(),
            },
        }))
    }

    /// Decides the output text of one leaf, or `None` when it is dropped.
    fn resolve(
        &mut self,
        key: LeafKey,
        text: &str,
        markup: bool,
        translatable: bool,
        previous: Option<LeafText>,
    ) -> Option<LeafText> {
        if is_reference(text) {
            self.report.record(key, Outcome::Reference);
            return Some(LeafText {
                text: text.to_string(),
                markup,
            });
        }

        if let Some(previous) = previous.filter(|p| !p.text.is_empty() && p.text != text) {
            if self.options.verbose {
                info!("[{}] reused: {}", key, previous.text);
            }
            self.report.record(key, Outcome::Reused);
            return Some(previous);
        }

        if !translatable {
            self.report
                .record(key, Outcome::Dropped(DropReason::NotTranslatable));
            return None;
        }

        match translate_segmented(
            self.translator,
            text,
            &self.options.source_lang,
            &self.options.target_lang,
        ) {
            Ok(translated) => {
                if self.options.verbose {
                    info!("[{}] {} -> {}", key, text, translated);
                }
                // A markup fragment stays raw only if the backend kept it well formed.
                let markup = markup && is_well_formed_fragment(&translated);
                self.report.record(key, Outcome::Translated);
                Some(LeafText {
                    text: translated,
                    markup,
                })
            }
            Err(e) => {
                warn!(leaf = %key, error = %e, "translation failed, dropping entry");
                self.report.record(
                    key,
                    Outcome::Dropped(DropReason::TranslationFailed(e.to_string())),
                );
                None
            }
        }
    }
}
