//! In-memory model of an Android string-resource document.
//! The parser decodes into these; the writer serializes these.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Prefix of a value that points at another string resource.
pub const REFERENCE_PREFIX: &str = "@string/";

/// Returns true when `text` is a `@string/...` reference rather than literal content.
pub fn is_reference(text: &str) -> bool {
    text.starts_with(REFERENCE_PREFIX)
}

/// One XML attribute, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A complete `strings.xml` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDocument {
    /// Root element name, `resources` in every well-formed file.
    pub root: String,
    /// Root attributes such as `xmlns:tools`.
    pub root_attributes: Vec<Attribute>,
    /// Ordered entries directly below the root.
    pub entries: Vec<ResourceEntry>,
    /// Raw text between the XML declaration and the root, license comments
    /// included. `None` writes a single line break.
    #[serde(skip)]
    pub prolog: Option<String>,
    /// Whitespace around `entries`.
    #[serde(skip)]
    pub layout: Layout,
}

/// Text found between the children of an element, so that unchanged files are
/// written back byte for byte.
///
/// Positions without recorded text (entries added in code) fall back to the
/// writer's default indentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    /// Text before each child, by child position.
    pub leading: Vec<Option<String>>,
    /// Text before the end tag. `None` for an element written as `<tag/>`, or
    /// built in code.
    pub trailing: Option<String>,
}

impl Layout {
    /// Text recorded before the child at `index`.
    pub fn leading(&self, index: usize) -> Option<&str> {
        self.leading.get(index).and_then(|s| s.as_deref())
    }
}

impl Default for ResourceDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceDocument {
    pub fn new() -> Self {
        ResourceDocument {
            root: "resources".to_string(),
            root_attributes: Vec::new(),
            entries: Vec::new(),
            prolog: None,
            layout: Layout::default(),
        }
    }

    pub fn with_entry(mut self, entry: impl Into<ResourceEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// First `<string>` with the given name.
    pub fn find_string(&self, name: &str) -> Option<&StringEntry> {
        self.entries.iter().find_map(|entry| match entry {
            ResourceEntry::String(s) if s.name == name => Some(s),
            _ => None,
        })
    }

    /// First `<string-array>` or `<plurals>` (matching `kind`) with the given name.
    pub fn find_list(&self, kind: ListKind, name: &str) -> Option<&ListEntry> {
        self.entries.iter().find_map(|entry| match entry {
            ResourceEntry::List(l) if l.kind == kind && l.name == name => Some(l),
            _ => None,
        })
    }

    /// Number of leaves (strings plus list items) in the document.
    pub fn leaf_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                ResourceEntry::String(_) => 1,
                ResourceEntry::List(l) => l.items.len(),
                _ => 0,
            })
            .sum()
    }
}

/// A direct child of the document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceEntry {
    /// `<!-- ... -->`, copied verbatim.
    Comment(String),
    String(StringEntry),
    List(ListEntry),
    /// Any other named element (`<integer>`, `<color>`, ...), kept as raw XML.
    Passthrough(PassthroughEntry),
}

impl From<StringEntry> for ResourceEntry {
    fn from(value: StringEntry) -> Self {
        ResourceEntry::String(value)
    }
}

impl From<ListEntry> for ResourceEntry {
    fn from(value: ListEntry) -> Self {
        ResourceEntry::List(value)
    }
}

/// A top-level `<string>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringEntry {
    pub name: String,
    pub translatable: bool,
    /// `None` for an empty element (`<string name="a"/>`).
    pub text: Option<String>,
    /// `text` is a raw XML fragment (inline markup or CDATA) rather than plain text.
    pub markup: bool,
    /// All attributes in document order, `name` included.
    pub attributes: Vec<Attribute>,
}

impl StringEntry {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        StringEntry {
            attributes: vec![Attribute::new("name", name.clone())],
            name,
            translatable: true,
            text: Some(text.into()),
            markup: false,
        }
    }

    pub fn untranslatable(mut self) -> Self {
        self.translatable = false;
        set_attribute(&mut self.attributes, "translatable", "false");
        self
    }

    pub fn is_reference(&self) -> bool {
        self.text.as_deref().is_some_and(is_reference)
    }
}

/// Which list element a [`ListEntry`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    StringArray,
    Plurals,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::StringArray => "string-array",
            ListKind::Plurals => "plurals",
        }
    }

    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"string-array" => Some(ListKind::StringArray),
            b"plurals" => Some(ListKind::Plurals),
            _ => None,
        }
    }
}

impl Display for ListKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A `<string-array>` or `<plurals>` element and its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub kind: ListKind,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub items: Vec<ItemEntry>,
    /// Whitespace around `items`.
    #[serde(skip)]
    pub layout: Layout,
}

impl ListEntry {
    pub fn new(kind: ListKind, name: impl Into<String>) -> Self {
        let name = name.into();
        ListEntry {
            kind,
            attributes: vec![Attribute::new("name", name.clone())],
            name,
            items: Vec::new(),
            layout: Layout::default(),
        }
    }

    pub fn with_item(mut self, item: ItemEntry) -> Self {
        self.items.push(item);
        self
    }

    /// Text of the item at `index`, if that item exists and has text.
    pub fn item_text(&self, index: usize) -> Option<&str> {
        self.items.get(index).and_then(|item| item.text.as_deref())
    }

    /// Pairs every item of this list with its counterpart in `other`, by index.
    ///
    /// Plural items pair by `quantity`. Other items pair by position, but only
    /// when `other` holds one item per item of this list, or one per item left
    /// after removing the untranslatable ones (which a merge drops). Any other
    /// length means items went missing and positions no longer line up, so no
    /// item gets a counterpart.
    pub fn align_items<'a>(&self, other: &'a ListEntry) -> Vec<Option<&'a ItemEntry>> {
        let kept: Vec<bool> = self
            .items
            .iter()
            .map(|item| item.translatable || item.text.as_deref().is_some_and(is_reference))
            .collect();
        let kept_count = kept.iter().filter(|k| **k).count();

        let mut position = 0;
        let mut positional = Vec::with_capacity(self.items.len());
        for (index, is_kept) in kept.iter().enumerate() {
            let counterpart = if other.items.len() == self.items.len() {
                other.items.get(index)
            } else if other.items.len() == kept_count && *is_kept {
                position += 1;
                other.items.get(position - 1)
            } else {
                None
            };
            positional.push(counterpart);
        }

        self.items
            .iter()
            .zip(positional)
            .map(|(item, counterpart)| match item.plural_quantity() {
                Some(quantity) if self.kind == ListKind::Plurals => other
                    .items
                    .iter()
                    .find(|o| o.plural_quantity() == Some(quantity)),
                _ => counterpart,
            })
            .collect()
    }
}

/// An `<item>` inside a list. Its index is its position in [`ListEntry::items`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemEntry {
    pub translatable: bool,
    pub text: Option<String>,
    pub markup: bool,
    pub attributes: Vec<Attribute>,
}

impl ItemEntry {
    pub fn new(text: impl Into<String>) -> Self {
        ItemEntry {
            translatable: true,
            text: Some(text.into()),
            markup: false,
            attributes: Vec::new(),
        }
    }

    /// Plural item with a `quantity` attribute.
    pub fn quantity(quantity: impl Into<String>, text: impl Into<String>) -> Self {
        let mut item = Self::new(text);
        item.attributes.push(Attribute::new("quantity", quantity));
        item
    }

    pub fn untranslatable(mut self) -> Self {
        self.translatable = false;
        set_attribute(&mut self.attributes, "translatable", "false");
        self
    }

    /// Value of the `quantity` attribute of a plural item.
    pub fn plural_quantity(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == "quantity")
            .map(|a| a.value.as_str())
    }
}

/// A root-level element with no translation semantics, kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassthroughEntry {
    pub tag: String,
    pub name: String,
    /// The complete element as written in the source file.
    pub raw: String,
}

fn set_attribute(attributes: &mut Vec<Attribute>, key: &str, value: &str) {
    match attributes.iter_mut().find(|a| a.key == key) {
        Some(existing) => existing.value = value.to_string(),
        None => attributes.push(Attribute::new(key, value)),
    }
}
