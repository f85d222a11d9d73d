//! Support for Android `strings.xml` resource files.
//!
//! Parses `<string>`, `<string-array>`, `<plurals>` and comments into a
//! [`ResourceDocument`], keeping document order, attributes and any other named
//! element verbatim. The whitespace between entries and items, and anything
//! between the XML declaration and the root, is recorded in the document's
//! [`Layout`] so that writing a parsed file reproduces it byte for byte. Entries
//! added in code use four-space indentation, one entry per line.

use std::{
    io::{BufRead, Write},
    mem,
};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    traits::Parser,
    types::{
        Attribute, ItemEntry, Layout, ListEntry, ListKind, PassthroughEntry, ResourceDocument,
        ResourceEntry, StringEntry,
    },
};

const ENTRY_INDENT: &str = "\n    ";
const ITEM_INDENT: &str = "\n        ";

impl Parser for ResourceDocument {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut document = None;
        let mut declared = false;
        let mut prolog = String::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Decl(_) => {
                    declared = true;
                    prolog.clear();
                }
                Event::Start(ref e) => {
                    ensure_single_root(&document)?;
                    let mut doc = root_document(e, declared, &prolog)?;
                    (doc.entries, doc.layout) = parse_root_children(&mut xml_reader)?;
                    document = Some(doc);
                }
                Event::Empty(ref e) => {
                    ensure_single_root(&document)?;
                    document = Some(root_document(e, declared, &prolog)?);
                }
                Event::Text(ref e) if document.is_none() => {
                    prolog.push_str(&String::from_utf8_lossy(e));
                }
                Event::Comment(ref e) if document.is_none() => {
                    prolog.push_str("<!--");
                    prolog.push_str(&String::from_utf8_lossy(e));
                    prolog.push_str("-->");
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        document.ok_or_else(|| Error::malformed("document has no root element"))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        let prolog = self.prolog.as_deref().unwrap_or("\n");
        xml_writer.write_event(Event::Text(BytesText::from_escaped(prolog)))?;

        let mut root = BytesStart::new(self.root.as_str());
        push_attributes(&mut root, &self.root_attributes);

        if self.entries.is_empty() && self.layout.trailing.is_none() {
            xml_writer.write_event(Event::Empty(root))?;
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
            return Ok(());
        }

        xml_writer.write_event(Event::Start(root))?;
        for (index, entry) in self.entries.iter().enumerate() {
            let leading = self.layout.leading(index).unwrap_or(ENTRY_INDENT);
            xml_writer.write_event(Event::Text(BytesText::from_escaped(leading)))?;
            match entry {
                ResourceEntry::Comment(text) => {
                    xml_writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
                }
                ResourceEntry::String(s) => {
                    write_leaf(
                        &mut xml_writer,
                        "string",
                        &s.attributes,
                        s.text.as_deref(),
                        s.markup,
                    )?;
                }
                ResourceEntry::List(list) => write_list(&mut xml_writer, list)?,
                ResourceEntry::Passthrough(p) => {
                    xml_writer.write_event(Event::Text(BytesText::from_escaped(p.raw.as_str())))?;
                }
            }
        }
        let trailing = self.layout.trailing.as_deref().unwrap_or("\n");
        xml_writer.write_event(Event::Text(BytesText::from_escaped(trailing)))?;
        xml_writer.write_event(Event::End(BytesEnd::new(self.root.as_str())))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

impl ResourceDocument {
    /// Serialize into an in-memory XML string.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::malformed(e.to_string()))
    }
}

/// Returns true when `fragment` can be written verbatim as element content.
pub(crate) fn is_well_formed_fragment(fragment: &str) -> bool {
    let wrapped = format!("<fragment>{}</fragment>", fragment);
    let mut xml_reader = Reader::from_str(&wrapped);
    loop {
        match xml_reader.read_event() {
            Ok(Event::Text(e)) => {
                if e.unescape().is_err() {
                    return false;
                }
            }
            Ok(Event::Eof) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

fn ensure_single_root(document: &Option<ResourceDocument>) -> Result<(), Error> {
    match document {
        Some(_) => Err(Error::malformed("document has more than one root element")),
        None => Ok(()),
    }
}

/// `prolog` is the raw text read before the root. Without a declaration the
/// writer adds one, so leading whitespace is dropped.
fn root_document(
    e: &BytesStart,
    declared: bool,
    prolog: &str,
) -> Result<ResourceDocument, Error> {
    let prolog = if declared {
        Some(prolog.to_string())
    } else {
        let rest = prolog.trim_start();
        (!rest.is_empty()).then(|| format!("\n{}", rest))
    };
    Ok(ResourceDocument {
        root: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        root_attributes: read_attributes(e)?,
        entries: Vec::new(),
        prolog,
        layout: Layout::default(),
    })
}

fn parse_root_children<R: BufRead>(
    xml_reader: &mut Reader<R>,
) -> Result<(Vec<ResourceEntry>, Layout), Error> {
    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut layout = Layout::default();
    let mut pending = String::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(ref e) => pending.push_str(&String::from_utf8_lossy(e)),
            Event::Start(ref e) => {
                layout.leading.push(Some(mem::take(&mut pending)));
                entries.push(parse_entry(e, Some(&mut *xml_reader))?);
            }
            Event::Empty(ref e) => {
                layout.leading.push(Some(mem::take(&mut pending)));
                entries.push(parse_entry::<R>(e, None)?);
            }
            Event::Comment(ref e) => {
                layout.leading.push(Some(mem::take(&mut pending)));
                entries.push(ResourceEntry::Comment(String::from_utf8_lossy(e).into_owned()));
            }
            Event::End(_) => {
                layout.trailing = Some(pending);
                break;
            }
            Event::Eof => {
                return Err(Error::malformed("unexpected end of file inside root element"));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok((entries, layout))
}

/// Parses one root-level element. `xml_reader` is `None` for an empty element.
fn parse_entry<R: BufRead>(
    e: &BytesStart,
    xml_reader: Option<&mut Reader<R>>,
) -> Result<ResourceEntry, Error> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attributes = read_attributes(e)?;
    let name = attribute_value(&attributes, "name")
        .map(str::to_string)
        .ok_or_else(|| Error::malformed(format!("{} tag missing 'name'", tag)))?;

    if tag == "string" {
        let content = xml_reader.map(read_content).transpose()?;
        return Ok(ResourceEntry::String(StringEntry {
            translatable: is_translatable(&attributes),
            markup: content.as_ref().is_some_and(|c| c.markup),
            text: content.map(Content::into_text),
            name,
            attributes,
        }));
    }

    if let Some(kind) = ListKind::from_tag(tag.as_bytes()) {
        let (items, layout) = match xml_reader {
            Some(reader) => read_items(reader, kind, &name)?,
            None => (Vec::new(), Layout::default()),
        };
        return Ok(ResourceEntry::List(ListEntry {
            kind,
            name,
            attributes,
            items,
            layout,
        }));
    }

    let start = String::from_utf8_lossy(e);
    let raw = match xml_reader {
        Some(reader) => {
            let content = read_content(reader)?;
            format!("<{}>{}</{}>", start, content.raw, tag)
        }
        None => format!("<{}/>", start),
    };
    Ok(ResourceEntry::Passthrough(PassthroughEntry { tag, name, raw }))
}

fn read_items<R: BufRead>(
    xml_reader: &mut Reader<R>,
    kind: ListKind,
    name: &str,
) -> Result<(Vec<ItemEntry>, Layout), Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();
    let mut layout = Layout::default();
    let mut pending = String::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(ref e) => pending.push_str(&String::from_utf8_lossy(e)),
            Event::Start(ref e) => {
                ensure_item(e, kind, name)?;
                layout.leading.push(Some(mem::take(&mut pending)));
                let attributes = read_attributes(e)?;
                let content = read_content(xml_reader)?;
                items.push(ItemEntry {
                    translatable: is_translatable(&attributes),
                    markup: content.markup,
                    text: Some(content.into_text()),
                    attributes,
                });
            }
            Event::Empty(ref e) => {
                ensure_item(e, kind, name)?;
                layout.leading.push(Some(mem::take(&mut pending)));
                let attributes = read_attributes(e)?;
                items.push(ItemEntry {
                    translatable: is_translatable(&attributes),
                    markup: false,
                    text: None,
                    attributes,
                });
            }
            Event::Comment(_) => {
                return Err(Error::structural(format!(
                    "comment inside <{} name=\"{}\"> is not an <item>",
                    kind, name
                )));
            }
            Event::End(_) => {
                layout.trailing = Some(pending);
                break;
            }
            Event::Eof => {
                return Err(Error::malformed(format!(
                    "unexpected end of file inside <{} name=\"{}\">",
                    kind, name
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok((items, layout))
}

fn ensure_item(e: &BytesStart, kind: ListKind, name: &str) -> Result<(), Error> {
    if e.name().as_ref() == b"item" {
        return Ok(());
    }
    Err(Error::structural(format!(
        "<{}> inside <{} name=\"{}\"> is not an <item>",
        String::from_utf8_lossy(e.name().as_ref()),
        kind,
        name
    )))
}

/// Inner content of a leaf element.
#[derive(Debug, Default)]
struct Content {
    /// Unescaped character data.
    plain: String,
    /// The content exactly as written, markup included.
    raw: String,
    markup: bool,
}

impl Content {
    fn into_text(self) -> String {
        if self.markup { self.raw } else { self.plain }
    }
}

/// Reads everything up to the end tag of the element whose start was just consumed.
fn read_content<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Content, Error> {
    let mut buf = Vec::new();
    let mut content = Content::default();
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(ref e) => {
                content.raw.push_str(&String::from_utf8_lossy(e));
                content.plain.push_str(&e.unescape()?);
            }
            Event::CData(ref e) => {
                content.markup = true;
                content.raw.push_str("<![CDATA[");
                content.raw.push_str(&String::from_utf8_lossy(e));
                content.raw.push_str("]]>");
            }
            Event::Start(ref e) => {
                depth += 1;
                content.markup = true;
                content.raw.push('<');
                content.raw.push_str(&String::from_utf8_lossy(e));
                content.raw.push('>');
            }
            Event::Empty(ref e) => {
                content.markup = true;
                content.raw.push('<');
                content.raw.push_str(&String::from_utf8_lossy(e));
                content.raw.push_str("/>");
            }
            Event::End(ref e) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                content.raw.push_str("</");
                content.raw.push_str(&String::from_utf8_lossy(e.name().as_ref()));
                content.raw.push('>');
            }
            Event::Comment(ref e) => {
                content.markup = true;
                content.raw.push_str("<!--");
                content.raw.push_str(&String::from_utf8_lossy(e));
                content.raw.push_str("-->");
            }
            Event::Eof => return Err(Error::malformed("unexpected end of file inside element")),
            _ => {}
        }
        buf.clear();
    }
    Ok(content)
}

fn read_attributes(e: &BytesStart) -> Result<Vec<Attribute>, Error> {
    e.attributes()
        .with_checks(false)
        .map(|attr| {
            let attr = attr.map_err(|e| Error::malformed(e.to_string()))?;
            Ok(Attribute::new(
                String::from_utf8_lossy(attr.key.as_ref()),
                attr.unescape_value()?.into_owned(),
            ))
        })
        .collect()
}

fn attribute_value<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.as_str())
}

fn is_translatable(attributes: &[Attribute]) -> bool {
    attribute_value(attributes, "translatable") != Some("false")
}

fn push_attributes(elem: &mut BytesStart, attributes: &[Attribute]) {
    for attr in attributes {
        elem.push_attribute((attr.key.as_str(), attr.value.as_str()));
    }
}

fn write_leaf<W: Write>(
    xml_writer: &mut Writer<W>,
    tag: &str,
    attributes: &[Attribute],
    text: Option<&str>,
    markup: bool,
) -> Result<(), Error> {
    let mut elem = BytesStart::new(tag);
    push_attributes(&mut elem, attributes);

    let Some(text) = text else {
        xml_writer.write_event(Event::Empty(elem))?;
        return Ok(());
    };

    xml_writer.write_event(Event::Start(elem))?;
    let body = if markup {
        BytesText::from_escaped(text)
    } else {
        BytesText::from_escaped(partial_escape(text))
    };
    xml_writer.write_event(Event::Text(body))?;
    xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_list<W: Write>(xml_writer: &mut Writer<W>, list: &ListEntry) -> Result<(), Error> {
    let tag = list.kind.tag();
    let mut elem = BytesStart::new(tag);
    push_attributes(&mut elem, &list.attributes);

    if list.items.is_empty() && list.layout.trailing.is_none() {
        xml_writer.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    xml_writer.write_event(Event::Start(elem))?;
    for (index, item) in list.items.iter().enumerate() {
        let leading = list.layout.leading(index).unwrap_or(ITEM_INDENT);
        xml_writer.write_event(Event::Text(BytesText::from_escaped(leading)))?;
        write_leaf(
            xml_writer,
            "item",
            &item.attributes,
            item.text.as_deref(),
            item.markup,
        )?;
    }
    let trailing = list.layout.trailing.as_deref().unwrap_or(ENTRY_INDENT);
    xml_writer.write_event(Event::Text(BytesText::from_escaped(trailing)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
