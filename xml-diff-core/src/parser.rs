//! XML parsing into [`NodeInfo`] trees, with line-number retention and a
//! caller-supplied element filter predicate.
//!
//! The predicate decides which child elements participate in the diff: a
//! `false` result drops that element (and its subtree) from its parent's
//! children entirely, but never affects the parent's own attribute/text
//! extraction, since those come straight from the parent's own XML content.

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::schema::SchemaRegistry;
use crate::tree::{NodeInfo, XmlElement};

/// Errors that can occur while parsing XML into a [`NodeInfo`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Input bytes were not valid UTF-8 for tag/attribute/text extraction.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Structural issue in XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// An element under construction: its signature and handle are known as
/// soon as its start tag is read; its filtered children accumulate as its
/// own child elements close.
struct PartialNode {
    signature: String,
    element: XmlElement,
    children: Vec<NodeInfo>,
}

/// Parse `xml` into a [`NodeInfo`] tree, registering every surviving
/// element's property names in `registry` as it goes. `predicate` filters
/// which child elements participate; the root is always kept.
pub fn parse(
    xml: &[u8],
    predicate: &dyn Fn(&XmlElement) -> bool,
    registry: &mut SchemaRegistry,
) -> Result<NodeInfo, ParseError> {
    let newline_offsets = newline_offsets(xml);
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<PartialNode> = Vec::new();
    let mut root: Option<NodeInfo> = None;

    loop {
        let pos_before = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let line = line_for(&newline_offsets, pos_before);
                let parent_signature = stack.last().map(|p| p.signature.as_str());
                let (element, signature) = build_start(&e, &reader, line, parent_signature)?;
                stack.push(PartialNode {
                    signature,
                    element,
                    children: Vec::new(),
                });
            }
            Event::Empty(e) => {
                let line = line_for(&newline_offsets, pos_before);
                let parent_signature = stack.last().map(|p| p.signature.as_str());
                let (element, signature) = build_start(&e, &reader, line, parent_signature)?;
                settle(&mut stack, &mut root, element, signature, Vec::new(), predicate, registry)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape()?.into_owned();
                    append_text(&mut current.element.text, &text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = std::str::from_utf8(e.as_ref())?.to_string();
                    append_text(&mut current.element.text, &text);
                }
            }
            Event::End(_) => {
                let partial = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("encountered closing tag without open tag".to_string())
                })?;
                settle(
                    &mut stack,
                    &mut root,
                    partial.element,
                    partial.signature,
                    partial.children,
                    predicate,
                    registry,
                )?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed(
            "unclosed element(s) at end of document".to_string(),
        ));
    }

    root.ok_or_else(|| ParseError::Malformed("no root element found".to_string()))
}

/// Either make this element the document root, append it as a child of the
/// current stack top (subject to `predicate`), or reject a second top-level
/// element.
fn settle(
    stack: &mut [PartialNode],
    root: &mut Option<NodeInfo>,
    element: XmlElement,
    signature: String,
    children: Vec<NodeInfo>,
    predicate: &dyn Fn(&XmlElement) -> bool,
    registry: &mut SchemaRegistry,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        if predicate(&element) {
            let info = NodeInfo::from_element(element, signature, children, registry);
            parent.children.push(info);
        }
        return Ok(());
    }

    if root.is_some() {
        return Err(ParseError::Malformed(
            "multiple top-level elements found".to_string(),
        ));
    }
    *root = Some(NodeInfo::from_element(element, signature, children, registry));
    Ok(())
}

fn append_text(existing: &mut Option<String>, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    match existing {
        Some(current) => current.push_str(text),
        None => *existing = Some(text.to_string()),
    }
}

fn build_start(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
    line: i64,
    parent_signature: Option<&str>,
) -> Result<(XmlElement, String), ParseError> {
    let tag = qname_to_string(e.name())?;
    let signature = NodeInfo::signature_for(parent_signature, &tag);
    let mut element = XmlElement::new(tag, line);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        element.attributes.insert(key, value);
    }

    Ok((element, signature))
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

/// Byte offsets of every `\n` in `xml`, ascending — used to turn a byte
/// position into a 1-indexed line number by binary search.
fn newline_offsets(xml: &[u8]) -> Vec<usize> {
    xml.iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .map(|(i, _)| i)
        .collect()
}

fn line_for(newline_offsets: &[usize], byte_pos: usize) -> i64 {
    let preceding = newline_offsets.partition_point(|&offset| offset < byte_pos);
    (preceding + 1) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_true(_: &XmlElement) -> bool {
        true
    }

    #[test]
    fn parses_attributes_and_nested_text() {
        let mut registry = SchemaRegistry::new();
        let xml = br#"<root a="1"><child>value</child></root>"#;
        let info = parse(xml, &always_true, &mut registry).expect("parse should succeed");
        assert_eq!(info.signature, "root");
        assert_eq!(info.element.attributes.get("a"), Some(&"1".to_string()));
        assert_eq!(info.children.len(), 1);
        assert_eq!(info.children[0].signature, "root.child");
        assert_eq!(info.children[0].element.text.as_deref(), Some("value"));
    }

    #[test]
    fn predicate_drops_filtered_children_but_keeps_root() {
        let mut registry = SchemaRegistry::new();
        let xml = br#"<root><keep/><drop/></root>"#;
        let predicate = |el: &XmlElement| el.tag != "drop";
        let info = parse(xml, &predicate, &mut registry).expect("parse should succeed");
        assert_eq!(info.children.len(), 1);
        assert_eq!(info.children[0].element.tag, "keep");
    }

    #[test]
    fn unclosed_element_is_malformed() {
        let mut registry = SchemaRegistry::new();
        let xml = br#"<root><child>"#;
        let err = parse(xml, &always_true, &mut registry).unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn mismatched_closing_tag_is_xml_error() {
        let mut registry = SchemaRegistry::new();
        let xml = br#"<root><child></root>"#;
        let err = parse(xml, &always_true, &mut registry).unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
    }

    #[test]
    fn line_numbers_are_tracked() {
        let mut registry = SchemaRegistry::new();
        let xml = b"<root>\n  <child/>\n</root>";
        let info = parse(xml, &always_true, &mut registry).expect("parse should succeed");
        assert_eq!(info.element.line, 1);
        assert_eq!(info.children[0].element.line, 2);
    }
}
